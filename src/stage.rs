//! The rendering surface the carousel drives.
//!
//! [`Stage`] is the minimal element capability the carousel needs: create and
//! remove nodes, read and write their visual properties, and measure them.
//! [`Scene`] is a retained, toolkit-free implementation that hosts render from.

use derive_more::{Display, From, Into};
use palette::Srgb;
use std::collections::HashMap;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("node#{_0}")]
pub struct NodeId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Backdrop,
    Title,
    TitleLine,
    Glyph(char),
    Track,
    Card { slide: usize },
    Cursor,
}

/// Numeric visual properties a tween can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Prop {
    X,
    Y,
    Rotation,
    Scale,
    Blur,
    Opacity,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub x: f64,
    pub y: f64,
    /// Degrees, clockwise.
    pub rotation: f64,
    pub scale: f64,
    /// Radius in pixels.
    pub blur: f64,
    pub opacity: f64,
    pub z_index: i32,
    pub color: Option<Srgb<f64>>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale: 1.0,
            blur: 0.0,
            opacity: 1.0,
            z_index: 0,
            color: None,
        }
    }
}

impl Style {
    pub fn get(&self, prop: Prop) -> f64 {
        match prop {
            Prop::X => self.x,
            Prop::Y => self.y,
            Prop::Rotation => self.rotation,
            Prop::Scale => self.scale,
            Prop::Blur => self.blur,
            Prop::Opacity => self.opacity,
        }
    }

    pub fn set(&mut self, prop: Prop, value: f64) {
        let slot = match prop {
            Prop::X => &mut self.x,
            Prop::Y => &mut self.y,
            Prop::Rotation => &mut self.rotation,
            Prop::Scale => &mut self.scale,
            Prop::Blur => &mut self.blur,
            Prop::Opacity => &mut self.opacity,
        };
        *slot = value;
    }
}

/// Element capability consumed by the carousel.
///
/// Writes addressed to a node that no longer exists are ignored, and reads of
/// one return `None`, so in-flight tweens outliving their node are harmless.
pub trait Stage {
    fn create(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId;
    /// Removes the node and everything below it.
    fn remove(&mut self, node: NodeId);
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn prop(&self, node: NodeId, prop: Prop) -> Option<f64>;
    fn set_prop(&mut self, node: NodeId, prop: Prop, value: f64);
    fn color(&self, node: NodeId) -> Option<Srgb<f64>>;
    fn set_color(&mut self, node: NodeId, color: Srgb<f64>);
    fn set_z_index(&mut self, node: NodeId, z_index: i32);
    /// Drops every inline override, returning the node to its natural look.
    fn clear_style(&mut self, node: NodeId);

    /// Takes the node out of flow so siblings stack on top of each other.
    fn set_overlay(&mut self, node: NodeId, overlay: bool);
    /// Forces an explicit height, or releases it with `None`.
    fn pin_height(&mut self, node: NodeId, height: Option<f64>);
    /// Measured height; `0.0` until the host has laid the node out.
    fn extent(&self, node: NodeId) -> f64;
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub style: Style,
    pub overlay: bool,
    pub pinned_height: Option<f64>,
    natural_height: f64,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            style: Style::default(),
            overlay: false,
            pinned_height: None,
            natural_height: 0.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Host-side layout result for a node.
    pub fn set_extent(&mut self, id: NodeId, height: f64) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.natural_height = height.max(0.0);
        }
    }

    /// Concatenated glyphs below `id`, in document order.
    pub fn text(&self, id: NodeId) -> String {
        self.node(id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|child| self.node(*child))
                    .filter_map(|child| match child.kind {
                        NodeKind::Glyph(ch) => Some(ch),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn style_mut(&mut self, id: NodeId) -> Option<&mut Style> {
        self.nodes.get_mut(&id).map(|node| &mut node.style)
    }
}

impl Stage for Scene {
    fn create(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let parent = parent.filter(|p| self.nodes.contains_key(p));
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(p) => p.children.push(id),
            None => self.roots.push(id),
        }
        self.nodes.insert(id, Node::new(kind, parent));
        id
    }

    fn remove(&mut self, node: NodeId) {
        let Some(removed) = self.nodes.remove(&node) else {
            return;
        };
        match removed.parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent) => parent.children.retain(|c| *c != node),
            None => self.roots.retain(|r| *r != node),
        }

        let mut pending = removed.children;
        while let Some(id) = pending.pop() {
            if let Some(child) = self.nodes.remove(&id) {
                pending.extend(child.children);
            }
        }
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn prop(&self, node: NodeId, prop: Prop) -> Option<f64> {
        self.node(node).map(|n| n.style.get(prop))
    }

    fn set_prop(&mut self, node: NodeId, prop: Prop, value: f64) {
        if let Some(style) = self.style_mut(node) {
            style.set(prop, value);
        }
    }

    fn color(&self, node: NodeId) -> Option<Srgb<f64>> {
        self.node(node).and_then(|n| n.style.color)
    }

    fn set_color(&mut self, node: NodeId, color: Srgb<f64>) {
        if let Some(style) = self.style_mut(node) {
            style.color = Some(color);
        }
    }

    fn set_z_index(&mut self, node: NodeId, z_index: i32) {
        if let Some(style) = self.style_mut(node) {
            style.z_index = z_index;
        }
    }

    fn clear_style(&mut self, node: NodeId) {
        if let Some(style) = self.style_mut(node) {
            *style = Style::default();
        }
    }

    fn set_overlay(&mut self, node: NodeId, overlay: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.overlay = overlay;
        }
    }

    fn pin_height(&mut self, node: NodeId, height: Option<f64>) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.pinned_height = height;
        }
    }

    fn extent(&self, node: NodeId) -> f64 {
        self.node(node)
            .map(|n| n.pinned_height.unwrap_or(n.natural_height))
            .unwrap_or(0.0)
    }
}
