use super::{Cue, Deck, Direction, Motion};
use crate::motion::{self, Ease, Props, Timeline, TweenSpec};
use crate::stage::{NodeId, NodeKind, Prop, Stage};
use std::time::Duration;

/// One point on the fan. `x`/`y` are fractions of the track height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale: f64,
    pub blur: f64,
    pub opacity: f64,
}

/// Steps -2..=2, top edge to bottom edge.
pub const FAN: [Pose; 5] = [
    Pose { x: -0.35, y: -0.95, rotation: -30.0, scale: 1.35, blur: 16.0, opacity: 0.0 },
    Pose { x: -0.18, y: -0.5, rotation: -15.0, scale: 1.15, blur: 8.0, opacity: 0.55 },
    Pose { x: 0.0, y: 0.0, rotation: 0.0, scale: 1.0, blur: 0.0, opacity: 1.0 },
    Pose { x: -0.06, y: 0.5, rotation: 15.0, scale: 0.75, blur: 6.0, opacity: 0.55 },
    Pose { x: -0.12, y: 0.95, rotation: 30.0, scale: 0.55, blur: 14.0, opacity: 0.0 },
];

pub const EDGE_STEP: i32 = 2;

/// A pose resolved against a measured track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale: f64,
    pub blur: f64,
    pub opacity: f64,
    pub z_index: i32,
}

impl Placement {
    pub fn at(step: i32, height: f64) -> Self {
        let pose = FAN[(step.clamp(-EDGE_STEP, EDGE_STEP) + EDGE_STEP) as usize];
        Self {
            x: pose.x * height,
            y: pose.y * height,
            rotation: pose.rotation,
            scale: pose.scale,
            blur: pose.blur,
            opacity: pose.opacity,
            z_index: match step.abs() {
                0 => 3,
                1 => 2,
                _ => 1,
            },
        }
    }

    pub fn props(&self) -> Props {
        Props::new()
            .with(Prop::X, self.x)
            .with(Prop::Y, self.y)
            .with(Prop::Rotation, self.rotation)
            .with(Prop::Scale, self.scale)
            .with(Prop::Blur, self.blur)
            .with(Prop::Opacity, self.opacity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSlot {
    pub node: NodeId,
    /// Offset from the focused slide.
    pub step: i32,
    pub slide: usize,
}

/// Owns the rendered cards and walks them along the fan.
#[derive(Debug)]
pub struct TrackAnimator {
    surface: NodeId,
    slots: Vec<TrackSlot>,
    /// Deck index the current slots are centred on.
    anchor: Option<usize>,
}

impl TrackAnimator {
    pub fn new(surface: NodeId) -> Self {
        Self {
            surface,
            slots: Vec::new(),
            anchor: None,
        }
    }

    pub fn surface(&self) -> NodeId {
        self.surface
    }

    pub fn slots(&self) -> &[TrackSlot] {
        &self.slots
    }

    /// Replaces every card with the resting three around the deck's focus.
    /// Does nothing while the surface is unmeasured.
    pub fn build<S: Stage>(&mut self, stage: &mut S, deck: &Deck) {
        let height = stage.extent(self.surface);
        if height <= 0.0 {
            return;
        }

        for slot in self.slots.drain(..) {
            stage.remove(slot.node);
        }
        let current = deck.current_index();
        for step in -1..=1 {
            let slide = deck.wrap(current as i64 + step as i64);
            let node = self.place_card(stage, slide, step, height);
            self.slots.push(TrackSlot { node, step, slide });
        }
        self.anchor = Some(current);
    }

    pub fn needs_build(&self, deck: &Deck) -> bool {
        self.slots.is_empty() || self.anchor != Some(deck.current_index())
    }

    pub fn transition<S: Stage>(
        &mut self,
        stage: &mut S,
        deck: &Deck,
        direction: Direction,
        timing: &Motion,
    ) -> Timeline<Cue> {
        let height = stage.extent(self.surface);
        if height <= 0.0 {
            return Timeline::new();
        }
        if self.needs_build(deck) {
            self.build(stage, deck);
        }

        let shift = -direction.sign() as i32;
        let enter_step = EDGE_STEP * direction.sign() as i32;
        let slide = deck.neighbor_index(direction, 2);

        let node = self.place_card(stage, slide, enter_step, height);
        self.slots.push(TrackSlot {
            node,
            step: enter_step,
            slide,
        });
        for slot in &mut self.slots {
            slot.step += shift;
        }
        self.anchor = Some(deck.neighbor_index(direction, 1));

        let spec = TweenSpec::new(timing.track, Ease::Power3InOut);
        let mut tl = Timeline::new().on_complete(Cue::TrackSettled);
        for slot in &self.slots {
            let target = Placement::at(slot.step, height);
            stage.set_z_index(slot.node, target.z_index);
            tl.to(slot.node, &target.props(), spec, Duration::ZERO);
        }
        tl
    }

    /// Drops the cards that left the visible fan.
    pub fn settle<S: Stage>(&mut self, stage: &mut S) {
        self.slots.retain(|slot| {
            let keep = slot.step.abs() < EDGE_STEP;
            if !keep {
                stage.remove(slot.node);
            }
            keep
        });
    }

    /// Snaps every card back onto the curve for the current extent.
    pub fn reposition<S: Stage>(&mut self, stage: &mut S) {
        let height = stage.extent(self.surface);
        if height <= 0.0 {
            return;
        }
        for slot in &self.slots {
            let placement = Placement::at(slot.step, height);
            motion::apply(stage, slot.node, &placement.props());
            stage.set_z_index(slot.node, placement.z_index);
        }
    }

    fn place_card<S: Stage>(&self, stage: &mut S, slide: usize, step: i32, height: f64) -> NodeId {
        let node = stage.create(NodeKind::Card { slide }, Some(self.surface));
        let placement = Placement::at(step, height);
        motion::apply(stage, node, &placement.props());
        stage.set_z_index(node, placement.z_index);
        node
    }
}
