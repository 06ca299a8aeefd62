//! Tween engine: immediate sets, timed tweens, nested timelines and
//! retargetable follow tweens. Nothing moves until the owner calls
//! [`Animator::tick`], so time is entirely in the caller's hands.

pub mod animator;
pub mod ease;
pub mod timeline;

pub use animator::Animator;
pub use ease::Ease;
pub use timeline::{Timeline, TweenSpec};

use crate::stage::{NodeId, Prop, Stage};
use palette::Srgb;

/// A partial set of target values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    values: Vec<(Prop, f64)>,
    color: Option<Srgb<f64>>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, prop: Prop, value: f64) -> Self {
        self.values.retain(|(p, _)| *p != prop);
        self.values.push((prop, value));
        self
    }

    pub fn color(mut self, color: Srgb<f64>) -> Self {
        self.color = Some(color);
        self
    }

    pub fn get(&self, prop: Prop) -> Option<f64> {
        self.values
            .iter()
            .find_map(|(p, v)| (*p == prop).then_some(*v))
    }

    pub fn values(&self) -> impl Iterator<Item = (Prop, f64)> + '_ {
        self.values.iter().copied()
    }

    pub fn color_value(&self) -> Option<Srgb<f64>> {
        self.color
    }
}

/// Writes `props` straight onto the stage.
pub fn apply<S: Stage>(stage: &mut S, node: NodeId, props: &Props) {
    for (prop, value) in props.values() {
        stage.set_prop(node, prop, value);
    }
    if let Some(color) = props.color {
        stage.set_color(node, color);
    }
}
