use super::{CURSOR_FADE, CURSOR_FOLLOW, Cue};
use crate::events::Point;
use crate::motion::{Animator, Ease, Props, TweenSpec};
use crate::stage::{NodeId, Prop, Stage};

/// A "+" marker that trails the pointer and fades with its presence.
#[derive(Debug)]
pub struct Cursor {
    node: NodeId,
    visible: bool,
}

impl Cursor {
    pub fn mount<S: Stage>(stage: &mut S, animator: &Animator<Cue>, node: NodeId) -> Self {
        animator.set(stage, node, &Props::new().with(Prop::Opacity, 0.0));
        Self {
            node,
            visible: false,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn moved(&mut self, animator: &mut Animator<Cue>, to: Point) {
        if !self.visible {
            self.fade(animator, 1.0);
            self.visible = true;
        }
        let follow = TweenSpec::new(CURSOR_FOLLOW, Ease::Power3Out);
        animator.follow(self.node, Prop::X, to.x, follow);
        animator.follow(self.node, Prop::Y, to.y, follow);
    }

    pub fn left(&mut self, animator: &mut Animator<Cue>) {
        self.fade(animator, 0.0);
        self.visible = false;
    }

    fn fade(&self, animator: &mut Animator<Cue>, opacity: f64) {
        animator.follow(
            self.node,
            Prop::Opacity,
            opacity,
            TweenSpec::new(CURSOR_FADE, Ease::Power1Out),
        );
    }
}
