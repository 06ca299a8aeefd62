use super::{Props, Timeline, TweenSpec};
use crate::stage::{NodeId, Prop, Stage};
use std::time::Duration;

/// Runs timelines against a stage and collects the cues they emit.
#[derive(Debug)]
pub struct Animator<C> {
    timelines: Vec<Timeline<C>>,
    follows: Vec<Timeline<C>>,
}

impl<C> Default for Animator<C> {
    fn default() -> Self {
        Self {
            timelines: Vec::new(),
            follows: Vec::new(),
        }
    }
}

impl<C> Animator<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Immediate assignment, no interpolation.
    pub fn set<S: Stage>(&self, stage: &mut S, node: NodeId, props: &Props) {
        super::apply(stage, node, props);
    }

    pub fn play(&mut self, timeline: Timeline<C>) {
        self.timelines.push(timeline);
    }

    /// Tweens one property toward `to`, replacing any follow tween already
    /// driving it. Retargeting every frame gives a smooth trailing motion.
    pub fn follow(&mut self, node: NodeId, prop: Prop, to: f64, spec: TweenSpec) {
        self.follows.retain(|tl| !tl.drives(node, prop));
        let mut tl = Timeline::new();
        tl.to(node, &Props::new().with(prop, to), spec, Duration::ZERO);
        self.follows.push(tl);
    }

    pub fn tick<S: Stage>(&mut self, dt: Duration, stage: &mut S) -> Vec<C> {
        let dt = dt.as_secs_f64();
        let mut cues = Vec::new();
        self.timelines
            .retain_mut(|tl| !tl.advance(dt, stage, &mut cues));
        self.follows
            .retain_mut(|tl| !tl.advance(dt, stage, &mut cues));
        cues
    }

    pub fn is_idle(&self) -> bool {
        self.timelines.is_empty() && self.follows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Ease;
    use crate::stage::{NodeKind, Scene};

    #[test]
    fn test_follow_overwrites_previous_target() {
        let mut scene = Scene::new();
        let cursor = scene.create(NodeKind::Cursor, None);
        let spec = TweenSpec::new(Duration::from_millis(500), Ease::Linear);
        let mut animator: Animator<()> = Animator::new();

        animator.follow(cursor, Prop::X, 100.0, spec);
        animator.tick(Duration::from_millis(250), &mut scene);
        assert!((scene.prop(cursor, Prop::X).unwrap() - 50.0).abs() < 1e-9);

        animator.follow(cursor, Prop::X, 0.0, spec);
        animator.tick(Duration::from_secs(1), &mut scene);
        assert_eq!(scene.prop(cursor, Prop::X), Some(0.0));
        assert!(animator.is_idle());
    }

    #[test]
    fn test_follow_keeps_other_properties() {
        let mut scene = Scene::new();
        let cursor = scene.create(NodeKind::Cursor, None);
        let spec = TweenSpec::new(Duration::from_millis(500), Ease::Linear);
        let mut animator: Animator<()> = Animator::new();

        animator.follow(cursor, Prop::X, 10.0, spec);
        animator.follow(cursor, Prop::Y, 20.0, spec);
        animator.tick(Duration::from_secs(1), &mut scene);
        assert_eq!(scene.prop(cursor, Prop::X), Some(10.0));
        assert_eq!(scene.prop(cursor, Prop::Y), Some(20.0));
    }

    #[test]
    fn test_tick_collects_completion_cues() {
        let mut scene = Scene::new();
        let mut animator = Animator::new();
        animator.play(Timeline::new().on_complete("done"));
        assert!(!animator.is_idle());
        assert_eq!(animator.tick(Duration::ZERO, &mut scene), vec!["done"]);
        assert!(animator.is_idle());
    }
}
