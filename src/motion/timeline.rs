use super::{Ease, Props};
use crate::stage::{NodeId, Prop, Stage};
use palette::{LinSrgb, Mix, Srgb};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    pub duration: Duration,
    pub ease: Ease,
    /// Extra delay per target when one spec drives several nodes.
    pub stagger: Duration,
}

impl TweenSpec {
    pub fn new(duration: Duration, ease: Ease) -> Self {
        Self {
            duration,
            ease,
            stagger: Duration::ZERO,
        }
    }

    pub fn stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum Channel {
    Number {
        prop: Prop,
        from: Option<f64>,
        to: f64,
    },
    Color {
        from: Option<LinSrgb<f64>>,
        to: LinSrgb<f64>,
    },
}

/// One property of one node moving toward a target. The start value is read
/// from the stage the first time the tween renders.
#[derive(Debug, Clone)]
pub(crate) struct Tween {
    node: NodeId,
    channel: Channel,
    delay: f64,
    duration: f64,
    ease: Ease,
    done: bool,
}

impl Tween {
    fn expand(node: NodeId, props: &Props, delay: f64, spec: &TweenSpec) -> Vec<Tween> {
        let make = |channel| Tween {
            node,
            channel,
            delay,
            duration: spec.duration.as_secs_f64(),
            ease: spec.ease,
            done: false,
        };

        let mut tweens: Vec<Tween> = props
            .values()
            .map(|(prop, to)| {
                make(Channel::Number {
                    prop,
                    from: None,
                    to,
                })
            })
            .collect();
        if let Some(color) = props.color_value() {
            tweens.push(make(Channel::Color {
                from: None,
                to: color.into_linear(),
            }));
        }
        tweens
    }

    fn end(&self) -> f64 {
        self.delay + self.duration
    }

    pub(crate) fn drives(&self, node: NodeId, prop: Prop) -> bool {
        self.node == node && matches!(self.channel, Channel::Number { prop: p, .. } if p == prop)
    }

    /// Writes the value for `elapsed` seconds; returns true once finished.
    fn render<S: Stage>(&mut self, stage: &mut S, elapsed: f64) -> bool {
        if self.done {
            return true;
        }
        if elapsed < self.delay {
            return false;
        }

        let t = if self.duration <= 0.0 {
            1.0
        } else {
            ((elapsed - self.delay) / self.duration).min(1.0)
        };
        let k = self.ease.apply(t);
        let node = self.node;

        match &mut self.channel {
            Channel::Number { prop, from, to } => {
                let start = match *from {
                    Some(v) => v,
                    None => match stage.prop(node, *prop) {
                        Some(v) => {
                            *from = Some(v);
                            v
                        }
                        None => {
                            self.done = true;
                            return true;
                        }
                    },
                };
                stage.set_prop(node, *prop, start + (*to - start) * k);
            }
            Channel::Color { from, to } => {
                let start =
                    *from.get_or_insert_with(|| stage.color(node).unwrap_or_default().into_linear());
                stage.set_color(node, Srgb::from_linear(start.mix(*to, k)));
            }
        }

        self.done = t >= 1.0;
        self.done
    }
}

#[derive(Debug)]
struct Mark<C> {
    at: f64,
    cue: Option<C>,
}

/// A group of tweens on a shared clock, with cues that fire as it passes the
/// points where nested timelines end.
///
/// The timeline's own completion cue fires last, after every nested cue, so
/// it acts as a join over everything added to it.
#[derive(Debug)]
pub struct Timeline<C> {
    tweens: Vec<Tween>,
    marks: Vec<Mark<C>>,
    on_complete: Option<C>,
    elapsed: f64,
}

impl<C> Default for Timeline<C> {
    fn default() -> Self {
        Self {
            tweens: Vec::new(),
            marks: Vec::new(),
            on_complete: None,
            elapsed: 0.0,
        }
    }
}

impl<C> Timeline<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_complete(mut self, cue: C) -> Self {
        self.on_complete = Some(cue);
        self
    }

    pub fn to(&mut self, node: NodeId, props: &Props, spec: TweenSpec, at: Duration) -> &mut Self {
        self.to_each(&[node], props, spec, at)
    }

    /// Same target values for every node, each delayed by one more `stagger`.
    pub fn to_each(
        &mut self,
        nodes: &[NodeId],
        props: &Props,
        spec: TweenSpec,
        at: Duration,
    ) -> &mut Self {
        let at = at.as_secs_f64();
        let stagger = spec.stagger.as_secs_f64();
        for (i, node) in nodes.iter().enumerate() {
            let delay = at + stagger * i as f64;
            self.tweens
                .extend(Tween::expand(*node, props, delay, &spec));
        }
        self
    }

    /// Nests `child` at `at`. Its completion cue becomes a mark at its end.
    pub fn add(&mut self, mut child: Timeline<C>, at: Duration) -> &mut Self {
        let offset = at.as_secs_f64();
        let end = offset + child.length();

        for tween in &mut child.tweens {
            tween.delay += offset;
        }
        self.tweens.append(&mut child.tweens);

        self.marks.extend(child.marks.into_iter().map(|mark| Mark {
            at: mark.at + offset,
            cue: mark.cue,
        }));
        if let Some(cue) = child.on_complete.take() {
            self.marks.push(Mark { at: end, cue: Some(cue) });
        }
        self.marks.sort_by(|a, b| a.at.total_cmp(&b.at));
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.length())
    }

    fn length(&self) -> f64 {
        let tweens = self.tweens.iter().map(Tween::end);
        let marks = self.marks.iter().map(|m| m.at);
        tweens.chain(marks).fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty() && self.marks.is_empty()
    }

    pub(crate) fn drives(&self, node: NodeId, prop: Prop) -> bool {
        self.tweens.iter().any(|t| t.drives(node, prop))
    }

    /// Moves the clock by `dt` seconds, pushing any cues that came due.
    /// Returns true once every tween and cue is spent.
    pub(crate) fn advance<S: Stage>(&mut self, dt: f64, stage: &mut S, cues: &mut Vec<C>) -> bool {
        self.elapsed += dt;
        let elapsed = self.elapsed;

        let mut settled = true;
        for tween in &mut self.tweens {
            settled &= tween.render(stage, elapsed);
        }

        for mark in &mut self.marks {
            if mark.at <= elapsed {
                cues.extend(mark.cue.take());
            } else {
                settled = false;
            }
        }

        if settled && elapsed >= self.length() {
            cues.extend(self.on_complete.take());
            return true;
        }
        false
    }
}
