use super::{Cue, Direction, Motion};
use crate::motion::{self, Ease, Props, Timeline, TweenSpec};
use crate::stage::{NodeId, NodeKind, Prop, Stage};
use std::time::Duration;

const NBSP: char = '\u{a0}';

/// Swaps the visible label one glyph at a time.
#[derive(Debug)]
pub struct TitleAnimator {
    container: NodeId,
    line: NodeId,
}

impl TitleAnimator {
    pub fn mount<S: Stage>(stage: &mut S, container: NodeId, text: &str) -> Self {
        let line = stage.create(NodeKind::TitleLine, Some(container));
        spell(stage, line, text);
        Self { container, line }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The line that is, or after settling will be, at rest.
    pub fn line(&self) -> NodeId {
        self.line
    }

    pub fn transition<S: Stage>(
        &mut self,
        stage: &mut S,
        text: &str,
        direction: Direction,
        timing: &Motion,
    ) -> Timeline<Cue> {
        let h = stage.extent(self.container);
        let dir = direction.sign() as f64;

        let outgoing = self.line;
        let old_glyphs = stage.children(outgoing);

        // freeze the box so the two overlaid lines can't change its height
        stage.pin_height(self.container, Some(h));
        stage.set_overlay(outgoing, true);

        let incoming = stage.create(NodeKind::TitleLine, Some(self.container));
        stage.set_overlay(incoming, true);
        let new_glyphs = spell(stage, incoming, text);
        for glyph in &new_glyphs {
            motion::apply(stage, *glyph, &Props::new().with(Prop::Y, h * dir));
        }

        let spec = TweenSpec::new(timing.title, Ease::ExpoInOut).stagger(timing.title_stagger);
        let mut tl = Timeline::new().on_complete(Cue::TitleSettled { outgoing, incoming });
        tl.to_each(
            &old_glyphs,
            &Props::new().with(Prop::Y, -h * dir),
            spec,
            Duration::ZERO,
        )
        .to_each(&new_glyphs, &Props::new().with(Prop::Y, 0.0), spec, Duration::ZERO);
        tl
    }

    pub fn settle<S: Stage>(&mut self, stage: &mut S, outgoing: NodeId, incoming: NodeId) {
        stage.remove(outgoing);
        stage.set_overlay(incoming, false);
        for glyph in stage.children(incoming) {
            stage.clear_style(glyph);
        }
        stage.pin_height(self.container, None);
        self.line = incoming;
    }
}

fn spell<S: Stage>(stage: &mut S, line: NodeId, text: &str) -> Vec<NodeId> {
    text.chars()
        .map(|ch| if ch == ' ' { NBSP } else { ch })
        .map(|ch| stage.create(NodeKind::Glyph(ch), Some(line)))
        .collect()
}
