use super::autoplay::Autoplay;
use super::cursor::Cursor;
use super::input::{Debounce, InputGate};
use super::title::TitleAnimator;
use super::track::TrackAnimator;
use super::{Cue, Deck, Direction, Motion, RESIZE_SETTLE, Settings, TrackSlot};
use crate::events::InputEvent;
use crate::motion::{Animator, Ease, Props, Timeline, TweenSpec};
use crate::stage::{NodeId, NodeKind, Stage};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning { target: usize },
}

/// Top-level nodes the carousel draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub backdrop: NodeId,
    pub title: NodeId,
    pub track: NodeId,
    pub cursor: NodeId,
}

pub struct Carousel<S: Stage> {
    deck: Deck,
    stage: S,
    animator: Animator<Cue>,
    regions: Regions,
    title: TitleAnimator,
    track: TrackAnimator,
    cursor: Cursor,
    input: InputGate,
    autoplay: Autoplay,
    resize: Debounce,
    timing: Motion,
    phase: Phase,
    clock: Duration,
}

impl<S: Stage> Carousel<S> {
    pub fn new(deck: Deck, mut stage: S, settings: Settings) -> Self {
        let animator = Animator::new();
        let regions = Regions {
            backdrop: stage.create(NodeKind::Backdrop, None),
            title: stage.create(NodeKind::Title, None),
            track: stage.create(NodeKind::Track, None),
            cursor: stage.create(NodeKind::Cursor, None),
        };

        let slide = deck.current_slide();
        animator.set(
            &mut stage,
            regions.backdrop,
            &Props::new().color(slide.backdrop()),
        );
        let title = TitleAnimator::mount(&mut stage, regions.title, slide.name.as_str());
        let mut track = TrackAnimator::new(regions.track);
        track.build(&mut stage, &deck);
        let cursor = Cursor::mount(&mut stage, &animator, regions.cursor);

        let mut autoplay = Autoplay::new(settings.autoplay_delay);
        autoplay.restart(Duration::ZERO);

        log::info!(
            "Carousel ready with {} slides, reduced motion {}",
            deck.len(),
            if settings.reduced_motion { "on" } else { "off" }
        );

        Self {
            deck,
            stage,
            animator,
            regions,
            title,
            track,
            cursor,
            input: InputGate::new(),
            autoplay,
            resize: Debounce::new(RESIZE_SETTLE),
            timing: Motion::new(settings.reduced_motion),
            phase: Phase::Idle,
            clock: Duration::ZERO,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    /// Hosts write measured extents through this before sending a resize.
    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    pub fn regions(&self) -> Regions {
        self.regions
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    /// True while any tween, including the cursor's, is still running.
    pub fn is_moving(&self) -> bool {
        !self.animator.is_idle()
    }

    pub fn track_slots(&self) -> &[TrackSlot] {
        self.track.slots()
    }

    pub fn title_line(&self) -> NodeId {
        self.title.line()
    }

    pub fn autoplay_running(&self) -> bool {
        self.autoplay.is_running()
    }

    /// Starts a transition toward the neighbouring slide. Returns false, and
    /// does nothing, while another transition is still running.
    pub fn go(&mut self, direction: Direction) -> bool {
        if self.is_animating() {
            log::trace!("Dropped {direction} while transitioning");
            return false;
        }

        let target = self.deck.neighbor_index(direction, 1);
        self.phase = Phase::Transitioning { target };
        self.autoplay.restart(self.clock);
        log::debug!(
            "Going {direction} from {} to {target}",
            self.deck.current_index()
        );

        let slide = self.deck.slide(target).clone();
        let mut master = Timeline::new().on_complete(Cue::Arrived { index: target });
        master.to(
            self.regions.backdrop,
            &Props::new().color(slide.backdrop()),
            TweenSpec::new(self.timing.backdrop, Ease::Power2InOut),
            Duration::ZERO,
        );

        let title =
            self.title
                .transition(&mut self.stage, slide.name.as_str(), direction, &self.timing);
        let track = self
            .track
            .transition(&mut self.stage, &self.deck, direction, &self.timing);
        master.add(title, Duration::ZERO).add(track, Duration::ZERO);

        self.animator.play(master);
        true
    }

    pub fn handle(&mut self, event: InputEvent) {
        let busy = self.is_animating();
        let now = self.clock;

        let command = match event {
            InputEvent::Wheel { delta_y } => self.input.wheel(delta_y, now, busy),
            InputEvent::TouchStart { y } => {
                self.input.touch_start(y);
                None
            }
            InputEvent::TouchEnd { y } => self.input.touch_end(y, now, busy),
            InputEvent::Key(key) => self.input.key(key, busy),
            InputEvent::PointerMove(point) => {
                self.cursor.moved(&mut self.animator, point);
                None
            }
            InputEvent::PointerLeave => {
                self.cursor.left(&mut self.animator);
                None
            }
            InputEvent::Resize => {
                self.on_resize();
                None
            }
            InputEvent::Visibility { visible } => {
                if visible {
                    self.autoplay.restart(now);
                } else {
                    self.autoplay.stop();
                }
                None
            }
        };

        if let Some(direction) = command {
            self.go(direction);
        }
    }

    /// Moves the carousel's clock forward by one host frame. Returns true if
    /// the stage changed and needs repainting.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.clock += dt;
        let mut changed = self.is_moving();

        for cue in self.animator.tick(dt, &mut self.stage) {
            self.on_cue(cue);
        }

        if self.autoplay.poll(self.clock) {
            if self.is_animating() {
                log::trace!("Autoplay skipped, transition in flight");
            } else {
                log::debug!("Autoplay advancing");
                self.go(Direction::Next);
            }
        }

        if self.resize.poll(self.clock) {
            if self.is_animating() {
                log::trace!("Resize settled mid-transition, skipped");
            } else if self.track.needs_build(&self.deck) {
                self.track.build(&mut self.stage, &self.deck);
                changed = true;
            } else {
                self.track.reposition(&mut self.stage);
                changed = true;
            }
        }

        changed || self.is_moving()
    }

    fn on_resize(&mut self) {
        // nothing on screen yet to conflict with, so no need to wait
        if self.track.slots().is_empty() && !self.is_animating() {
            self.track.build(&mut self.stage, &self.deck);
        } else {
            self.resize.poke(self.clock);
        }
    }

    fn on_cue(&mut self, cue: Cue) {
        match cue {
            Cue::TitleSettled { outgoing, incoming } => {
                self.title.settle(&mut self.stage, outgoing, incoming);
            }
            Cue::TrackSettled => self.track.settle(&mut self.stage),
            Cue::Arrived { index } => {
                self.deck.commit(index);
                self.phase = Phase::Idle;
                log::debug!("Settled on slide {index}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{AUTOPLAY_DELAY, RESIZE_SETTLE, Slide, SWIPE_THROTTLE};
    use crate::events::{Key, Point};
    use crate::stage::{Prop, Scene};
    use palette::Srgb;

    const SETTLE: Duration = Duration::from_secs(2);

    fn deck(names: &[&str]) -> Deck {
        Deck::new(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| Slide::new(*name, Srgb::new(40 * i as u8, 80, 120), "img.jpg"))
                .collect(),
        )
        .unwrap()
    }

    fn carousel_with(names: &[&str], settings: Settings) -> Carousel<Scene> {
        let mut c = Carousel::new(deck(names), Scene::new(), settings);
        let regions = c.regions();
        c.stage_mut().set_extent(regions.track, 600.0);
        c.stage_mut().set_extent(regions.title, 120.0);
        c.handle(InputEvent::Resize);
        c
    }

    fn carousel(names: &[&str]) -> Carousel<Scene> {
        carousel_with(names, Settings::default())
    }

    fn steps(c: &Carousel<Scene>) -> Vec<i32> {
        let mut steps: Vec<i32> = c.track_slots().iter().map(|s| s.step).collect();
        steps.sort();
        steps
    }

    fn title_text(c: &Carousel<Scene>) -> String {
        c.stage().text(c.title_line())
    }

    #[test]
    fn test_sequential_navigation_wraps_the_ring() {
        let mut c = carousel(&["A", "B", "C", "D"]);
        for expected in 1..=3 {
            assert!(c.go(Direction::Next));
            c.advance(SETTLE);
            assert_eq!(c.deck().current_index(), expected);
        }
        assert_eq!(title_text(&c), "D");

        assert!(c.go(Direction::Prev));
        c.advance(SETTLE);
        assert_eq!(c.deck().current_index(), 2);
        assert_eq!(title_text(&c), "C");
    }

    #[test]
    fn test_second_go_while_busy_is_dropped() {
        let mut c = carousel(&["A", "B", "C", "D"]);
        assert!(c.go(Direction::Next));
        assert!(!c.go(Direction::Next));
        assert_eq!(c.phase(), Phase::Transitioning { target: 1 });

        c.advance(SETTLE);
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.deck().current_index(), 1);
        // nothing queued behind the dropped call
        c.advance(SETTLE);
        assert_eq!(c.deck().current_index(), 1);
    }

    #[test]
    fn test_slot_counts_through_a_transition() {
        let mut c = carousel(&["A", "B", "C"]);
        assert_eq!(steps(&c), vec![-1, 0, 1]);

        c.go(Direction::Prev);
        assert_eq!(c.track_slots().len(), 4);
        assert_eq!(c.stage().children(c.regions().track).len(), 4);
        assert_eq!(c.stage().children(c.regions().title).len(), 2);

        c.advance(Duration::from_millis(600));
        assert!(c.is_animating());
        assert_eq!(c.track_slots().len(), 4);

        c.advance(SETTLE);
        assert_eq!(steps(&c), vec![-1, 0, 1]);
        assert_eq!(c.stage().children(c.regions().track).len(), 3);
        assert_eq!(c.stage().children(c.regions().title).len(), 1);
    }

    #[test]
    fn test_lock_clears_only_after_every_part_finishes() {
        let mut c = carousel(&["A", "B", "C"]);
        c.go(Direction::Next);
        // title is done at 1.0s plus stagger; track and backdrop run to 1.2s
        c.advance(Duration::from_millis(1100));
        assert!(c.is_animating());
        c.advance(Duration::from_millis(150));
        assert!(!c.is_animating());
    }

    #[test]
    fn test_backdrop_takes_target_colour() {
        let mut c = carousel(&["A", "B", "C"]);
        c.go(Direction::Next);
        c.advance(SETTLE);
        let expected: Srgb<f64> = c.deck().current_slide().backdrop();
        let got = c.stage().color(c.regions().backdrop).unwrap();
        assert!((got.red - expected.red).abs() < 1e-6);
        assert!((got.green - expected.green).abs() < 1e-6);
        assert!((got.blue - expected.blue).abs() < 1e-6);
    }

    #[test]
    fn test_reduced_motion_reaches_same_state_faster() {
        let names = ["Fjord", "Aether", "Onyx", "Birch"];
        let mut normal = carousel(&names);
        let mut reduced = carousel_with(
            &names,
            Settings {
                reduced_motion: true,
                ..Settings::default()
            },
        );

        for c in [&mut normal, &mut reduced] {
            c.go(Direction::Prev);
        }
        let step = Duration::from_millis(50);
        normal.advance(step);
        reduced.advance(step);
        assert!(normal.is_animating());
        assert!(!reduced.is_animating());

        normal.advance(SETTLE);
        assert_eq!(normal.deck().current_index(), reduced.deck().current_index());
        assert_eq!(title_text(&normal), title_text(&reduced));
        assert_eq!(steps(&normal), steps(&reduced));
        let slides = |c: &Carousel<Scene>| {
            let mut v: Vec<(i32, usize)> =
                c.track_slots().iter().map(|s| (s.step, s.slide)).collect();
            v.sort();
            v
        };
        assert_eq!(slides(&normal), slides(&reduced));
    }

    #[test]
    fn test_wheel_burst_triggers_single_transition() {
        let mut c = carousel(&["A", "B", "C", "D"]);
        for _ in 0..10 {
            c.handle(InputEvent::Wheel { delta_y: 12.0 });
            c.advance(Duration::from_millis(100));
        }
        c.advance(SETTLE);
        assert_eq!(c.deck().current_index(), 1);
    }

    #[test]
    fn test_wheel_respects_throttle_window_after_settling() {
        let mut c = carousel(&["A", "B", "C", "D"]);
        c.handle(InputEvent::Wheel { delta_y: 1.0 });
        c.advance(Duration::from_millis(1300));
        assert!(!c.is_animating());

        // idle, but still inside the 1800ms window
        c.handle(InputEvent::Wheel { delta_y: 1.0 });
        assert!(!c.is_animating());

        c.advance(SWIPE_THROTTLE);
        c.handle(InputEvent::Wheel { delta_y: -1.0 });
        assert_eq!(c.phase(), Phase::Transitioning { target: 0 });
    }

    #[test]
    fn test_keys_and_swipes_navigate() {
        let mut c = carousel(&["A", "B", "C", "D"]);
        c.handle(InputEvent::Key(Key::Left));
        c.advance(SETTLE);
        assert_eq!(c.deck().current_index(), 3);

        c.handle(InputEvent::TouchStart { y: 500.0 });
        c.handle(InputEvent::TouchEnd { y: 300.0 });
        c.advance(SETTLE);
        assert_eq!(c.deck().current_index(), 0);
    }

    #[test]
    fn test_keys_are_ignored_mid_transition() {
        let mut c = carousel(&["A", "B", "C"]);
        c.handle(InputEvent::Key(Key::Down));
        c.handle(InputEvent::Key(Key::Down));
        c.advance(SETTLE);
        assert_eq!(c.deck().current_index(), 1);
    }

    #[test]
    fn test_autoplay_advances_when_idle() {
        let mut c = carousel(&["A", "B", "C"]);
        c.advance(AUTOPLAY_DELAY - Duration::from_millis(1));
        assert!(!c.is_animating());
        c.advance(Duration::from_millis(1));
        assert_eq!(c.phase(), Phase::Transitioning { target: 1 });
    }

    #[test]
    fn test_manual_navigation_restarts_autoplay() {
        let mut c = carousel(&["A", "B", "C"]);
        c.advance(Duration::from_millis(3000));
        c.handle(InputEvent::Key(Key::Down));
        c.advance(SETTLE);
        assert_eq!(c.deck().current_index(), 1);

        // 5000ms since start, but only 2000ms since the key press
        assert!(!c.is_animating());
        c.advance(Duration::from_millis(2000));
        assert_eq!(c.phase(), Phase::Transitioning { target: 2 });
    }

    #[test]
    fn test_hidden_document_pauses_autoplay() {
        let mut c = carousel(&["A", "B", "C"]);
        c.handle(InputEvent::Visibility { visible: false });
        assert!(!c.autoplay_running());
        c.advance(AUTOPLAY_DELAY * 3);
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.deck().current_index(), 0);

        c.handle(InputEvent::Visibility { visible: true });
        c.advance(AUTOPLAY_DELAY - Duration::from_millis(1));
        assert_eq!(c.phase(), Phase::Idle);
        c.advance(Duration::from_millis(1));
        assert!(c.is_animating());
    }

    #[test]
    fn test_unmeasured_track_builds_on_first_resize() {
        let mut c = Carousel::new(deck(&["A", "B", "C"]), Scene::new(), Settings::default());
        assert!(c.track_slots().is_empty());

        // transitions still run for title and backdrop
        c.go(Direction::Next);
        c.advance(SETTLE);
        assert_eq!(c.deck().current_index(), 1);
        assert!(c.track_slots().is_empty());

        let track = c.regions().track;
        c.stage_mut().set_extent(track, 400.0);
        c.handle(InputEvent::Resize);
        assert_eq!(steps(&c), vec![-1, 0, 1]);
        let centre = c.track_slots().iter().find(|s| s.step == 0).unwrap();
        assert_eq!(centre.slide, 1);
    }

    #[test]
    fn test_resize_repositions_after_settling() {
        let mut c = carousel(&["A", "B", "C"]);
        let track = c.regions().track;
        c.stage_mut().set_extent(track, 300.0);
        c.handle(InputEvent::Resize);

        let top = c.track_slots().iter().find(|s| s.step == -1).unwrap().node;
        assert_eq!(c.stage().prop(top, Prop::Y), Some(-300.0));
        c.advance(Duration::from_millis(300));
        assert_eq!(c.stage().prop(top, Prop::Y), Some(-150.0));
    }

    #[test]
    fn test_resize_settling_mid_transition_is_skipped() {
        let mut c = carousel(&["A", "B", "C"]);
        c.go(Direction::Next);
        let track = c.regions().track;
        c.stage_mut().set_extent(track, 300.0);
        c.handle(InputEvent::Resize);

        c.advance(Duration::from_millis(400));
        assert!(c.is_animating());
        c.advance(SETTLE);
        assert!(!c.is_animating());

        // the fan keeps the geometry the transition started with
        let top = c.track_slots().iter().find(|s| s.step == -1).unwrap().node;
        assert!((c.stage().prop(top, Prop::Y).unwrap() - -300.0).abs() < 1e-9);

        c.handle(InputEvent::Resize);
        c.advance(RESIZE_SETTLE);
        assert_eq!(c.stage().prop(top, Prop::Y), Some(-150.0));
    }

    #[test]
    fn test_autoplay_due_mid_transition_is_dropped() {
        let mut c = carousel_with(
            &["A", "B", "C", "D"],
            Settings {
                autoplay_delay: Duration::from_millis(1000),
                ..Settings::default()
            },
        );
        let frame = Duration::from_millis(50);
        let mut commits = Vec::new();
        let mut last = c.deck().current_index();

        // fires at 1000ms, comes due again at 2000ms while still moving
        for i in 1..=59u64 {
            c.advance(frame);
            let now = i * 50;
            let index = c.deck().current_index();
            if index != last {
                commits.push((now, index));
                last = index;
            }
            if (2300..3000).contains(&now) {
                assert_eq!(c.phase(), Phase::Idle, "queued firing ran at {now}ms");
            }
        }
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].1, 1);

        c.advance(frame);
        assert_eq!(c.phase(), Phase::Transitioning { target: 2 });
    }

    #[test]
    fn test_is_moving_tracks_every_tween() {
        let mut c = carousel(&["A", "B", "C"]);
        assert!(!c.is_moving());

        c.handle(InputEvent::PointerMove(Point::new(5.0, 5.0)));
        assert!(c.is_moving());
        assert!(c.advance(Duration::from_secs(1)));
        assert!(!c.is_moving());
        assert!(!c.advance(Duration::from_millis(16)));

        c.go(Direction::Next);
        assert!(c.is_moving());
        assert!(c.advance(SETTLE));
        assert!(!c.is_moving());

        // a settled resize repaints without any tween running
        let track = c.regions().track;
        c.stage_mut().set_extent(track, 300.0);
        c.handle(InputEvent::Resize);
        assert!(!c.advance(Duration::from_millis(100)));
        assert!(c.advance(RESIZE_SETTLE));
    }

    #[test]
    fn test_pointer_drives_cursor() {
        let mut c = carousel(&["A", "B"]);
        let cursor = c.regions().cursor;
        c.handle(InputEvent::PointerMove(Point::new(10.0, 20.0)));
        c.advance(Duration::from_secs(1));
        assert_eq!(c.stage().prop(cursor, Prop::Opacity), Some(1.0));
        assert_eq!(c.stage().prop(cursor, Prop::X), Some(10.0));

        c.handle(InputEvent::PointerLeave);
        c.advance(Duration::from_secs(1));
        assert_eq!(c.stage().prop(cursor, Prop::Opacity), Some(0.0));
    }
}
