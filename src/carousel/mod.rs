use std::time::Duration;

pub mod autoplay;
pub mod controller;
pub mod cursor;
pub mod deck;
pub mod input;
pub mod title;
pub mod track;

pub use controller::{Carousel, Phase, Regions};
pub use deck::{Deck, DeckError, Direction, Slide, SlideName};
pub use track::{Placement, Pose, TrackSlot};

use crate::stage::NodeId;

pub const MIN_SLIDES: usize = 2;
pub const AUTOPLAY_DELAY: Duration = Duration::from_millis(4000);
pub const SWIPE_THROTTLE: Duration = Duration::from_millis(1800); // wheel and touch share it
pub const SWIPE_THRESHOLD: f64 = 40.0; // px of vertical travel
pub const RESIZE_SETTLE: Duration = Duration::from_millis(300);

pub const TITLE_DURATION: Duration = Duration::from_millis(1000);
pub const TITLE_STAGGER: Duration = Duration::from_millis(40);
pub const TRACK_DURATION: Duration = Duration::from_millis(1200);
pub const BACKDROP_DURATION: Duration = Duration::from_millis(1200);
pub const REDUCED_DURATION: Duration = Duration::from_millis(10);

pub const CURSOR_FADE: Duration = Duration::from_millis(300);
pub const CURSOR_FOLLOW: Duration = Duration::from_millis(500);

/// Completion signals routed back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    TitleSettled { outgoing: NodeId, incoming: NodeId },
    TrackSettled,
    Arrived { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub autoplay_delay: Duration,
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autoplay_delay: AUTOPLAY_DELAY,
            reduced_motion: false,
        }
    }
}

/// Transition timings. Reduced motion only shortens them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub title: Duration,
    pub title_stagger: Duration,
    pub track: Duration,
    pub backdrop: Duration,
}

impl Motion {
    pub fn new(reduced: bool) -> Self {
        if reduced {
            Self {
                title: REDUCED_DURATION,
                title_stagger: Duration::ZERO,
                track: REDUCED_DURATION,
                backdrop: REDUCED_DURATION,
            }
        } else {
            Self {
                title: TITLE_DURATION,
                title_stagger: TITLE_STAGGER,
                track: TRACK_DURATION,
                backdrop: BACKDROP_DURATION,
            }
        }
    }
}
