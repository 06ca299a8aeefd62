use crate::events::{InputEvent, Key};
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use std::cell::Cell;
use std::time::Duration;

/// Longest step handed to the carousel in one frame.
pub const MAX_FRAME: Duration = Duration::from_millis(100);

pub fn prefers_reduced_motion() -> bool {
    gtk::Settings::default()
        .map(|s| !s.property::<bool>("gtk-enable-animations"))
        .unwrap_or(false)
}

const ARROWS: [(gdk::Key, Key); 8] = [
    (gdk::Key::Up, Key::Up),
    (gdk::Key::KP_Up, Key::Up),
    (gdk::Key::Down, Key::Down),
    (gdk::Key::KP_Down, Key::Down),
    (gdk::Key::Left, Key::Left),
    (gdk::Key::KP_Left, Key::Left),
    (gdk::Key::Right, Key::Right),
    (gdk::Key::KP_Right, Key::Right),
];

pub fn arrow_key(key: gdk::Key) -> Option<Key> {
    ARROWS
        .iter()
        .find_map(|(k, arrow)| (*k == key).then_some(*arrow))
}

/// Wheel and touch-swipe sources for the carousel.
pub fn attach_gestures<F>(area: &gtk::DrawingArea, emit: F)
where
    F: Fn(InputEvent) + Clone + 'static,
{
    let scroll = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL);
    let on_scroll = emit.clone();
    scroll.connect_scroll(move |_, _, dy| {
        on_scroll(InputEvent::Wheel { delta_y: dy });
        glib::Propagation::Stop
    });
    area.add_controller(scroll);

    let drag = gtk::GestureDrag::new();
    drag.set_touch_only(true);
    let on_begin = emit.clone();
    drag.connect_drag_begin(move |_, _, y| {
        on_begin(InputEvent::TouchStart { y });
    });
    drag.connect_drag_end(move |gesture, _, offset_y| {
        if let Some((_, start_y)) = gesture.start_point() {
            emit(InputEvent::TouchEnd {
                y: start_y + offset_y,
            });
        }
    });
    area.add_controller(drag);
}

/// Calls `on_frame` once per frame with the time since the previous one.
pub fn start_frame_clock<F>(area: &gtk::DrawingArea, on_frame: F)
where
    F: Fn(Duration) + 'static,
{
    let last = Cell::new(None::<i64>);
    area.add_tick_callback(move |_, clock| {
        let now = clock.frame_time();
        if let Some(prev) = last.replace(Some(now)) {
            on_frame(frame_step(prev, now));
        }
        glib::ControlFlow::Continue
    });
}

fn frame_step(prev_us: i64, now_us: i64) -> Duration {
    let elapsed = Duration::from_micros(now_us.saturating_sub(prev_us).max(0) as u64);
    elapsed.min(MAX_FRAME)
}
