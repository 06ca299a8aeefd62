use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

/// Named colours the stylesheet defines; a user theme may redefine any of them.
const TITLE: &str = "slider_title";
const CURSOR: &str = "slider_cursor";
const CARD_EDGE: &str = "slider_card_edge";
const BACKDROP: &str = "slider_backdrop";

const STYLESHEET: &str = "
@define-color slider_title rgba(255, 255, 255, 0.95);
@define-color slider_cursor rgba(255, 255, 255, 0.9);
@define-color slider_card_edge rgba(255, 255, 255, 0.25);
@define-color slider_backdrop #1a1a1a;

.slider-window, .slider-surface {
    background: none;
}
";

pub struct ThemeColors {
    pub title: Srgba<f64>,
    pub cursor: Srgba<f64>,
    pub backdrop: Srgba<f64>,
    pub card_edge: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            title: Srgba::new(1.0, 1.0, 1.0, 0.95),
            cursor: Srgba::new(1.0, 1.0, 1.0, 0.9),
            backdrop: Srgba::new(0.1, 0.1, 0.1, 1.0),
            card_edge: Srgba::new(1.0, 1.0, 1.0, 0.25),
        }
    }
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let fallback = Self::default();
        let named = |name: &str, fallback: Srgba<f64>| {
            context.lookup_color(name).map(to_srgba).unwrap_or(fallback)
        };
        Self {
            title: named(TITLE, fallback.title),
            cursor: named(CURSOR, fallback.cursor),
            backdrop: named(BACKDROP, fallback.backdrop),
            card_edge: named(CARD_EDGE, fallback.card_edge),
        }
    }
}

fn to_srgba(c: gdk::RGBA) -> Srgba<f64> {
    Srgba::new(
        c.red().into(),
        c.green().into(),
        c.blue().into(),
        c.alpha().into(),
    )
}

/// Installs the stylesheet and hides the system pointer over `surface`, where
/// the drawn cursor replaces it.
pub fn install(surface: &gtk::DrawingArea) {
    let provider = gtk::CssProvider::new();
    provider.load_from_data(STYLESHEET);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
    surface.set_cursor_from_name(Some("none"));
}
