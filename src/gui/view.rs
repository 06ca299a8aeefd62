use super::gallery::{CARD_HEIGHT, CARD_WIDTH, Gallery};
use crate::carousel::Carousel;
use crate::events::Point;
use crate::gui::theme::ThemeColors;
use crate::stage::{Node, NodeId, NodeKind, Scene, Stage};
use cairo::Context;
use gdk4::prelude::*;
use palette::Srgba;
use std::f64::consts::PI;

pub const TITLE_SCALE: f64 = 0.14; // font size relative to window height
pub const TITLE_LINE_HEIGHT: f64 = 1.1;
pub const TITLE_LEFT: f64 = 0.08; // fraction of window width
pub const TRACK_CENTER_X: f64 = 0.64;
pub const TRACK_FRACTION: f64 = 0.8; // track height relative to window height
pub const CARD_FRACTION: f64 = 0.42; // card height relative to track height
pub const CURSOR_ARM: f64 = 10.0;

/// Window-space geometry for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub title_origin: Point,
    pub title_height: f64,
    pub track_center: Point,
    pub track_height: f64,
    pub card_width: f64,
    pub card_height: f64,
}

impl Layout {
    pub fn new(width: f64, height: f64) -> Self {
        let (width, height) = (width.max(0.0), height.max(0.0));
        let font_size = height * TITLE_SCALE;
        let title_height = font_size * TITLE_LINE_HEIGHT;
        let track_height = height * TRACK_FRACTION;
        let card_height = (track_height * CARD_FRACTION).min(CARD_HEIGHT as f64);
        let card_width = card_height * CARD_WIDTH as f64 / CARD_HEIGHT as f64;

        Self {
            width,
            height,
            font_size,
            title_origin: Point::new(width * TITLE_LEFT, (height - title_height) / 2.0),
            title_height,
            track_center: Point::new(width * TRACK_CENTER_X, height / 2.0),
            track_height,
            card_width,
            card_height,
        }
    }
}

pub fn draw(
    cr: &Context,
    carousel: &Carousel<Scene>,
    gallery: &Gallery,
    layout: &Layout,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let scene = carousel.stage();
    let regions = carousel.regions();

    draw_backdrop(cr, scene, regions.backdrop, layout, colors)?;
    draw_track(cr, carousel, gallery, layout, colors)?;
    draw_title(cr, scene, regions.title, layout, colors)?;
    draw_cursor(cr, scene, regions.cursor, colors)
}

fn set_source(cr: &Context, color: Srgba<f64>, opacity: f64) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a * opacity);
}

fn draw_backdrop(
    cr: &Context,
    scene: &Scene,
    node: NodeId,
    layout: &Layout,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let color = scene
        .color(node)
        .map(|c| Srgba::new(c.red, c.green, c.blue, 1.0))
        .unwrap_or(colors.backdrop);
    set_source(cr, color, 1.0);
    cr.rectangle(0.0, 0.0, layout.width, layout.height);
    cr.fill()
}

fn draw_track(
    cr: &Context,
    carousel: &Carousel<Scene>,
    gallery: &Gallery,
    layout: &Layout,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let scene = carousel.stage();
    let mut cards: Vec<&Node> = scene
        .children(carousel.regions().track)
        .into_iter()
        .filter_map(|id| scene.node(id))
        .collect();
    cards.sort_by_key(|node| node.style.z_index);

    for node in cards {
        let NodeKind::Card { slide } = node.kind else {
            continue;
        };
        let style = node.style;
        if style.opacity <= 0.0 {
            continue;
        }

        cr.save()?;
        cr.translate(
            layout.track_center.x + style.x,
            layout.track_center.y + style.y,
        );
        cr.rotate(style.rotation.to_radians());
        cr.scale(style.scale, style.scale);
        cr.translate(-layout.card_width / 2.0, -layout.card_height / 2.0);

        match gallery.image(slide, style.blur) {
            Some(pixbuf) => {
                cr.scale(
                    layout.card_width / pixbuf.width() as f64,
                    layout.card_height / pixbuf.height() as f64,
                );
                cr.set_source_pixbuf(&pixbuf, 0.0, 0.0);
                cr.paint_with_alpha(style.opacity)?;
            }
            None => {
                let backdrop = carousel.deck().slide(slide).backdrop();
                let fill = Srgba::new(backdrop.red, backdrop.green, backdrop.blue, 1.0);
                cr.rectangle(0.0, 0.0, layout.card_width, layout.card_height);
                set_source(cr, fill, style.opacity);
                cr.fill_preserve()?;
                set_source(cr, colors.card_edge, style.opacity);
                cr.set_line_width(2.0);
                cr.stroke()?;
            }
        }
        cr.restore()?;
    }
    Ok(())
}

fn draw_title(
    cr: &Context,
    scene: &Scene,
    title: NodeId,
    layout: &Layout,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let height = match scene.extent(title) {
        h if h > 0.0 => h,
        _ => layout.title_height,
    };
    let (left, top) = (layout.title_origin.x, layout.title_origin.y);

    cr.save()?;
    cr.rectangle(left, top, layout.width - left, height);
    cr.clip();
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(layout.font_size);
    let baseline = top + layout.font_size;

    // overlaid lines share one origin; at rest there is only one
    for line in scene.children(title) {
        let mut pen = left;
        for glyph in scene.children(line) {
            let Some(node) = scene.node(glyph) else {
                continue;
            };
            let NodeKind::Glyph(ch) = node.kind else {
                continue;
            };
            let text = ch.to_string();
            let advance = cr.text_extents(&text)?.x_advance();
            set_source(cr, colors.title, node.style.opacity);
            cr.move_to(pen + node.style.x, baseline + node.style.y);
            cr.show_text(&text)?;
            pen += advance;
        }
    }
    cr.restore()
}

fn draw_cursor(
    cr: &Context,
    scene: &Scene,
    node: NodeId,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let Some(node) = scene.node(node) else {
        return Ok(());
    };
    let style = node.style;
    if style.opacity <= 0.0 {
        return Ok(());
    }

    set_source(cr, colors.cursor, style.opacity);
    cr.set_line_width(1.5);
    cr.move_to(style.x - CURSOR_ARM, style.y);
    cr.line_to(style.x + CURSOR_ARM, style.y);
    cr.move_to(style.x, style.y - CURSOR_ARM);
    cr.line_to(style.x, style.y + CURSOR_ARM);
    cr.stroke()?;
    cr.arc(style.x, style.y, CURSOR_ARM * 2.0, 0.0, 2.0 * PI);
    set_source(cr, colors.cursor, style.opacity * 0.3);
    cr.stroke()
}
