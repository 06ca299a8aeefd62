use crate::carousel::Deck;
use gdk_pixbuf::{InterpType, Pixbuf};
use std::cell::RefCell;
use std::collections::HashMap;

/// Decode size for card images.
pub const CARD_WIDTH: i32 = 600;
pub const CARD_HEIGHT: i32 = 420;

/// Decoded card images plus down-sampled copies standing in for blur. The
/// card transform scales a small copy back up to full size.
pub struct Gallery {
    images: Vec<Option<Pixbuf>>,
    blurred: RefCell<HashMap<(usize, u32), Pixbuf>>,
}

impl Gallery {
    pub fn load(deck: &Deck) -> Self {
        let images = deck
            .slides()
            .iter()
            .map(|slide| {
                match Pixbuf::from_file_at_scale(&slide.image, CARD_WIDTH, CARD_HEIGHT, true) {
                    Ok(pixbuf) => Some(pixbuf),
                    Err(e) => {
                        log::warn!(
                            "Failed to load image for '{}' from {}: {}",
                            slide.name,
                            slide.image.display(),
                            e
                        );
                        None
                    }
                }
            })
            .collect();

        Self {
            images,
            blurred: RefCell::new(HashMap::new()),
        }
    }

    /// The image for `slide` softened by roughly `blur` pixels, or `None` if
    /// it never loaded.
    pub fn image(&self, slide: usize, blur: f64) -> Option<Pixbuf> {
        let sharp = self.images.get(slide)?.as_ref()?;
        let radius = blur.round().max(0.0) as u32;
        if radius == 0 {
            return Some(sharp.clone());
        }

        let mut cache = self.blurred.borrow_mut();
        if let Some(pixbuf) = cache.get(&(slide, radius)) {
            return Some(pixbuf.clone());
        }
        let factor = shrink_factor(radius);
        let (w, h) = (
            ((sharp.width() as f64 * factor) as i32).max(1),
            ((sharp.height() as f64 * factor) as i32).max(1),
        );
        let small = sharp.scale_simple(w, h, InterpType::Bilinear)?;
        cache.insert((slide, radius), small.clone());
        Some(small)
    }
}

fn shrink_factor(radius: u32) -> f64 {
    1.0 / (1.0 + radius as f64 / 2.0)
}
