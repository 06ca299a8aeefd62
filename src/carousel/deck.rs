use derive_more::{AsRef, Deref, Display, From, Into};
use palette::Srgb;
use std::path::PathBuf;
use strum::Display as StrumDisplay;
use thiserror::Error;

use super::MIN_SLIDES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    pub fn sign(self) -> i64 {
        match self {
            Self::Next => 1,
            Self::Prev => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct SlideName(String);

crate::impl_string_newtype!(SlideName);

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub name: SlideName,
    pub color: Srgb<u8>,
    pub image: PathBuf,
}

impl Slide {
    pub fn new(name: impl Into<String>, color: Srgb<u8>, image: impl Into<PathBuf>) -> Self {
        Self {
            name: SlideName::new(name),
            color,
            image: image.into(),
        }
    }

    pub fn backdrop(&self) -> Srgb<f64> {
        self.color.into_format()
    }
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("a deck needs at least two slides, got {0}")]
    TooFewSlides(usize),
}

/// The fixed ring of slides and which one has focus.
#[derive(Debug, Clone)]
pub struct Deck {
    slides: Vec<Slide>,
    current: usize,
}

impl Deck {
    pub fn new(slides: Vec<Slide>) -> Result<Self, DeckError> {
        if slides.len() < MIN_SLIDES {
            return Err(DeckError::TooFewSlides(slides.len()));
        }
        Ok(Self { slides, current: 0 })
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide(&self, index: usize) -> &Slide {
        &self.slides[index % self.slides.len()]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.current]
    }

    /// `(current + direction * offset) mod len`, always in `[0, len)`.
    pub fn neighbor_index(&self, direction: Direction, offset: usize) -> usize {
        self.wrap(self.current as i64 + direction.sign() * offset as i64)
    }

    pub fn wrap(&self, index: i64) -> usize {
        index.rem_euclid(self.slides.len() as i64) as usize
    }

    pub fn commit(&mut self, index: usize) {
        self.current = index % self.slides.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(n: usize) -> Deck {
        let slides = (0..n)
            .map(|i| Slide::new(format!("S{i}"), Srgb::new(i as u8, 0, 0), format!("{i}.jpg")))
            .collect();
        Deck::new(slides).unwrap()
    }

    #[test]
    fn test_rejects_single_slide() {
        let slides = vec![Slide::new("Solo", Srgb::new(0, 0, 0), "solo.jpg")];
        assert!(matches!(Deck::new(slides), Err(DeckError::TooFewSlides(1))));
    }

    #[test]
    fn test_neighbor_index_wraps_both_ways() {
        let mut d = deck(4);
        assert_eq!(d.neighbor_index(Direction::Prev, 1), 3);
        assert_eq!(d.neighbor_index(Direction::Prev, 2), 2);
        assert_eq!(d.neighbor_index(Direction::Next, 2), 2);
        d.commit(3);
        assert_eq!(d.neighbor_index(Direction::Next, 1), 0);
        assert_eq!(d.neighbor_index(Direction::Next, 2), 1);
    }

    #[test]
    fn test_two_slide_deck_wraps_offsets_past_len() {
        let d = deck(2);
        assert_eq!(d.neighbor_index(Direction::Next, 2), 0);
        assert_eq!(d.neighbor_index(Direction::Prev, 2), 0);
        assert_eq!(d.neighbor_index(Direction::Prev, 1), 1);
    }

    #[test]
    fn test_settled_index_matches_sum_of_directions() {
        let moves = [1i64, 1, -1, -1, -1, -1, -1, 1, -1, 1, 1, 1, 1];
        for n in 2..7 {
            let mut d = deck(n);
            for m in moves {
                let dir = if m > 0 { Direction::Next } else { Direction::Prev };
                let next = d.neighbor_index(dir, 1);
                d.commit(next);
                assert!(d.current_index() < n);
            }
            let sum: i64 = moves.iter().sum();
            assert_eq!(d.current_index(), sum.rem_euclid(n as i64) as usize);
        }
    }

    #[test]
    fn test_direction_displays_lowercase() {
        assert_eq!(Direction::Next.to_string(), "next");
        assert_eq!(Direction::Prev.to_string(), "prev");
    }
}
