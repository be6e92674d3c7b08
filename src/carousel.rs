//! The carousel entity: the single source of truth for a deck's state.
//!
//! A [`Carousel`] owns its slides and indicators exclusively and holds the
//! active slide index. Rendered output is a projection of this struct (see
//! [`crate::render`]); nothing is ever read back from markup.
//!
//! `active_index` changes only through [`Carousel::commit`], which the
//! visibility tracker calls when a slide crosses the threshold. Navigation
//! requests never write it.

use crate::a11y;
use crate::rows::Region;
use crate::slide::Slide;
use crate::strings::Labels;
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum IdError {
    #[error("carousel id must not be empty")]
    Empty,
    #[error("invalid carousel id {0:?}: use ASCII letters, digits, '-' or '_'")]
    InvalidCharacters(String),
}

/// Length of minted ids (hex characters).
const MINTED_ID_LEN: usize = 12;

/// Unique identity of one carousel, used to derive element ids.
///
/// Supplied by the caller; [`CarouselId::random`] and
/// [`CarouselId::from_content`] mint one when the author didn't.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CarouselId(String);

impl CarouselId {
    pub fn new(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(IdError::Empty);
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(IdError::InvalidCharacters(raw));
        }
        Ok(Self(raw))
    }

    /// Random id from a v4 UUID.
    pub fn random() -> Self {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        Self(uuid[..MINTED_ID_LEN].to_string())
    }

    /// Deterministic id from content: same deck text, same element ids.
    pub fn from_content(content: &[u8]) -> Self {
        let digest = Sha256::digest(content);
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        Self(hex[..MINTED_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the carousel's root element.
    pub fn element_id(&self) -> String {
        format!("carousel-{}", self.0)
    }

    /// Id of the slide element at `position`.
    pub fn slide_element_id(&self, position: usize) -> String {
        format!("carousel-{}-slide-{}", self.0, position)
    }
}

impl fmt::Display for CarouselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Direct-navigation marker for one slide.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    target: usize,
    label: String,
    pub(crate) disabled: bool,
}

impl Indicator {
    pub(crate) fn new(target: usize, label: String) -> Self {
        Self {
            target,
            label,
            disabled: false,
        }
    }

    /// Index of the slide this indicator activates.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Accessible label, e.g. "Show Slide 2 of 5".
    pub fn label(&self) -> &str {
        &self.label
    }

    /// True exactly when `target` is the active slide.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

#[derive(Debug, Clone)]
pub struct Carousel {
    id: CarouselId,
    title: Option<Region>,
    slides: Vec<Slide>,
    indicators: Vec<Indicator>,
    active_index: usize,
    labels: Labels,
}

impl Carousel {
    pub(crate) fn new(
        id: CarouselId,
        title: Option<Region>,
        slides: Vec<Slide>,
        indicators: Vec<Indicator>,
        labels: Labels,
    ) -> Self {
        Self {
            id,
            title,
            slides,
            indicators,
            active_index: 0,
            labels,
        }
    }

    pub fn id(&self) -> &CarouselId {
        &self.id
    }

    /// Heading row detached from the deck, rendered before it.
    pub fn title(&self) -> Option<&Region> {
        self.title.as_ref()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_slide(&self) -> Option<&Slide> {
        self.slides.get(self.active_index)
    }

    /// No slides: nothing to navigate, nothing to track.
    pub fn is_inert(&self) -> bool {
        self.slides.is_empty()
    }

    /// Prev/next buttons, indicators and visibility tracking exist only
    /// for decks with more than one slide.
    pub fn has_navigation(&self) -> bool {
        self.slides.len() > 1
    }

    pub(crate) fn slide_mut(&mut self, index: usize) -> Option<&mut Slide> {
        self.slides.get_mut(index)
    }

    /// Make `index` the active slide and resync accessibility attributes.
    ///
    /// Returns false (and changes nothing) when no slide has that index.
    pub(crate) fn commit(&mut self, index: usize) -> bool {
        if !a11y::sync(&mut self.slides, &mut self.indicators, index) {
            return false;
        }
        self.active_index = index;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_accepts_html_safe_characters() {
        let id = CarouselId::new("spring_2024-a").unwrap();
        assert_eq!(id.as_str(), "spring_2024-a");
        assert_eq!(id.to_string(), "spring_2024-a");
    }

    #[test]
    fn id_rejects_empty() {
        assert_eq!(CarouselId::new(""), Err(IdError::Empty));
    }

    #[test]
    fn id_rejects_spaces_and_quotes() {
        assert!(matches!(
            CarouselId::new("a b"),
            Err(IdError::InvalidCharacters(_))
        ));
        assert!(CarouselId::new("a\"b").is_err());
    }

    #[test]
    fn element_ids() {
        let id = CarouselId::new("x1").unwrap();
        assert_eq!(id.element_id(), "carousel-x1");
        assert_eq!(id.slide_element_id(3), "carousel-x1-slide-3");
    }

    #[test]
    fn random_ids_differ() {
        let a = CarouselId::random();
        let b = CarouselId::random();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), MINTED_ID_LEN);
        assert!(CarouselId::new(a.as_str()).is_ok());
    }

    #[test]
    fn content_ids_are_deterministic() {
        let a = CarouselId::from_content(b"deck one");
        let b = CarouselId::from_content(b"deck one");
        let c = CarouselId::from_content(b"deck two");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), MINTED_ID_LEN);
    }
}
