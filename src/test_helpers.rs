//! Shared test utilities for the carousel-deck test suite.
//!
//! Row builders cover the shapes the assembler distinguishes (title rows,
//! image-only rows, split image/text rows, empty rows), and
//! [`carousel_with_slides`] gives a ready-assembled carousel with indicators
//! for tests that only care about navigation or tracking.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let carousel = carousel_with_slides(3);
//! assert_eq!(carousel.active_index(), 0);
//! assert_single_disabled(&carousel, 0);
//! ```

use crate::assembler::assemble_with_labels;
use crate::carousel::{Carousel, CarouselId};
use crate::rows::Row;
use crate::strings::Labels;
use crate::tracker::VisibilityEntry;

/// The id every test carousel uses.
pub fn test_id() -> CarouselId {
    CarouselId::new("test").unwrap()
}

/// A heading-only row, detached as the title when first.
pub fn title_row(text: &str) -> Row {
    Row::from_markdown([format!("## {text}")])
}

/// A single-picture row (image-only slide).
pub fn image_row(src: &str) -> Row {
    Row::from_markdown([format!("![{src}]({src})")])
}

/// Picture plus text with a heading and a link (multi-column slide).
pub fn split_row(src: &str, heading: &str) -> Row {
    Row::from_markdown([
        format!("![{src}]({src})"),
        format!("### {heading}\n\nSome words. [More](/{src})"),
    ])
}

/// A carousel of `n` split slides with default labels, slide 0 active.
pub fn carousel_with_slides(n: usize) -> Carousel {
    let rows = (0..n)
        .map(|i| split_row(&format!("{i}.jpg"), &format!("Slide {i}")))
        .collect();
    assemble_with_labels(rows, Labels::default(), test_id())
}

/// Build a visibility batch from `(slide, ratio)` pairs.
pub fn deck_entries(pairs: &[(usize, f64)]) -> Vec<VisibilityEntry> {
    pairs
        .iter()
        .map(|&(slide, ratio)| VisibilityEntry { slide, ratio })
        .collect()
}

/// Assert that exactly the indicator targeting `active` is disabled.
pub fn assert_single_disabled(carousel: &Carousel, active: usize) {
    let disabled: Vec<usize> = carousel
        .indicators()
        .iter()
        .filter(|i| i.is_disabled())
        .map(|i| i.target())
        .collect();
    assert_eq!(
        disabled,
        vec![active],
        "expected only indicator {active} disabled, got {disabled:?}"
    );
}
