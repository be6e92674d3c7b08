//! Viewport-driven active slide tracking.
//!
//! The tracker remembers the last reported visibility ratio of every slide.
//! A slide becomes active when its ratio rises from below the threshold to
//! at-or-above it. Falling ratios never commit anything, so two half-visible
//! slides mid-scroll don't fight over the active state.
//!
//! Entries in one batch are applied in order; if several slides cross in the
//! same batch, the last one wins.
//!
//! This is the only code path that changes [`Carousel::active_index`].

use crate::carousel::Carousel;
use tracing::{debug, warn};

/// Visibility threshold used when none is configured.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Visible fraction (0.0..=1.0) of one slide's area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEntry {
    pub slide: usize,
    pub ratio: f64,
}

#[derive(Debug, Clone)]
pub struct ActiveSlideTracker {
    threshold: f64,
    ratios: Vec<f64>,
}

impl ActiveSlideTracker {
    pub fn new(slide_count: usize, threshold: f64) -> Self {
        Self {
            threshold,
            ratios: vec![0.0; slide_count],
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Last ratio reported for `slide`.
    pub fn ratio(&self, slide: usize) -> Option<f64> {
        self.ratios.get(slide).copied()
    }

    /// Apply a batch of visibility notifications.
    ///
    /// Returns the index committed last in this batch, if any.
    pub fn observe(&mut self, carousel: &mut Carousel, entries: &[VisibilityEntry]) -> Option<usize> {
        let mut committed = None;
        for entry in entries {
            let Some(previous) = self.ratios.get_mut(entry.slide) else {
                warn!(carousel = %carousel.id(), slide = entry.slide, "visibility entry for unknown slide");
                continue;
            };
            let crossed_up = *previous < self.threshold && entry.ratio >= self.threshold;
            *previous = entry.ratio;

            if crossed_up && carousel.commit(entry.slide) {
                debug!(carousel = %carousel.id(), slide = entry.slide, ratio = entry.ratio, "active slide committed");
                committed = Some(entry.slide);
            }
        }
        committed
    }
}
