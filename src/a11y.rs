//! Accessibility attribute sync.
//!
//! Given the active index, every slide except the active one is hidden from
//! assistive technology and its links leave the tab order; every indicator
//! except the active slide's is enabled. The result depends only on the
//! collections and the index, so calling [`sync`] twice is the same as
//! calling it once.

use crate::carousel::Indicator;
use crate::slide::Slide;
use tracing::debug;

/// Apply the attribute state for `active`.
///
/// Returns false without touching anything when no slide has index `active`.
pub fn sync(slides: &mut [Slide], indicators: &mut [Indicator], active: usize) -> bool {
    if active >= slides.len() {
        debug!(active, slides = slides.len(), "sync skipped: no slide at index");
        return false;
    }

    for (idx, slide) in slides.iter_mut().enumerate() {
        let is_active = idx == active;
        slide.hidden = !is_active;
        slide.links_focusable = is_active;
    }

    for indicator in indicators.iter_mut() {
        indicator.disabled = indicator.target() == active;
    }

    true
}
