//! Navigation intents and the viewport they scroll.
//!
//! [`NavigationController::show`] resolves a requested index with modular
//! wraparound, makes the target slide's links focusable straight away, and
//! asks the [`Viewport`] to scroll the target's leading edge to the start.
//! It never changes the active index. Whether the slide actually became
//! active is reported later by the viewport's visibility notifications (see
//! [`crate::tracker`]).
//!
//! The [`Viewport`] trait is the seam to the host: a browser binding, a test
//! double, or [`PagedViewport`], which models a horizontally paged strip of
//! equal-width slides and is what the CLI simulator uses.

use crate::carousel::Carousel;
use crate::tracker::VisibilityEntry;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
    Jump,
}

/// A single navigation intent. Consumed immediately, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationRequest {
    pub direction: Direction,
    pub target_index: isize,
}

impl NavigationRequest {
    pub fn prev(active: usize) -> Self {
        Self {
            direction: Direction::Prev,
            target_index: active as isize - 1,
        }
    }

    pub fn next(active: usize) -> Self {
        Self {
            direction: Direction::Next,
            target_index: active as isize + 1,
        }
    }

    pub fn jump(target: usize) -> Self {
        Self {
            direction: Direction::Jump,
            target_index: target as isize,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// Scroll the viewport so `slide` starts at its leading edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub slide: usize,
    pub left: f64,
    /// `None` leaves the vertical offset unchanged.
    pub top: Option<f64>,
    pub behavior: ScrollBehavior,
}

/// Host surface that scrolls slides and reports their visibility.
pub trait Viewport {
    /// Horizontal offset of a slide's leading edge, if the viewport knows the slide.
    fn leading_edge(&self, slide: usize) -> Option<f64>;

    /// Start a scroll. Completion is never awaited.
    fn scroll_to(&mut self, request: ScrollRequest);

    /// Register a slide for visibility notifications.
    fn observe(&mut self, slide: usize);

    /// Drop every visibility registration.
    fn disconnect(&mut self);
}

/// Wrap `index` into `0..count`. `None` when there is nothing to wrap into.
pub fn wrap_index(index: isize, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    Some(index.rem_euclid(count as isize) as usize)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationController {
    behavior: ScrollBehavior,
}

impl NavigationController {
    pub fn new(behavior: ScrollBehavior) -> Self {
        Self { behavior }
    }

    /// Handle a navigation intent.
    pub fn request<V: Viewport + ?Sized>(
        &self,
        carousel: &mut Carousel,
        viewport: &mut V,
        request: NavigationRequest,
    ) -> Option<ScrollRequest> {
        debug!(direction = ?request.direction, target = request.target_index, "navigation request");
        self.show(carousel, viewport, request.target_index)
    }

    /// Scroll to the slide at `index` (wrapped).
    ///
    /// Returns the scroll that was issued, or `None` when the carousel has
    /// no slides or the viewport can't place the target. Neither case is
    /// an error; both are logged and leave everything untouched.
    pub fn show<V: Viewport + ?Sized>(
        &self,
        carousel: &mut Carousel,
        viewport: &mut V,
        index: isize,
    ) -> Option<ScrollRequest> {
        let Some(target) = wrap_index(index, carousel.slide_count()) else {
            warn!(carousel = %carousel.id(), "no carousel slides found");
            return None;
        };

        let Some(left) = viewport.leading_edge(target) else {
            warn!(carousel = %carousel.id(), target, "active slide not found at index");
            return None;
        };

        let slide = carousel.slide_mut(target)?;
        slide.links_focusable = true;

        let scroll = ScrollRequest {
            slide: target,
            left,
            top: None,
            behavior: self.behavior,
        };
        debug!(carousel = %carousel.id(), target, left, "scroll requested");
        viewport.scroll_to(scroll);
        Some(scroll)
    }
}

// =============================================================================
// Paged viewport
// =============================================================================

/// A horizontal strip of equal-width slides seen through a one-slide window.
///
/// Scroll requests are queued like an in-flight animation; [`settle`]
/// finishes the latest one and reports the visibility ratio of every
/// observed slide. A newer request simply replaces an unfinished one.
///
/// [`settle`]: PagedViewport::settle
#[derive(Debug, Clone)]
pub struct PagedViewport {
    slide_width: f64,
    slide_count: usize,
    scroll_left: f64,
    pending: Option<ScrollRequest>,
    observed: Vec<usize>,
    history: Vec<ScrollRequest>,
}

impl PagedViewport {
    pub fn new(slide_count: usize, slide_width: f64) -> Self {
        Self {
            slide_width,
            slide_count,
            scroll_left: 0.0,
            pending: None,
            observed: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    /// Slides currently registered for visibility notifications.
    pub fn observed(&self) -> &[usize] {
        &self.observed
    }

    /// Every scroll request received, oldest first.
    pub fn history(&self) -> &[ScrollRequest] {
        &self.history
    }

    pub fn is_animating(&self) -> bool {
        self.pending.is_some()
    }

    /// Finish the in-flight scroll (if any) and report visibility.
    pub fn settle(&mut self) -> Vec<VisibilityEntry> {
        if let Some(request) = self.pending.take() {
            self.scroll_left = request.left;
        }
        self.visibility()
    }

    /// A user scroll to an absolute offset, bypassing navigation.
    pub fn drag_to(&mut self, left: f64) -> Vec<VisibilityEntry> {
        self.pending = None;
        let max = self.slide_width * self.slide_count.saturating_sub(1) as f64;
        self.scroll_left = left.clamp(0.0, max);
        self.visibility()
    }

    /// Visible fraction of each observed slide at the current offset.
    pub fn visibility(&self) -> Vec<VisibilityEntry> {
        let view_start = self.scroll_left;
        let view_end = view_start + self.slide_width;
        self.observed
            .iter()
            .map(|&slide| {
                let start = slide as f64 * self.slide_width;
                let end = start + self.slide_width;
                let overlap = (end.min(view_end) - start.max(view_start)).max(0.0);
                VisibilityEntry {
                    slide,
                    ratio: overlap / self.slide_width,
                }
            })
            .collect()
    }
}

impl Viewport for PagedViewport {
    fn leading_edge(&self, slide: usize) -> Option<f64> {
        (slide < self.slide_count).then(|| slide as f64 * self.slide_width)
    }

    fn scroll_to(&mut self, request: ScrollRequest) {
        self.history.push(request);
        match request.behavior {
            ScrollBehavior::Smooth => self.pending = Some(request),
            ScrollBehavior::Instant => {
                self.pending = None;
                self.scroll_left = request.left;
            }
        }
    }

    fn observe(&mut self, slide: usize) {
        if !self.observed.contains(&slide) {
            self.observed.push(slide);
        }
    }

    fn disconnect(&mut self) {
        self.observed.clear();
    }
}
