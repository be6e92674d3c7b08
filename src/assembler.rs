//! Carousel assembly and event wiring.
//!
//! # Assembly
//!
//! [`assemble`] awaits the string table once, then builds synchronously:
//!
//! 1. No rows → an inert carousel (no slides, nothing to wire).
//! 2. A heading-only first row is detached as the carousel title.
//! 3. Every remaining row becomes a slide ([`slide::build`]).
//! 4. With more than one slide, each slide gets an indicator.
//! 5. One accessibility sync with slide 0 active.
//!
//! # Runtime
//!
//! A [`Deck`] owns an assembled carousel together with its viewport and
//! consumes [`DeckEvent`]s. Clicks go to the [`NavigationController`],
//! visibility batches to the [`ActiveSlideTracker`]. Single-slide and empty
//! decks are never wired: events are ignored and no slide is observed.
//!
//! Observer registrations live exactly as long as the `Deck`; dropping it
//! (or calling [`Deck::teardown`]) disconnects the viewport.

use crate::carousel::{Carousel, CarouselId, Indicator};
use crate::navigation::{NavigationController, NavigationRequest, ScrollRequest, Viewport};
use crate::rows::Row;
use crate::slide;
use crate::strings::{Labels, StringTable};
use crate::tracker::{ActiveSlideTracker, VisibilityEntry};
use tracing::{debug, warn};

/// Fetch labels from `strings` (falling back to English) and assemble.
pub async fn assemble(rows: Vec<Row>, strings: &dyn StringTable, id: CarouselId) -> Carousel {
    let labels = Labels::resolve(strings).await;
    assemble_with_labels(rows, labels, id)
}

/// Assemble with already-resolved labels.
pub fn assemble_with_labels(rows: Vec<Row>, labels: Labels, id: CarouselId) -> Carousel {
    let mut rows = rows.into_iter().peekable();

    let title = if rows.peek().is_some_and(Row::is_title) {
        rows.next().and_then(|row| row.regions.into_iter().next())
    } else {
        None
    };

    let slides: Vec<_> = rows
        .enumerate()
        .map(|(position, row)| slide::build(row, position, &id))
        .collect();

    let total = slides.len();
    let indicators = if total > 1 {
        (0..total)
            .map(|position| Indicator::new(position, labels.indicator_label(position, total)))
            .collect()
    } else {
        Vec::new()
    };

    debug!(carousel = %id, slides = total, titled = title.is_some(), "carousel assembled");

    let mut carousel = Carousel::new(id, title, slides, indicators, labels);
    carousel.commit(0);
    carousel
}

/// Something that happened to a deck.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckEvent {
    /// Indicator button for this slide was clicked.
    IndicatorClicked(usize),
    PrevClicked,
    NextClicked,
    /// A batch of visibility notifications from the viewport.
    Visibility(Vec<VisibilityEntry>),
}

/// What a dispatched event did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A scroll was requested; activation comes later via visibility.
    Scrolled(ScrollRequest),
    /// A visibility batch committed this slide.
    Committed(usize),
    /// Nothing changed.
    Ignored,
}

struct Wiring {
    navigation: NavigationController,
    tracker: ActiveSlideTracker,
}

/// An assembled carousel wired to a viewport.
pub struct Deck<V: Viewport> {
    carousel: Carousel,
    viewport: V,
    wiring: Option<Wiring>,
}

impl<V: Viewport> Deck<V> {
    /// Wire navigation and tracking. Decks with fewer than two slides stay unwired.
    pub fn wire(carousel: Carousel, mut viewport: V, navigation: NavigationController, threshold: f64) -> Self {
        let wiring = if carousel.has_navigation() {
            for slide in carousel.slides() {
                viewport.observe(slide.index());
            }
            Some(Wiring {
                navigation,
                tracker: ActiveSlideTracker::new(carousel.slide_count(), threshold),
            })
        } else {
            None
        };
        Self {
            carousel,
            viewport,
            wiring,
        }
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    /// Whether navigation and tracking are attached.
    pub fn is_wired(&self) -> bool {
        self.wiring.is_some()
    }

    pub fn dispatch(&mut self, event: DeckEvent) -> Outcome {
        let Some(wiring) = self.wiring.as_mut() else {
            debug!(carousel = %self.carousel.id(), ?event, "event on unwired deck ignored");
            return Outcome::Ignored;
        };

        let active = self.carousel.active_index();
        let request = match event {
            DeckEvent::Visibility(entries) => {
                return match wiring.tracker.observe(&mut self.carousel, &entries) {
                    Some(index) => Outcome::Committed(index),
                    None => Outcome::Ignored,
                };
            }
            DeckEvent::PrevClicked => NavigationRequest::prev(active),
            DeckEvent::NextClicked => NavigationRequest::next(active),
            DeckEvent::IndicatorClicked(position) => {
                let Some(indicator) = self.carousel.indicators().get(position) else {
                    warn!(carousel = %self.carousel.id(), position, "click on unknown indicator");
                    return Outcome::Ignored;
                };
                if indicator.is_disabled() {
                    return Outcome::Ignored;
                }
                NavigationRequest::jump(indicator.target())
            }
        };

        match wiring
            .navigation
            .request(&mut self.carousel, &mut self.viewport, request)
        {
            Some(scroll) => Outcome::Scrolled(scroll),
            None => Outcome::Ignored,
        }
    }

    /// Detach navigation and tracking and disconnect the viewport observer.
    /// Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.wiring.take().is_some() {
            self.viewport.disconnect();
            debug!(carousel = %self.carousel.id(), "deck torn down");
        }
    }
}

impl<V: Viewport> Drop for Deck<V> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::PagedViewport;
    use crate::slide::SlideKind;
    use crate::strings::StaticStrings;
    use crate::test_helpers::*;
    use crate::tracker::DEFAULT_THRESHOLD;
    use std::cell::Cell;
    use std::rc::Rc;

    fn wire(carousel: Carousel) -> Deck<PagedViewport> {
        let viewport = PagedViewport::new(carousel.slide_count(), 100.0);
        Deck::wire(carousel, viewport, NavigationController::default(), DEFAULT_THRESHOLD)
    }

    #[test]
    fn title_row_detached_and_slides_classified() {
        let carousel = assemble_with_labels(
            vec![title_row("Our Work"), image_row("a.jpg"), split_row("b.jpg", "Text B")],
            Labels::default(),
            test_id(),
        );

        let title = carousel.title().unwrap();
        assert_eq!(title.headings()[0].text, "Our Work");
        assert_eq!(carousel.slide_count(), 2);
        assert_eq!(carousel.slide(0).unwrap().kind(), SlideKind::ImageOnly);
        assert_eq!(carousel.slide(1).unwrap().kind(), SlideKind::MultiColumn);
        assert_eq!(carousel.indicators().len(), 2);
        assert_eq!(carousel.active_index(), 0);
        assert!(!carousel.slide(0).unwrap().is_hidden());
        assert!(carousel.slide(1).unwrap().is_hidden());
    }

    #[test]
    fn slide_indices_count_from_zero_after_title() {
        let carousel = assemble_with_labels(
            vec![title_row("T"), image_row("a.jpg"), image_row("b.jpg")],
            Labels::default(),
            test_id(),
        );
        let indices: Vec<_> = carousel.slides().iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(carousel.slide(0).unwrap().element_id(), "carousel-test-slide-0");
    }

    #[test]
    fn heading_row_with_content_is_a_slide() {
        let carousel = assemble_with_labels(
            vec![Row::from_markdown(["## Hello\n\nWorld"]), image_row("a.jpg")],
            Labels::default(),
            test_id(),
        );
        assert!(carousel.title().is_none());
        assert_eq!(carousel.slide_count(), 2);
    }

    #[test]
    fn heading_row_after_first_is_a_slide() {
        let carousel = assemble_with_labels(
            vec![image_row("a.jpg"), title_row("Later")],
            Labels::default(),
            test_id(),
        );
        assert!(carousel.title().is_none());
        assert_eq!(carousel.slide_count(), 2);
    }

    #[test]
    fn empty_rows_make_inert_carousel() {
        let carousel = assemble_with_labels(vec![], Labels::default(), test_id());
        assert!(carousel.is_inert());
        assert!(carousel.indicators().is_empty());
        assert!(!carousel.has_navigation());

        let mut deck = wire(carousel);
        assert!(!deck.is_wired());
        assert_eq!(deck.dispatch(DeckEvent::NextClicked), Outcome::Ignored);
    }

    #[test]
    fn title_only_deck_is_inert() {
        let carousel = assemble_with_labels(vec![title_row("Only")], Labels::default(), test_id());
        assert!(carousel.title().is_some());
        assert!(carousel.is_inert());
    }

    #[test]
    fn single_slide_has_no_chrome_and_no_tracker() {
        let carousel =
            assemble_with_labels(vec![title_row("T"), image_row("a.jpg")], Labels::default(), test_id());
        assert_eq!(carousel.slide_count(), 1);
        assert!(carousel.indicators().is_empty());
        assert!(!carousel.has_navigation());

        let deck = wire(carousel);
        assert!(!deck.is_wired());
        assert!(deck.viewport().observed().is_empty());
    }

    #[test]
    fn indicator_labels_use_resolved_strings() {
        let labels = Labels {
            show_slide: "Folie".into(),
            of: "von".into(),
            ..Labels::default()
        };
        let carousel = assemble_with_labels(
            vec![image_row("a.jpg"), image_row("b.jpg"), image_row("c.jpg")],
            labels,
            test_id(),
        );
        assert_eq!(carousel.indicators()[1].label(), "Folie 2 von 3");
        assert_eq!(carousel.indicators()[2].target(), 2);
    }

    #[tokio::test]
    async fn assemble_fetches_labels() {
        let strings: StaticStrings = [("carousel", "Karussell")].into_iter().collect();
        let carousel = assemble(vec![image_row("a.jpg")], &strings, test_id()).await;
        assert_eq!(carousel.labels().carousel, "Karussell");
        assert_eq!(carousel.labels().next_slide, "Next Slide");
    }

    #[test]
    fn wiring_observes_every_slide() {
        let deck = wire(carousel_with_slides(3));
        assert!(deck.is_wired());
        assert_eq!(deck.viewport().observed(), &[0, 1, 2]);
    }

    #[test]
    fn next_click_scrolls_then_visibility_commits() {
        let mut deck = wire(carousel_with_slides(3));

        let outcome = deck.dispatch(DeckEvent::NextClicked);
        assert!(matches!(outcome, Outcome::Scrolled(s) if s.slide == 1));
        assert_eq!(deck.carousel().active_index(), 0);

        let entries = deck.viewport_mut().settle();
        assert_eq!(deck.dispatch(DeckEvent::Visibility(entries)), Outcome::Committed(1));
        assert_eq!(deck.carousel().active_index(), 1);
        assert!(deck.carousel().indicators()[1].is_disabled());
        assert!(!deck.carousel().indicators()[0].is_disabled());
    }

    #[test]
    fn prev_from_first_wraps_to_last() {
        let mut deck = wire(carousel_with_slides(3));
        let outcome = deck.dispatch(DeckEvent::PrevClicked);
        assert!(matches!(outcome, Outcome::Scrolled(s) if s.slide == 2 && s.left == 200.0));
    }

    #[test]
    fn next_from_last_wraps_to_first() {
        let mut deck = wire(carousel_with_slides(3));
        deck.dispatch(DeckEvent::IndicatorClicked(2));
        let entries = deck.viewport_mut().settle();
        deck.dispatch(DeckEvent::Visibility(entries));
        assert_eq!(deck.carousel().active_index(), 2);

        let outcome = deck.dispatch(DeckEvent::NextClicked);
        assert!(matches!(outcome, Outcome::Scrolled(s) if s.slide == 0));
    }

    #[test]
    fn passive_scroll_commits_without_navigation() {
        let mut deck = wire(carousel_with_slides(3));
        deck.dispatch(DeckEvent::Visibility(deck_entries(&[(0, 1.0)])));

        let entries = deck.viewport_mut().drag_to(100.0);
        assert_eq!(deck.dispatch(DeckEvent::Visibility(entries)), Outcome::Committed(1));
        assert!(deck.viewport().history().is_empty());
    }

    #[test]
    fn clicking_active_indicator_is_ignored() {
        let mut deck = wire(carousel_with_slides(3));
        assert_eq!(deck.dispatch(DeckEvent::IndicatorClicked(0)), Outcome::Ignored);
        assert!(deck.viewport().history().is_empty());
    }

    #[test]
    fn clicking_unknown_indicator_is_ignored() {
        let mut deck = wire(carousel_with_slides(2));
        assert_eq!(deck.dispatch(DeckEvent::IndicatorClicked(9)), Outcome::Ignored);
    }

    #[test]
    fn rapid_clicks_settle_on_last_request() {
        let mut deck = wire(carousel_with_slides(4));
        deck.dispatch(DeckEvent::IndicatorClicked(1));
        deck.dispatch(DeckEvent::IndicatorClicked(3));
        let entries = deck.viewport_mut().settle();
        deck.dispatch(DeckEvent::Visibility(entries));
        assert_eq!(deck.carousel().active_index(), 3);
    }

    #[test]
    fn teardown_disconnects_once() {
        let mut deck = wire(carousel_with_slides(2));
        deck.teardown();
        assert!(!deck.is_wired());
        assert!(deck.viewport().observed().is_empty());
        assert_eq!(deck.dispatch(DeckEvent::NextClicked), Outcome::Ignored);
        deck.teardown();
    }

    struct CountingViewport {
        disconnects: Rc<Cell<usize>>,
    }

    impl Viewport for CountingViewport {
        fn leading_edge(&self, slide: usize) -> Option<f64> {
            Some(slide as f64)
        }
        fn scroll_to(&mut self, _request: ScrollRequest) {}
        fn observe(&mut self, _slide: usize) {}
        fn disconnect(&mut self) {
            self.disconnects.set(self.disconnects.get() + 1);
        }
    }

    #[test]
    fn drop_disconnects_viewport() {
        let disconnects = Rc::new(Cell::new(0));
        {
            let viewport = CountingViewport {
                disconnects: Rc::clone(&disconnects),
            };
            let _deck = Deck::wire(
                carousel_with_slides(2),
                viewport,
                NavigationController::default(),
                DEFAULT_THRESHOLD,
            );
        }
        assert_eq!(disconnects.get(), 1);
    }

    #[test]
    fn dropping_unwired_deck_does_not_disconnect() {
        let disconnects = Rc::new(Cell::new(0));
        {
            let viewport = CountingViewport {
                disconnects: Rc::clone(&disconnects),
            };
            let _deck = Deck::wire(
                carousel_with_slides(1),
                viewport,
                NavigationController::default(),
                DEFAULT_THRESHOLD,
            );
        }
        assert_eq!(disconnects.get(), 0);
    }
}
