//! End-to-end tests over the deck fixtures in `fixtures/decks/`.

use carousel_deck::assembler::{Deck, DeckEvent, Outcome};
use carousel_deck::carousel::Carousel;
use carousel_deck::config::load_config;
use carousel_deck::navigation::{NavigationController, ScrollRequest, Viewport};
use carousel_deck::publish::{assemble_deck_file, build_all, string_table};
use carousel_deck::render::render_carousel;
use carousel_deck::simulate::{Simulation, SimulationEvent};
use carousel_deck::slide::SlideKind;
use carousel_deck::strings::Labels;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/decks")
}

fn load(name: &str) -> Carousel {
    assemble_deck_file(&fixtures().join(name), &Labels::default()).unwrap()
}

/// Exactly the active slide is exposed, its links alone are focusable, and
/// only its indicator is disabled.
fn assert_consistent(carousel: &Carousel) {
    let active = carousel.active_index();
    for slide in carousel.slides() {
        let is_active = slide.index() == active;
        assert_eq!(slide.is_hidden(), !is_active, "slide {} hidden", slide.index());
        assert_eq!(slide.links_focusable(), is_active, "slide {} links", slide.index());
    }
    for indicator in carousel.indicators() {
        assert_eq!(indicator.is_disabled(), indicator.target() == active);
    }
}

#[test]
fn gallery_fixture_structure() {
    let carousel = load("gallery.toml");

    assert_eq!(carousel.id().as_str(), "gallery");
    assert!(carousel.title().is_some());
    assert_eq!(carousel.slide_count(), 3);
    assert_eq!(carousel.indicators().len(), 3);
    assert_eq!(carousel.active_index(), 0);

    let kinds: Vec<SlideKind> = carousel.slides().iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![SlideKind::ImageOnly, SlideKind::MultiColumn, SlideKind::MultiColumn]
    );

    assert_eq!(carousel.slides()[0].labelled_by(), None);
    assert_eq!(
        carousel.slides()[1].labelled_by(),
        Some("carousel-gallery-slide-1-heading")
    );
    assert_eq!(carousel.slides()[2].labelled_by(), Some("harbour-heading"));
    assert_eq!(carousel.slides()[2].regions().len(), 3);

    assert_consistent(&carousel);
}

#[test]
fn single_slide_fixture_has_no_navigation() {
    let carousel = load("single.toml");
    assert_eq!(carousel.slide_count(), 1);
    assert!(carousel.indicators().is_empty());
    assert!(!carousel.has_navigation());
    assert!(!carousel.slides()[0].is_hidden());

    let html = render_carousel(&carousel).into_string();
    assert!(!html.contains("slide-prev"));
    assert!(!html.contains("<nav"));
}

#[test]
fn empty_fixture_is_inert() {
    let carousel = load("empty.toml");
    assert!(carousel.is_inert());
    assert!(carousel.title().is_none());
    assert!(carousel.indicators().is_empty());

    let mut sim = Simulation::new(carousel, 1000.0, 0.5);
    assert_eq!(sim.step(SimulationEvent::Next), vec![Outcome::Ignored]);
    assert!(sim.viewport().history().is_empty());
}

#[test]
fn derived_id_is_stable() {
    let a = load("archive/2023.toml");
    let b = load("archive/2023.toml");
    assert_eq!(a.id(), b.id());
    assert!(!a.id().as_str().is_empty());
}

#[test]
fn state_stays_consistent_through_navigation() {
    let mut sim = Simulation::new(load("gallery.toml"), 1000.0, 0.5);
    let events = [
        "next", "next", "next", "prev", "jump:3", "jump:3", "scroll:400", "scroll:600", "jump:1",
    ];
    for raw in events {
        sim.step(raw.parse().unwrap());
        assert_consistent(sim.carousel());
    }
    assert_eq!(sim.carousel().active_index(), 0);
}

#[test]
fn next_wraps_after_last_slide() {
    let mut sim = Simulation::new(load("gallery.toml"), 1000.0, 0.5);
    let visited: Vec<usize> = (0..4)
        .map(|_| {
            sim.step(SimulationEvent::Next);
            sim.carousel().active_index()
        })
        .collect();
    assert_eq!(visited, vec![1, 2, 0, 1]);
}

#[test]
fn scroll_requests_keep_vertical_position() {
    let mut sim = Simulation::new(load("gallery.toml"), 1000.0, 0.5);
    sim.step(SimulationEvent::Jump(2));
    let requests = sim.viewport().history();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].left, 2000.0);
    assert_eq!(requests[0].top, None);
}

#[test]
fn clicks_alone_do_not_commit() {
    let mut deck = Deck::wire(
        load("gallery.toml"),
        Recording::default(),
        NavigationController::default(),
        0.5,
    );
    assert!(matches!(deck.dispatch(DeckEvent::NextClicked), Outcome::Scrolled(_)));
    assert_eq!(deck.carousel().active_index(), 0);
    // target's links become reachable while the scroll is in flight
    assert!(deck.carousel().slides()[1].links_focusable());
}

#[derive(Default)]
struct Recording {
    observed: Rc<RefCell<Vec<usize>>>,
    disconnects: Rc<RefCell<usize>>,
}

impl Viewport for Recording {
    fn leading_edge(&self, slide: usize) -> Option<f64> {
        Some(slide as f64 * 10.0)
    }

    fn scroll_to(&mut self, _request: ScrollRequest) {}

    fn observe(&mut self, slide: usize) {
        self.observed.borrow_mut().push(slide);
    }

    fn disconnect(&mut self) {
        self.observed.borrow_mut().clear();
        *self.disconnects.borrow_mut() += 1;
    }
}

#[test]
fn dropping_deck_disconnects_observers() {
    let viewport = Recording::default();
    let observed = Rc::clone(&viewport.observed);
    let disconnects = Rc::clone(&viewport.disconnects);

    let deck = Deck::wire(load("gallery.toml"), viewport, NavigationController::default(), 0.5);
    assert_eq!(*observed.borrow(), vec![0, 1, 2]);

    drop(deck);
    assert!(observed.borrow().is_empty());
    assert_eq!(*disconnects.borrow(), 1);
}

#[test]
fn fixture_config_loads() {
    let config = load_config(&fixtures()).unwrap();
    assert_eq!(config.tracking.threshold, 0.5);
    assert_eq!(config.viewport.slide_width, 1000.0);
    assert_eq!(config.strings.language, "fr");
    assert!(config.render.standalone);
}

#[tokio::test]
async fn build_fixtures_with_localized_labels() {
    let source = fixtures();
    let config = load_config(&source).unwrap();
    let labels = Labels::resolve(&*string_table(&config.strings, &source)).await;
    assert_eq!(labels.next_slide, "Diapositive suivante");

    let out = TempDir::new().unwrap();
    let rendered = build_all(&source, out.path(), &labels, &config.render).unwrap();

    let mut written: Vec<PathBuf> = rendered
        .iter()
        .map(|d| d.output.strip_prefix(out.path()).unwrap().to_path_buf())
        .collect();
    written.sort();
    assert_eq!(
        written,
        vec![
            PathBuf::from("archive/2023.html"),
            PathBuf::from("empty.html"),
            PathBuf::from("gallery.html"),
            PathBuf::from("single.html"),
        ]
    );

    let html = std::fs::read_to_string(out.path().join("gallery.html")).unwrap();
    assert!(html.contains("<title>Spring Collection</title>"));
    assert!(html.contains(r#"aria-roledescription="Carrousel""#));
    assert!(html.contains(r#"aria-label="Afficher la diapositive 1 sur 3" disabled"#));
    assert!(html.contains(r#"aria-label="Diapositive précédente""#));
}
