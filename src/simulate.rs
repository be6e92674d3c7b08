//! Event replay against a simulated viewport.
//!
//! A [`Simulation`] wires a carousel to a [`PagedViewport`] and replays
//! user events one at a time. Button presses queue a smooth scroll; the
//! simulation then lets it finish and feeds the resulting visibility batch
//! back to the deck, which is when the active slide actually changes.
//!
//! Events are written the way the `simulate` command takes them:
//!
//! | Event | Meaning |
//! |-------|---------|
//! | `next` | next button |
//! | `prev` | previous button |
//! | `jump:N` | indicator for slide `N`, counting from 1 |
//! | `scroll:PX` | user drags the strip to horizontal offset `PX` |

use crate::assembler::{Deck, DeckEvent, Outcome};
use crate::carousel::Carousel;
use crate::navigation::{NavigationController, PagedViewport};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum EventParseError {
    #[error("unknown event '{0}' (expected next, prev, jump:N or scroll:PX)")]
    Unknown(String),
    #[error("invalid number in event '{0}'")]
    InvalidNumber(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationEvent {
    Next,
    Prev,
    /// Indicator press; holds the 0-based slide index.
    Jump(usize),
    Scroll(f64),
}

impl FromStr for SimulationEvent {
    type Err = EventParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(':') {
            None if s.eq_ignore_ascii_case("next") => Ok(Self::Next),
            None if s.eq_ignore_ascii_case("prev") => Ok(Self::Prev),
            Some(("jump", n)) => n
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .map(Self::Jump)
                .ok_or_else(|| EventParseError::InvalidNumber(s.to_string())),
            Some(("scroll", px)) => px
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|px| px.is_finite())
                .map(Self::Scroll)
                .ok_or_else(|| EventParseError::InvalidNumber(s.to_string())),
            _ => Err(EventParseError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for SimulationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => f.write_str("next"),
            Self::Prev => f.write_str("prev"),
            Self::Jump(index) => write!(f, "jump:{}", index + 1),
            Self::Scroll(px) => write!(f, "scroll:{px}"),
        }
    }
}

pub struct Simulation {
    deck: Deck<PagedViewport>,
}

impl Simulation {
    /// Wire `carousel` to a paged viewport of `slide_width`-wide slides.
    ///
    /// The viewport's first visibility report is delivered immediately, as a
    /// browser does when observation starts.
    pub fn new(carousel: Carousel, slide_width: f64, threshold: f64) -> Self {
        let viewport = PagedViewport::new(carousel.slide_count(), slide_width);
        let mut deck = Deck::wire(carousel, viewport, NavigationController::default(), threshold);
        let initial = deck.viewport().visibility();
        if !initial.is_empty() {
            deck.dispatch(DeckEvent::Visibility(initial));
        }
        Self { deck }
    }

    pub fn carousel(&self) -> &Carousel {
        self.deck.carousel()
    }

    pub fn viewport(&self) -> &PagedViewport {
        self.deck.viewport()
    }

    /// Replay one event and every visibility batch it causes.
    pub fn step(&mut self, event: SimulationEvent) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        let click = match event {
            SimulationEvent::Next => DeckEvent::NextClicked,
            SimulationEvent::Prev => DeckEvent::PrevClicked,
            SimulationEvent::Jump(n) => DeckEvent::IndicatorClicked(n),
            SimulationEvent::Scroll(px) => {
                let entries = self.deck.viewport_mut().drag_to(px);
                outcomes.push(self.deck.dispatch(DeckEvent::Visibility(entries)));
                return outcomes;
            }
        };

        outcomes.push(self.deck.dispatch(click));
        if self.deck.viewport().is_animating() {
            let entries = self.deck.viewport_mut().settle();
            outcomes.push(self.deck.dispatch(DeckEvent::Visibility(entries)));
        }
        outcomes
    }
}
