//! # Carousel Deck
//!
//! An accessible slide carousel built from authored rows of Markdown.
//! A deck file lists rows; each row becomes one slide, and the library
//! turns those slides into a navigable region with previous/next buttons,
//! per-slide indicators and assistive-technology state that always matches
//! the slide the visitor is actually looking at.
//!
//! # Architecture: Assemble, Then Wire
//!
//! ```text
//! deck.toml ──▶ rows ──▶ assemble ──▶ Carousel ──▶ render ──▶ HTML
//!                                        │
//!                                        └──▶ Deck::wire(viewport) ──▶ events
//! ```
//!
//! Assembly is a one-shot transformation into an owned [`carousel::Carousel`].
//! Rendering is a pure projection of that model. Runtime behaviour lives in
//! [`assembler::Deck`], which owns the carousel together with a
//! [`navigation::Viewport`] and turns clicks and visibility batches into
//! state changes.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`rows`] | Rows, Markdown regions and their analysis; deck file parsing |
//! | [`slide`] | Builds one slide from one row: kind, region roles, label heading |
//! | [`carousel`] | Carousel ids, the carousel model, indicators, active-slide commit |
//! | [`a11y`] | Keeps hidden state, link focusability and indicator state in sync |
//! | [`navigation`] | Wraparound navigation, the `Viewport` seam, a paged viewport |
//! | [`tracker`] | Commits the active slide on upward visibility crossings |
//! | [`strings`] | Localized labels from an async string table, with fallbacks |
//! | [`assembler`] | Rows → carousel; the wired runtime `Deck` |
//! | [`render`] | Maud HTML projection of a carousel |
//! | [`simulate`] | Replays user events against a paged viewport |
//! | [`publish`] | Deck files → HTML files, in parallel |
//! | [`config`] | `carousel.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | Tracing subscriber setup |
//!
//! # Design Decisions
//!
//! ## Commitment Follows Visibility
//!
//! Buttons and indicators never change the active slide directly. They only
//! request a scroll. The active slide changes when the viewport reports that
//! a slide has become at least half visible, so swipes, keyboard scrolling
//! and button presses all converge on the same state transition and the
//! accessibility attributes can never disagree with what is on screen.
//!
//! ## One Owner, Explicit Teardown
//!
//! A `Deck` owns its viewport and observer registrations. Dropping it
//! disconnects the viewport, so a removed carousel leaves nothing behind.
//!
//! ## Text Is Configurable, Never Required
//!
//! Every label has an English fallback. A missing or failing string table
//! degrades to those labels; it never stops a carousel from being built.

pub mod a11y;
pub mod assembler;
pub mod carousel;
pub mod config;
pub mod logging;
pub mod navigation;
pub mod output;
pub mod publish;
pub mod render;
pub mod rows;
pub mod simulate;
pub mod slide;
pub mod strings;
pub mod tracker;

#[cfg(test)]
pub(crate) mod test_helpers;
