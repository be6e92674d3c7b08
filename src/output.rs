//! CLI output formatting.
//!
//! Output leads with what the deck *is*: slide positions, kinds and labels.
//! File paths appear only where a command writes files.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Carousel carousel-gallery (2 slides)
//!     Title: Spring Collection
//! 001 image-only
//!     Regions: image
//! 002 multi-column
//!     Regions: image, content
//!     Label: carousel-gallery-slide-1-heading
//!     Links: 1
//! Navigation: 2 indicators
//! ```
//!
//! ## Simulate
//!
//! ```text
//! > next
//!     Scrolled to slide 2 (left 1280)
//!     Committed slide 2
//!     Active: slide 2 of 3
//! ```
//!
//! ## Build
//!
//! ```text
//! spring.toml → dist/spring.html (3 slides)
//! Rendered 1 deck
//! ```
//!
//! Slides are numbered from 1 in all output, as in the indicator labels.
//!
//! Each command has a `format_*` function returning `Vec<String>` and a
//! `print_*` wrapper that writes to stdout.

use crate::assembler::Outcome;
use crate::carousel::Carousel;
use crate::publish::RenderedDeck;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Check
// ============================================================================

/// Slide inventory of an assembled carousel.
pub fn format_check_output(carousel: &Carousel) -> Vec<String> {
    let mut lines = Vec::new();
    let count = carousel.slide_count();

    let summary = if carousel.is_inert() {
        "no slides".to_string()
    } else {
        plural(count, "slide", "slides")
    };
    lines.push(format!("Carousel {} ({})", carousel.id().element_id(), summary));

    if let Some(title) = carousel.title() {
        let text = title
            .headings()
            .first()
            .map(|h| h.text.as_str())
            .unwrap_or_default();
        lines.push(format!("{}Title: {}", indent(1), text));
    }

    for slide in carousel.slides() {
        lines.push(format!("{} {}", format_index(slide.index() + 1), slide.kind()));
        if slide.regions().is_empty() {
            lines.push(format!("{}Regions: (empty)", indent(1)));
        } else {
            let roles: Vec<String> = slide.regions().iter().map(|r| r.role.to_string()).collect();
            lines.push(format!("{}Regions: {}", indent(1), roles.join(", ")));
        }
        if let Some(label) = slide.labelled_by() {
            lines.push(format!("{}Label: {}", indent(1), label));
        }
        if slide.link_count() > 0 {
            lines.push(format!("{}Links: {}", indent(1), slide.link_count()));
        }
    }

    if carousel.has_navigation() {
        lines.push(format!(
            "Navigation: {}",
            plural(carousel.indicators().len(), "indicator", "indicators")
        ));
    } else {
        lines.push("Navigation: none".to_string());
    }

    lines
}

pub fn print_check_output(carousel: &Carousel) {
    for line in format_check_output(carousel) {
        println!("{}", line);
    }
}

// ============================================================================
// Simulate
// ============================================================================

fn outcome_line(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Scrolled(request) => {
            format!("Scrolled to slide {} (left {})", request.slide + 1, request.left)
        }
        Outcome::Committed(index) => format!("Committed slide {}", index + 1),
        Outcome::Ignored => "Ignored".to_string(),
    }
}

/// One replayed event: its label, what each dispatch did, and the resulting state.
pub fn format_simulation_step(event: &str, outcomes: &[Outcome], carousel: &Carousel) -> Vec<String> {
    let mut lines = vec![format!("> {event}")];
    for outcome in outcomes {
        lines.push(format!("{}{}", indent(1), outcome_line(outcome)));
    }
    if carousel.is_inert() {
        lines.push(format!("{}Active: none", indent(1)));
    } else {
        lines.push(format!(
            "{}Active: slide {} of {}",
            indent(1),
            carousel.active_index() + 1,
            carousel.slide_count()
        ));
    }
    lines
}

pub fn print_simulation_step(event: &str, outcomes: &[Outcome], carousel: &Carousel) {
    for line in format_simulation_step(event, outcomes, carousel) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// One line per written deck plus a total. Deck paths are shown relative to `source`.
pub fn format_build_output(rendered: &[RenderedDeck], source: &Path) -> Vec<String> {
    let mut lines: Vec<String> = rendered
        .iter()
        .map(|deck| {
            let rel = deck.source.strip_prefix(source).unwrap_or(&deck.source);
            format!(
                "{} → {} ({})",
                rel.display(),
                deck.output.display(),
                plural(deck.carousel.slide_count(), "slide", "slides")
            )
        })
        .collect();
    lines.push(format!("Rendered {}", plural(rendered.len(), "deck", "decks")));
    lines
}

pub fn print_build_output(rendered: &[RenderedDeck], source: &Path) {
    for line in format_build_output(rendered, source) {
        println!("{}", line);
    }
}
