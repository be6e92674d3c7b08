//! Deck rendering to disk.
//!
//! Turns deck files into HTML files. A single deck is rendered with
//! [`render_deck_file`]; [`build_all`] discovers every deck under a source
//! directory and renders them in parallel with [rayon](https://docs.rs/rayon).
//!
//! ```text
//! decks/                      dist/
//! ├── carousel.toml   (cfg)   ├── spring.html
//! ├── spring.toml        →    └── archive/
//! └── archive/                    └── 2023.html
//!     └── 2023.toml
//! ```
//!
//! Labels are resolved once up front so the parallel stage stays synchronous.

use crate::assembler::assemble_with_labels;
use crate::carousel::Carousel;
use crate::config::{CONFIG_FILE, ConfigError, RenderConfig, StringsConfig};
use crate::render::{render_carousel, render_document};
use crate::rows::{DeckError, load_deck};
use crate::strings::{Labels, PlaceholderFile, StaticStrings, StringTable};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Deck error in {path}: {source}")]
    Deck { path: PathBuf, source: DeckError },
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One deck written to disk.
#[derive(Debug, Clone)]
pub struct RenderedDeck {
    pub source: PathBuf,
    pub output: PathBuf,
    pub carousel: Carousel,
}

/// The string table configured for a source directory.
///
/// Without `placeholders` the table is empty and every label falls back to English.
pub fn string_table(config: &StringsConfig, source_dir: &Path) -> Box<dyn StringTable> {
    match &config.placeholders {
        Some(dir) => Box::new(PlaceholderFile::new(
            source_dir.join(dir),
            config.language.clone(),
        )),
        None => Box::new(StaticStrings::default()),
    }
}

/// Load a deck file and assemble its carousel.
pub fn assemble_deck_file(path: &Path, labels: &Labels) -> Result<Carousel, RenderError> {
    let deck = load_deck(path).map_err(|source| RenderError::Deck {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(assemble_with_labels(deck.rows, labels.clone(), deck.id))
}

/// Page title: the first heading of the detached title, else the file stem.
pub fn page_title(carousel: &Carousel, path: &Path) -> String {
    carousel
        .title()
        .and_then(|title| title.headings().first())
        .map(|heading| heading.text.clone())
        .unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
}

/// Render one carousel to an HTML string per the render config.
pub fn render_html(carousel: &Carousel, title: &str, config: &RenderConfig) -> String {
    if config.standalone {
        render_document(carousel, title).into_string()
    } else {
        render_carousel(carousel).into_string()
    }
}

/// Render the deck at `path` and write it to `output`.
pub fn render_deck_file(
    path: &Path,
    output: &Path,
    labels: &Labels,
    config: &RenderConfig,
) -> Result<RenderedDeck, RenderError> {
    let carousel = assemble_deck_file(path, labels)?;
    let html = render_html(&carousel, &page_title(&carousel, path), config);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, html)?;
    debug!(deck = %path.display(), output = %output.display(), "wrote carousel");

    Ok(RenderedDeck {
        source: path.to_path_buf(),
        output: output.to_path_buf(),
        carousel,
    })
}

/// Every `*.toml` deck under `source`, sorted, excluding `carousel.toml`.
pub fn discover_decks(source: &Path) -> Result<Vec<PathBuf>, RenderError> {
    let mut decks = Vec::new();
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().is_some_and(|ext| ext == "toml")
            && path.file_name().is_some_and(|name| name != CONFIG_FILE)
        {
            decks.push(path.to_path_buf());
        }
    }
    decks.sort();
    Ok(decks)
}

/// `source/a/b.toml` → `output/a/b.html`.
pub fn output_path(deck: &Path, source: &Path, output: &Path) -> PathBuf {
    let relative = deck.strip_prefix(source).unwrap_or(deck);
    output.join(relative).with_extension("html")
}

/// `any/dir/spring.v2.toml` → `output/spring.v2.html`.
pub fn single_output_path(deck: &Path, output: &Path) -> PathBuf {
    let name = deck.file_name().map(Path::new).unwrap_or(deck);
    output.join(name).with_extension("html")
}

/// Render every deck under `source` into `output` in parallel.
///
/// Fails on the first deck that cannot be rendered; decks already written stay on disk.
pub fn build_all(
    source: &Path,
    output: &Path,
    labels: &Labels,
    config: &RenderConfig,
) -> Result<Vec<RenderedDeck>, RenderError> {
    let decks = discover_decks(source)?;
    info!(count = decks.len(), source = %source.display(), "rendering decks");

    decks
        .par_iter()
        .map(|deck| render_deck_file(deck, &output_path(deck, source, output), labels, config))
        .collect()
}
