//! Localized labels and the string-table collaborator.
//!
//! Button labels and the region's role description are looked up in a
//! language-keyed string table. The table is fetched asynchronously and may
//! fail independently of everything else, so every key has a fixed English
//! fallback and a failed fetch simply yields [`Labels::default`].
//!
//! ## Placeholder Sheets
//!
//! [`PlaceholderFile`] reads the spreadsheet-style JSON export used for site
//! placeholders:
//!
//! ```json
//! { "data": [ { "Key": "Previous Slide", "Text": "Diapositive précédente" } ] }
//! ```
//!
//! Keys are normalised to camelCase (`"Previous Slide"` → `previousSlide`)
//! before lookup. The `default` language lives at `<root>/placeholders.json`,
//! any other language at `<root>/<language>/placeholders.json`.

use async_trait::async_trait;
use heck::ToLowerCamelCase;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum StringTableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("String table unavailable: {0}")]
    Unavailable(String),
}

/// Key → localized text.
pub type StringMap = HashMap<String, String>;

/// Anything that can produce a string table.
#[async_trait]
pub trait StringTable: Send + Sync {
    async fn fetch(&self) -> Result<StringMap, StringTableError>;
}

/// Fixed in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticStrings(StringMap);

impl StaticStrings {
    pub fn new(map: StringMap) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticStrings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[async_trait]
impl StringTable for StaticStrings {
    async fn fetch(&self) -> Result<StringMap, StringTableError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Deserialize)]
struct PlaceholderSheet {
    #[serde(default)]
    data: Vec<PlaceholderRow>,
}

#[derive(Debug, Deserialize)]
struct PlaceholderRow {
    #[serde(rename = "Key", default)]
    key: String,
    #[serde(rename = "Text", default)]
    text: String,
}

/// Placeholder sheet on disk for one language.
#[derive(Debug, Clone)]
pub struct PlaceholderFile {
    root: PathBuf,
    language: String,
}

impl PlaceholderFile {
    pub fn new(root: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            language: language.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        if self.language.is_empty() || self.language == "default" {
            self.root.join("placeholders.json")
        } else {
            self.root.join(&self.language).join("placeholders.json")
        }
    }
}

#[async_trait]
impl StringTable for PlaceholderFile {
    async fn fetch(&self) -> Result<StringMap, StringTableError> {
        let content = tokio::fs::read_to_string(self.path()).await?;
        parse_placeholder_sheet(&content)
    }
}

/// Parse a placeholder sheet into a camelCase-keyed map. Rows without a key are skipped.
pub fn parse_placeholder_sheet(content: &str) -> Result<StringMap, StringTableError> {
    let sheet: PlaceholderSheet = serde_json::from_str(content)?;
    Ok(sheet
        .data
        .into_iter()
        .filter(|row| !row.key.trim().is_empty())
        .map(|row| (to_camel_case(&row.key), row.text))
        .collect())
}

/// `"Carousel Slide Controls"` → `"carouselSlideControls"`.
///
/// Keys are lowercased first, so existing camel humps are not word breaks.
pub fn to_camel_case(key: &str) -> String {
    key.to_lowercase().to_lower_camel_case()
}

/// Resolved carousel labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Labels {
    /// `aria-roledescription` of the carousel region.
    pub carousel: String,
    /// `aria-label` of the indicator navigation landmark.
    pub slide_controls: String,
    pub previous_slide: String,
    pub next_slide: String,
    /// Prefix of indicator labels ("Show Slide 2 of 5").
    pub show_slide: String,
    pub of: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            carousel: "Carousel".to_string(),
            slide_controls: "Carousel Slide Controls".to_string(),
            previous_slide: "Previous Slide".to_string(),
            next_slide: "Next Slide".to_string(),
            show_slide: "Show Slide".to_string(),
            of: "of".to_string(),
        }
    }
}

impl Labels {
    /// Take each label from `map`, keeping the English fallback for
    /// missing or blank entries.
    pub fn from_map(map: &StringMap) -> Self {
        let fallback = Self::default();
        let pick = |key: &str, fallback: String| {
            map.get(key)
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .unwrap_or(fallback)
        };
        Self {
            carousel: pick("carousel", fallback.carousel),
            slide_controls: pick("carouselSlideControls", fallback.slide_controls),
            previous_slide: pick("previousSlide", fallback.previous_slide),
            next_slide: pick("nextSlide", fallback.next_slide),
            show_slide: pick("showSlide", fallback.show_slide),
            of: pick("of", fallback.of),
        }
    }

    /// Fetch the table and resolve labels. Never fails.
    pub async fn resolve(table: &dyn StringTable) -> Self {
        match table.fetch().await {
            Ok(map) => Self::from_map(&map),
            Err(e) => {
                warn!(error = %e, "string table unavailable; using English labels");
                Self::default()
            }
        }
    }

    /// Accessible label for the indicator of slide `position` (0-based).
    pub fn indicator_label(&self, position: usize, total: usize) -> String {
        format!("{} {} {} {}", self.show_slide, position + 1, self.of, total)
    }
}
