//! Input rows and deck files.
//!
//! A carousel is authored as a flat list of **rows**. Each row holds zero or
//! more **regions**, and each region is a Markdown fragment. Rows carry no
//! type information: whether a row becomes an image-only slide, a
//! multi-column slide or the carousel title is decided later by looking at
//! what its regions contain.
//!
//! ## Deck Files
//!
//! On disk a deck is a TOML file:
//!
//! ```toml
//! id = "spring-campaign"           # optional, derived from content otherwise
//!
//! [[rows]]
//! regions = ["## Our Work"]        # heading-only first row → carousel title
//!
//! [[rows]]
//! regions = ["![Dawn](dawn.jpg)"]  # single picture → image-only slide
//!
//! [[rows]]
//! regions = [
//!     "![Dusk](dusk.jpg)",
//!     "### Dusk\n\nEvening light. [Read more](/dusk)",
//! ]
//! ```
//!
//! ## Region Analysis
//!
//! Regions are parsed once with `pulldown-cmark` when constructed. The
//! analysis records whether the region embeds an image, its headings (with
//! any `{#id}` attribute the author supplied), how many links it holds, and
//! whether it contains anything besides headings. Raw HTML counts too:
//! `<img>`/`<picture>`, `<a>` and complete `<h1>`–`<h6>` elements in HTML
//! blocks are recognized alongside their Markdown forms. The Markdown source is kept
//! so the HTML projection can be re-rendered with the current heading ids and
//! link focusability.

use crate::carousel::{CarouselId, IdError};
use maud::html;
use pulldown_cmark::{CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Deck parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Deck id error: {0}")]
    Id(#[from] IdError),
}

/// Markdown extensions enabled for every region.
fn markdown_options() -> Options {
    Options::ENABLE_HEADING_ATTRIBUTES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES
}

/// A heading found in a region.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// 1 for `#`, 6 for `######`.
    pub level: u8,
    /// Plain text content of the heading.
    pub text: String,
    /// Author-supplied id from `{#id}`, if any.
    pub id: Option<String>,
}

/// One content region of a row: a Markdown fragment plus its analysis.
#[derive(Debug, Clone)]
pub struct Region {
    markdown: String,
    has_picture: bool,
    headings: Vec<Heading>,
    link_count: usize,
    heading_only: bool,
}

impl Region {
    pub fn from_markdown(markdown: impl Into<String>) -> Self {
        let markdown = markdown.into();

        let mut has_picture = false;
        let mut headings = Vec::new();
        let mut link_count = 0;
        let mut other_content = false;
        let mut open_heading: Option<Heading> = None;
        let mut html_block: Option<String> = None;

        for event in Parser::new_ext(&markdown, markdown_options()) {
            match event {
                Event::Start(Tag::HtmlBlock) => html_block = Some(String::new()),
                Event::End(TagEnd::HtmlBlock) => {
                    if let Some(block) = html_block.take() {
                        let raw = analyze_raw_html(&block);
                        has_picture |= raw.has_picture;
                        link_count += raw.link_count;
                        other_content |= raw.other_content;
                        headings.extend(raw.headings);
                    }
                }
                Event::Start(Tag::Heading { level, id, .. }) => {
                    open_heading = Some(Heading {
                        level: heading_rank(level),
                        text: String::new(),
                        id: id.map(|i| i.to_string()),
                    });
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(heading) = open_heading.take() {
                        headings.push(heading);
                    }
                }
                Event::Start(Tag::Image { .. }) => {
                    has_picture = true;
                    other_content = true;
                }
                Event::Start(Tag::Link { .. }) => {
                    link_count += 1;
                    if open_heading.is_none() {
                        other_content = true;
                    }
                }
                Event::Text(text) | Event::Code(text) => match open_heading.as_mut() {
                    Some(heading) => heading.text.push_str(&text),
                    None if !text.trim().is_empty() => other_content = true,
                    None => {}
                },
                Event::Html(raw) | Event::InlineHtml(raw) => match html_block.as_mut() {
                    Some(block) => block.push_str(&raw),
                    None => {
                        let inline = analyze_raw_html(&raw);
                        has_picture |= inline.has_picture;
                        link_count += inline.link_count;
                        if open_heading.is_none() {
                            other_content |= inline.other_content;
                        }
                    }
                },
                Event::Rule | Event::TaskListMarker(_) => other_content = true,
                _ => {}
            }
        }

        let heading_only = !headings.is_empty() && !other_content;
        Self {
            markdown,
            has_picture,
            headings,
            link_count,
            heading_only,
        }
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    /// Whether the region embeds a picture (Markdown image or raw `<img>`/`<picture>`).
    pub fn has_picture(&self) -> bool {
        self.has_picture
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn link_count(&self) -> usize {
        self.link_count
    }

    /// True when the region holds at least one heading and nothing else.
    pub fn is_heading_only(&self) -> bool {
        self.heading_only
    }

    /// Render the region to HTML.
    ///
    /// `heading_id` is applied to the first heading that has no author id.
    /// When `links_focusable` is false every link gets `tabindex="-1"`,
    /// including anchors written as raw HTML.
    pub fn render_html(&self, heading_id: Option<&str>, links_focusable: bool) -> String {
        let mut pending_id = heading_id;
        let mut html_block: Option<String> = None;
        let mut events = Vec::new();

        for event in Parser::new_ext(&self.markdown, markdown_options()) {
            match event {
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) => {
                    let id = match (id, pending_id.take()) {
                        (Some(existing), _) => Some(existing),
                        (None, Some(assigned)) => Some(CowStr::from(assigned.to_string())),
                        (None, None) => None,
                    };
                    events.push(Event::Start(Tag::Heading {
                        level,
                        id,
                        classes,
                        attrs,
                    }));
                }
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    ..
                }) if !links_focusable => events.push(Event::InlineHtml(
                    unfocusable_link_open(link_type, &dest_url, &title).into(),
                )),
                Event::End(TagEnd::Link) if !links_focusable => {
                    events.push(Event::InlineHtml("</a>".into()))
                }
                Event::Start(Tag::HtmlBlock) => {
                    html_block = Some(String::new());
                    events.push(Event::Start(Tag::HtmlBlock));
                }
                Event::End(TagEnd::HtmlBlock) => {
                    if let Some(block) = html_block.take() {
                        let rewritten = rewrite_raw_html(&block, &mut pending_id, links_focusable);
                        events.push(Event::Html(rewritten.into()));
                    }
                    events.push(Event::End(TagEnd::HtmlBlock));
                }
                Event::Html(raw) if html_block.is_some() => {
                    if let Some(block) = html_block.as_mut() {
                        block.push_str(&raw);
                    }
                }
                Event::InlineHtml(raw) => {
                    let rewritten = rewrite_raw_html(&raw, &mut pending_id, links_focusable);
                    events.push(Event::InlineHtml(rewritten.into()));
                }
                other => events.push(other),
            }
        }

        let mut out = String::new();
        pulldown_cmark::html::push_html(&mut out, events.into_iter());
        out
    }
}

fn heading_rank(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Escape a value for use inside a double-quoted attribute.
fn escape_attr(value: &str) -> String {
    html! { (value) }.into_string()
}

// =============================================================================
// Raw HTML
// =============================================================================

/// What a fragment of raw HTML contributes to a region's analysis.
#[derive(Debug, Default)]
struct RawHtml {
    has_picture: bool,
    link_count: usize,
    headings: Vec<Heading>,
    /// Anything outside `<h1>`–`<h6>` elements.
    other_content: bool,
}

/// A complete `<hN>…</hN>` element, by byte span.
struct RawHeading {
    start: usize,
    end: usize,
    heading: Heading,
}

fn analyze_raw_html(raw: &str) -> RawHtml {
    let lower = raw.to_ascii_lowercase();
    let elements = raw_heading_elements(raw);

    let mut outside = String::new();
    let mut cursor = 0;
    for element in &elements {
        outside.push_str(&raw[cursor..element.start]);
        cursor = element.end;
    }
    outside.push_str(&raw[cursor..]);

    let has_picture = lower.contains("<img") || lower.contains("<picture");
    RawHtml {
        has_picture,
        link_count: tag_starts(&lower, "a").len(),
        headings: elements.into_iter().map(|element| element.heading).collect(),
        other_content: has_picture || !outside.trim().is_empty(),
    }
}

/// Byte offsets of every `<name` opening tag in already-lowercased HTML.
fn tag_starts(lower: &str, name: &str) -> Vec<usize> {
    let open = format!("<{name}");
    lower
        .match_indices(&open)
        .map(|(pos, _)| pos)
        .filter(|&pos| {
            matches!(lower.as_bytes().get(pos + open.len()),
                Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/')
        })
        .collect()
}

fn raw_heading_elements(raw: &str) -> Vec<RawHeading> {
    let lower = raw.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut found = Vec::new();
    let mut from = 0;

    while let Some(offset) = lower[from..].find("<h") {
        let start = from + offset;
        from = start + 2;

        let level = match bytes.get(start + 2) {
            Some(b @ b'1'..=b'6') => b - b'0',
            _ => continue,
        };
        if !matches!(bytes.get(start + 3), Some(b) if b.is_ascii_whitespace() || *b == b'>') {
            continue;
        }
        let Some(open_end) = lower[start..].find('>').map(|i| start + i) else {
            break;
        };
        let Some(close) = lower[open_end..]
            .find(&format!("</h{level}"))
            .map(|i| open_end + i)
        else {
            continue;
        };
        let Some(end) = lower[close..].find('>').map(|i| close + i + 1) else {
            break;
        };

        found.push(RawHeading {
            start,
            end,
            heading: Heading {
                level,
                text: strip_tags(&raw[open_end + 1..close]),
                id: attr_value(&raw[start + 3..open_end], "id"),
            },
        });
        from = end;
    }
    found
}

/// Value of attribute `name` in the attribute text of a tag.
fn attr_value(attrs: &str, name: &str) -> Option<String> {
    let lower = attrs.to_ascii_lowercase();
    let key = format!("{name}=");
    let pos = lower
        .match_indices(&key)
        .map(|(pos, _)| pos)
        .find(|&pos| pos == 0 || lower.as_bytes()[pos - 1].is_ascii_whitespace())?;

    let rest = &attrs[pos + key.len()..];
    let value = match rest.chars().next()? {
        quote @ ('"' | '\'') => rest[1..].split(quote).next()?,
        _ => rest
            .split(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
            .next()?,
    };
    (!value.is_empty()).then(|| value.to_string())
}

/// Text content of an HTML fragment with whitespace collapsed.
fn strip_tags(fragment: &str) -> String {
    let mut text = String::new();
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Apply the pending heading id and link focusability to raw HTML.
///
/// Raw headings take `pending_id` in document order, exactly as Markdown
/// headings do. The injected `tabindex` is placed first in the tag; the
/// first occurrence of a duplicated attribute is the one browsers keep.
fn rewrite_raw_html(raw: &str, pending_id: &mut Option<&str>, links_focusable: bool) -> String {
    let mut inserts: Vec<(usize, String)> = Vec::new();

    for element in raw_heading_elements(raw) {
        let assigned = pending_id.take();
        if let (None, Some(id)) = (&element.heading.id, assigned) {
            inserts.push((element.start + 3, format!(r#" id="{}""#, escape_attr(id))));
        }
    }
    if !links_focusable {
        let lower = raw.to_ascii_lowercase();
        for start in tag_starts(&lower, "a") {
            inserts.push((start + 2, r#" tabindex="-1""#.to_string()));
        }
    }
    if inserts.is_empty() {
        return raw.to_string();
    }

    inserts.sort_by_key(|(pos, _)| *pos);
    let mut out = String::with_capacity(raw.len() + inserts.len() * 16);
    let mut cursor = 0;
    for (pos, text) in inserts {
        out.push_str(&raw[cursor..pos]);
        out.push_str(&text);
        cursor = pos;
    }
    out.push_str(&raw[cursor..]);
    out
}

/// Opening `<a>` tag excluded from sequential focus navigation.
fn unfocusable_link_open(link_type: LinkType, dest_url: &str, title: &str) -> String {
    let href = match link_type {
        LinkType::Email if !dest_url.starts_with("mailto:") => format!("mailto:{dest_url}"),
        _ => dest_url.to_string(),
    };
    let mut tag = format!(r#"<a href="{}""#, escape_attr(&href));
    if !title.is_empty() {
        tag.push_str(&format!(r#" title="{}""#, escape_attr(title)));
    }
    tag.push_str(r#" tabindex="-1">"#);
    tag
}

/// One row container: an ordered list of regions.
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub regions: Vec<Region>,
}

impl Row {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Build a row from Markdown fragments, one per region.
    pub fn from_markdown<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(fragments.into_iter().map(Region::from_markdown).collect())
    }

    /// A title row is a single region holding only heading content.
    pub fn is_title(&self) -> bool {
        matches!(self.regions.as_slice(), [only] if only.is_heading_only())
    }
}

// =============================================================================
// Deck files
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeckFile {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    rows: Vec<RowSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RowSpec {
    #[serde(default)]
    regions: Vec<String>,
}

/// A parsed deck: its carousel id and rows.
#[derive(Debug, Clone)]
pub struct DeckSource {
    pub id: CarouselId,
    pub rows: Vec<Row>,
}

/// Parse deck TOML. Without an explicit `id` the id is derived from the text.
pub fn parse_deck(content: &str) -> Result<DeckSource, DeckError> {
    let file: DeckFile = toml::from_str(content)?;
    let id = match file.id {
        Some(raw) => CarouselId::new(raw)?,
        None => CarouselId::from_content(content.as_bytes()),
    };
    let rows = file
        .rows
        .into_iter()
        .map(|row| Row::from_markdown(row.regions))
        .collect();
    Ok(DeckSource { id, rows })
}

/// Load and parse a deck file.
pub fn load_deck(path: &Path) -> Result<DeckSource, DeckError> {
    let content = fs::read_to_string(path)?;
    parse_deck(&content)
}
