//! Slide construction and classification.
//!
//! [`build`] turns one input row into one [`Slide`]:
//!
//! | Row shape | Kind | Region roles |
//! |-----------|------|--------------|
//! | one region containing a picture | `ImageOnly` | `image` |
//! | anything else | `MultiColumn` | `image`, `content`, `extra-2`, `extra-3`, … |
//!
//! A single region *without* a picture is still `MultiColumn`; image-only
//! requires an actual embedded picture, not just one column.
//!
//! If the slide contains a heading, the first one becomes the slide's
//! accessible label: its author-supplied id is kept, otherwise the heading is
//! given `<slide-id>-heading`.

use crate::carousel::CarouselId;
use crate::rows::{Region, Row};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    ImageOnly,
    MultiColumn,
}

impl fmt::Display for SlideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlideKind::ImageOnly => f.write_str("image-only"),
            SlideKind::MultiColumn => f.write_str("multi-column"),
        }
    }
}

/// Role of a region within its slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionRole {
    Image,
    Content,
    /// Region at position `n` (n ≥ 2).
    Extra(usize),
}

impl RegionRole {
    fn for_position(position: usize) -> Self {
        match position {
            0 => RegionRole::Image,
            1 => RegionRole::Content,
            n => RegionRole::Extra(n),
        }
    }

    pub fn css_class(self) -> String {
        format!("carousel-slide-{self}")
    }
}

impl fmt::Display for RegionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionRole::Image => f.write_str("image"),
            RegionRole::Content => f.write_str("content"),
            RegionRole::Extra(n) => write!(f, "extra-{n}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlideRegion {
    pub role: RegionRole,
    pub region: Region,
}

/// Heading that labels a slide.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRef {
    /// Index into the slide's regions.
    pub region: usize,
    /// Element id of the heading.
    pub heading_id: String,
    /// Whether the id came from the author rather than being assigned.
    pub authored: bool,
}

#[derive(Debug, Clone)]
pub struct Slide {
    index: usize,
    element_id: String,
    kind: SlideKind,
    regions: Vec<SlideRegion>,
    label: Option<LabelRef>,
    pub(crate) hidden: bool,
    pub(crate) links_focusable: bool,
}

impl Slide {
    /// Position in the deck. Fixed at construction.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    pub fn kind(&self) -> SlideKind {
        self.kind
    }

    pub fn regions(&self) -> &[SlideRegion] {
        &self.regions
    }

    pub fn label(&self) -> Option<&LabelRef> {
        self.label.as_ref()
    }

    /// Id of the heading the slide is labelled by.
    pub fn labelled_by(&self) -> Option<&str> {
        self.label.as_ref().map(|l| l.heading_id.as_str())
    }

    /// Hidden from assistive technology.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether links inside the slide take part in sequential focus navigation.
    pub fn links_focusable(&self) -> bool {
        self.links_focusable
    }

    pub fn link_count(&self) -> usize {
        self.regions.iter().map(|r| r.region.link_count()).sum()
    }
}

/// Build the slide for `row` at `position` within carousel `carousel_id`.
pub fn build(row: Row, position: usize, carousel_id: &CarouselId) -> Slide {
    let element_id = carousel_id.slide_element_id(position);

    if row.regions.is_empty() {
        warn!(slide = %element_id, "carousel row has no content regions; building empty slide");
    }

    let image_only = matches!(row.regions.as_slice(), [only] if only.has_picture());
    let kind = if image_only {
        SlideKind::ImageOnly
    } else {
        SlideKind::MultiColumn
    };

    let regions: Vec<SlideRegion> = row
        .regions
        .into_iter()
        .enumerate()
        .map(|(pos, region)| SlideRegion {
            role: RegionRole::for_position(pos),
            region,
        })
        .collect();

    let label = find_label(&regions, &element_id);

    Slide {
        index: position,
        element_id,
        kind,
        regions,
        label,
        hidden: false,
        links_focusable: true,
    }
}

fn find_label(regions: &[SlideRegion], element_id: &str) -> Option<LabelRef> {
    regions.iter().enumerate().find_map(|(idx, slide_region)| {
        slide_region
            .region
            .headings()
            .first()
            .map(|heading| match &heading.id {
                Some(id) => LabelRef {
                    region: idx,
                    heading_id: id.clone(),
                    authored: true,
                },
                None => LabelRef {
                    region: idx,
                    heading_id: format!("{element_id}-heading"),
                    authored: false,
                },
            })
    })
}
