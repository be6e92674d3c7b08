//! HTML projection of a [`Carousel`].
//!
//! Rendering reads the model and never the other way around. The output
//! follows the host markup contract:
//!
//! ```text
//! div.carousel-title                      (detached title row, if any)
//! div.carousel#carousel-<id> role=region aria-roledescription=…
//! ├── div.carousel-slides-container
//! │   ├── ul.carousel-slides
//! │   │   └── li.carousel-slide#…-slide-N data-slide-index aria-hidden aria-labelledby
//! │   │       └── div.carousel-slide-{image|content|extra-N}
//! │   └── div.carousel-navigation-buttons    (more than one slide)
//! │       ├── button.slide-prev
//! │       └── button.slide-next
//! └── nav aria-label=…                        (more than one slide)
//!     └── ol.carousel-slide-indicators
//!         └── li.carousel-slide-indicator data-target-slide=N
//!             └── button aria-label="Show Slide N of M" [disabled]
//! ```
//!
//! Uses [maud](https://maud.lambda.xyz/) so every interpolated label and id
//! is escaped. Region bodies are Markdown rendered by [`Region::render_html`].

use crate::carousel::{Carousel, Indicator};
use crate::rows::Region;
use crate::slide::{Slide, SlideKind};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../static/carousel.css");

fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Render the carousel (and its detached title) as an HTML fragment.
pub fn render_carousel(carousel: &Carousel) -> Markup {
    let labels = carousel.labels();
    let active = carousel.active_index();

    html! {
        @if let Some(title) = carousel.title() {
            div.carousel-title {
                (PreEscaped(title.render_html(None, true)))
            }
        }
        div.carousel
            id=(carousel.id().element_id())
            role="region"
            aria-roledescription=(labels.carousel)
            data-active-slide=[(!carousel.is_inert()).then_some(active)]
        {
            div.carousel-slides-container {
                ul.carousel-slides {
                    @for slide in carousel.slides() {
                        (render_slide(slide))
                    }
                }
                @if carousel.has_navigation() {
                    div.carousel-navigation-buttons {
                        button.slide-prev type="button" aria-label=(labels.previous_slide) {}
                        button.slide-next type="button" aria-label=(labels.next_slide) {}
                    }
                }
            }
            @if carousel.has_navigation() {
                nav aria-label=(labels.slide_controls) {
                    ol.carousel-slide-indicators {
                        @for indicator in carousel.indicators() {
                            (render_indicator(indicator))
                        }
                    }
                }
            }
        }
    }
}

fn render_slide(slide: &Slide) -> Markup {
    let label_region = slide.label().filter(|l| !l.authored).map(|l| l.region);

    html! {
        li.carousel-slide.carousel-slide-image-only[slide.kind() == SlideKind::ImageOnly]
            id=(slide.element_id())
            data-slide-index=(slide.index())
            aria-hidden=(bool_attr(slide.is_hidden()))
            aria-labelledby=[slide.labelled_by()]
        {
            @for (idx, slide_region) in slide.regions().iter().enumerate() {
                @let heading_id = (label_region == Some(idx)).then(|| slide.labelled_by()).flatten();
                div class=(slide_region.role.css_class()) {
                    (render_region(&slide_region.region, heading_id, slide.links_focusable()))
                }
            }
        }
    }
}

fn render_region(region: &Region, heading_id: Option<&str>, links_focusable: bool) -> Markup {
    PreEscaped(region.render_html(heading_id, links_focusable))
}

fn render_indicator(indicator: &Indicator) -> Markup {
    html! {
        li.carousel-slide-indicator data-target-slide=(indicator.target()) {
            button type="button" aria-label=(indicator.label()) disabled[indicator.is_disabled()] {}
        }
    }
}

/// A standalone HTML page around the carousel with the stock stylesheet.
pub fn render_document(carousel: &Carousel, page_title: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                main {
                    (render_carousel(carousel))
                }
            }
        }
    }
}
