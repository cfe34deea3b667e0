//! HTML rendering of a [`RenderingModel`].
//!
//! Markdown goes through `pulldown-cmark`; the page shell is a Maud template.
//! Images whose dimensions were resolved are emitted with explicit `width` and
//! `height` attributes so the browser can reserve layout space. All other
//! images render exactly as `pulldown-cmark` would render them.

use crate::scanner;
use crate::types::{Document, ImageDimensions, RenderingModel};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, Parser, Tag, TagEnd, html as md_html};
use std::collections::BTreeMap;

/// An image being replaced, collecting its alt text until the closing tag.
struct SizedImage {
    src: String,
    title: String,
    alt: String,
    dims: ImageDimensions,
    /// Images nested inside this image's alt text.
    depth: usize,
}

impl SizedImage {
    fn markup(&self) -> Markup {
        let title = (!self.title.is_empty()).then_some(self.title.as_str());
        html! {
            img src=(self.src) alt=(self.alt) title=[title]
                width=(self.dims.width()) height=(self.dims.height());
        }
    }
}

/// Markdown body to HTML, sizing every image found in `image_sizes`.
pub fn render_body(body: &str, image_sizes: &BTreeMap<String, ImageDimensions>) -> String {
    let mut events = Vec::new();
    let mut pending: Option<SizedImage> = None;

    for event in Parser::new_ext(body, scanner::markdown_options()) {
        if let Some(image) = pending.as_mut() {
            match event {
                Event::Start(Tag::Image { .. }) => image.depth += 1,
                Event::End(TagEnd::Image) if image.depth > 0 => image.depth -= 1,
                Event::End(TagEnd::Image) => {
                    events.push(Event::InlineHtml(image.markup().into_string().into()));
                    pending = None;
                }
                Event::Text(text) | Event::Code(text) => image.alt.push_str(&text),
                Event::SoftBreak | Event::HardBreak => image.alt.push(' '),
                _ => {}
            }
            continue;
        }

        if let Event::Start(Tag::Image {
            dest_url, title, ..
        }) = &event
            && let Some(dims) = image_sizes.get(&**dest_url)
        {
            pending = Some(SizedImage {
                src: dest_url.to_string(),
                title: title.to_string(),
                alt: String::new(),
                dims: *dims,
                depth: 0,
            });
            continue;
        }

        events.push(event);
    }

    let mut html = String::with_capacity(body.len() * 3 / 2);
    md_html::push_html(&mut html, events.into_iter());
    html
}

/// Title, author, cover and date. `image_sizes` covers body images only,
/// so the cover is emitted without dimensions.
fn post_header(doc: &Document) -> Markup {
    html! {
        header.post-header {
            @if let Some(title) = &doc.title {
                h1.post-title { (title) }
            }
            @if let Some(author) = &doc.author {
                div.post-author {
                    @if let Some(picture) = &author.picture {
                        img.avatar src=(picture) alt=(author.name);
                    }
                    span.author-name { (author.name) }
                }
            }
            @if let Some(cover) = &doc.cover_image {
                figure.cover-image {
                    img src=(cover) alt={ "Cover Image for " (doc.title.as_deref().unwrap_or(&doc.slug)) };
                }
            }
            @if let Some(date) = &doc.date {
                time.post-date datetime=(date) { (date) }
            }
        }
    }
}

/// Full HTML page for one post.
pub fn render_page(model: &RenderingModel) -> Markup {
    let doc = &model.document;
    let page_title = doc.title.as_deref().unwrap_or(&doc.slug);
    let body = doc
        .body
        .as_deref()
        .map(|b| render_body(b, &model.image_sizes))
        .unwrap_or_default();

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                @if let Some(og) = &doc.og_image {
                    meta property="og:image" content=(og);
                }
            }
            body {
                article.post {
                    (post_header(doc))
                    div.post-body {
                        (PreEscaped(body))
                    }
                }
            }
        }
    }
}
