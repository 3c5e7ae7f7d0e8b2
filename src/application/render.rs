//! Markdown body rendering for article pages.

use std::collections::HashSet;

use ammonia::Builder as AmmoniaBuilder;
use comrak::{Options, markdown_to_html};
use once_cell::sync::Lazy;

const CHARS_PER_MINUTE: usize = 1000;

static OPTIONS: Lazy<Options<'static>> = Lazy::new(default_options);
static SANITIZER: Lazy<AmmoniaBuilder<'static>> = Lazy::new(build_sanitizer);

/// HTML produced from a post body, plus the derived reading estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
    pub html: String,
    pub reading_minutes: usize,
}

/// Render a markdown post body to sanitised HTML.
pub fn render_body(markdown: &str) -> RenderedBody {
    let raw = markdown_to_html(markdown, &OPTIONS);
    let html = SANITIZER.clean(&raw).to_string();

    RenderedBody {
        html,
        reading_minutes: reading_minutes(markdown),
    }
}

/// One minute per thousand characters, rounded up.
pub fn reading_minutes(markdown: &str) -> usize {
    markdown.chars().count().div_ceil(CHARS_PER_MINUTE)
}

fn default_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options
}

fn build_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a",
        "blockquote",
        "br",
        "code",
        "del",
        "em",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "hr",
        "img",
        "input",
        "li",
        "ol",
        "p",
        "pre",
        "strong",
        "table",
        "tbody",
        "td",
        "th",
        "thead",
        "tr",
        "ul",
    ]);
    builder.tags(tags);

    builder.add_tag_attributes("img", &["title", "alt", "loading"]);
    builder.add_tag_attributes("code", &["class"]);
    builder.add_tag_attributes("th", &["align"]);
    builder.add_tag_attributes("td", &["align"]);
    builder.add_tag_attributes("input", &["type", "checked", "disabled"]);

    builder
}
