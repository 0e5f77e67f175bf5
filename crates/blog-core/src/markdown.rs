//! Markdown to HTML rendering.
//!
//! Posts are rendered in [`RenderMode::Full`]; comments use
//! [`RenderMode::Restricted`], which never emits images or links. Raw HTML in
//! the source is always dropped by the engine, so the output is safe to embed.

use comrak::nodes::{AstNode, NodeValue};
use comrak::{Arena, Options, format_html, parse_document};
use once_cell::sync::Lazy;
use regex::Regex;

/// Rendering policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Post content: images and links kept and decorated.
    Full,
    /// Comment content: images removed, links reduced to their text.
    Restricted,
}

static RESIDUAL_IMG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<img\b[^>]*>").expect("img pattern is valid"));

static RESIDUAL_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?a\b[^>]*>").expect("anchor pattern is valid"));

// Only inside real tags; escaped text and code spans are left untouched.
static RESIDUAL_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(<[a-z][^>]*?)\s+href\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#)
        .expect("href pattern is valid")
});

/// Render markdown into sanitized HTML.
///
/// Never fails: malformed markdown only degrades formatting.
pub fn render(text: &str, mode: RenderMode) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let mut options = Options::default();
    configure(&mut options);

    let arena = Arena::new();
    let root = parse_document(&arena, text, &options);

    if mode == RenderMode::Restricted {
        strip_media(root);
    }

    let mut out = Vec::new();
    if let Err(e) = format_html(root, &options, &mut out) {
        tracing::warn!(error = %e, "Markdown formatting failed");
        return String::new();
    }
    let html = String::from_utf8_lossy(&out);
    let html = highlight_code_blocks(&html);

    match mode {
        RenderMode::Full => decorate(&html),
        RenderMode::Restricted => scrub(&html),
    }
}

/// Shorthand for [`render`] in full mode.
pub fn render_post(text: &str) -> String {
    render(text, RenderMode::Full)
}

/// Shorthand for [`render`] in restricted mode.
pub fn render_comment(text: &str) -> String {
    render(text, RenderMode::Restricted)
}

fn configure(options: &mut Options) {
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.render.hardbreaks = true;
    // Raw HTML is replaced by a comment marker; never pass it through.
    options.render.unsafe_ = false;
}

/// Remove image nodes and unwrap link nodes, keeping link text.
fn strip_media<'a>(root: &'a AstNode<'a>) {
    let targets: Vec<&'a AstNode<'a>> = root
        .descendants()
        .filter(|node| {
            matches!(
                node.data.borrow().value,
                NodeValue::Image(_) | NodeValue::Link(_)
            )
        })
        .collect();

    for node in targets {
        let is_link = matches!(node.data.borrow().value, NodeValue::Link(_));
        if is_link {
            let children: Vec<_> = node.children().collect();
            for child in children {
                child.detach();
                node.insert_before(child);
            }
        }
        node.detach();
    }
}

fn highlight_code_blocks(html: &str) -> String {
    html.replace("<pre>", "<div class=\"highlight\"><pre>")
        .replace("</pre>", "</pre></div>")
}

fn decorate(html: &str) -> String {
    html.replace("<img ", "<img class=\"markdown-image\" ")
        .replace("<a href=\"http", "<a target=\"_blank\" href=\"http")
}

fn scrub(html: &str) -> String {
    let html = RESIDUAL_IMG.replace_all(html, "");
    let html = RESIDUAL_ANCHOR.replace_all(&html, "");
    RESIDUAL_HREF.replace_all(&html, "$1").into_owned()
}
