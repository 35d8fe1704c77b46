//! Structured rich-text content.
//!
//! Admin forms submit content in one of three formats: raw HTML from the
//! source view, Markdown, or a [`Document`] node tree produced by the visual
//! editor. All three are rendered to HTML and pass through the same
//! sanitizer before they are stored.

use std::borrow::Cow;
use std::fmt::Write;

use ammonia::{Builder, UrlRelative};
use derive_more::Display;
use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};
use url::Url;

const YOUTUBE_EMBED: &str = "https://www.youtube.com/embed/";
const VIMEO_EMBED: &str = "https://player.vimeo.com/video/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", content = "body", rename_all = "lowercase")]
pub enum RichTextInput {
    Html(String),
    Markdown(String),
    Document(Document),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph { content: Vec<Inline> },
    Heading { level: u8, content: Vec<Inline> },
    BulletList { items: Vec<Vec<Inline>> },
    OrderedList { items: Vec<Vec<Inline>> },
    Quote { content: Vec<Inline> },
    Code {
        #[serde(default)]
        language: Option<String>,
        code: String,
    },
    Table {
        #[serde(default)]
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Image {
        src: String,
        #[serde(default)]
        alt: Option<String>,
        #[serde(default)]
        caption: Option<String>,
    },
    Video { url: String },
    Rule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text {
        text: String,
        #[serde(default)]
        marks: Vec<Mark>,
    },
    Link { href: String, text: String },
    LineBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
}

#[derive(Debug, Display, PartialEq)]
pub enum RichTextError {
    #[display("Heading level must be between 1 and 6, got {_0}")]
    InvalidHeadingLevel(u8),

    #[display("Only YouTube and Vimeo videos can be embedded: {_0}")]
    UnsupportedVideo(String),

    #[display("Image source must be an http(s) URL: {_0}")]
    InvalidImageSource(String),

    #[display("Link target must be an http(s), mailto or tel URL: {_0}")]
    InvalidLink(String),

    #[display("Content cannot be empty")]
    Empty,
}

impl RichTextInput {
    /// Renders the input to sanitized HTML ready for storage.
    pub fn into_html(self) -> Result<String, RichTextError> {
        let raw = match self {
            RichTextInput::Html(html) => html,
            RichTextInput::Markdown(markdown) => markdown_to_html(&markdown),
            RichTextInput::Document(doc) => render_document(&doc)?,
        };

        let clean = sanitize_html(&raw);
        if clean.trim().is_empty() {
            return Err(RichTextError::Empty);
        }
        Ok(clean)
    }
}

impl From<String> for RichTextInput {
    fn from(html: String) -> Self {
        RichTextInput::Html(html)
    }
}

pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(markdown, options);

    let mut raw_html = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut raw_html, parser);
    raw_html
}

/// Removes scripts, event handlers and foreign embeds. Formatting, tables,
/// images and YouTube/Vimeo iframes survive.
pub fn sanitize_html(content: &str) -> String {
    Builder::default()
        .add_tags(&["iframe"])
        .add_tag_attributes("iframe", &["src", "title", "allowfullscreen", "width", "height"])
        .add_tag_attributes("code", &["class"])
        .attribute_filter(filter_attribute)
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::Deny)
        .clean(content)
        .to_string()
}

fn filter_attribute<'u>(element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    match (element, attribute) {
        ("iframe", "src") if value.starts_with(YOUTUBE_EMBED) || value.starts_with(VIMEO_EMBED) => {
            Some(Cow::Borrowed(value))
        }
        ("iframe", "src") => None,
        ("code", "class") if value.starts_with("language-") => Some(Cow::Borrowed(value)),
        ("code", "class") => None,
        _ => Some(Cow::Borrowed(value)),
    }
}

/// Converts a YouTube or Vimeo page URL into its embeddable player URL.
pub fn embed_url(video_url: &str) -> Option<String> {
    let url = Url::parse(video_url.trim()).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
    let is_id = |id: &str| !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    let id = match host {
        "youtube.com" => {
            let mut segments = url.path_segments()?;
            match segments.next()? {
                "watch" => url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned())?,
                "embed" | "shorts" | "live" => segments.next()?.to_string(),
                _ => return None,
            }
        }
        "youtu.be" => url.path_segments()?.next()?.to_string(),
        "vimeo.com" => {
            let id = url.path_segments()?.find(|s| !s.is_empty())?;
            if !id.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            return Some(format!("{VIMEO_EMBED}{id}"));
        }
        "player.vimeo.com" => {
            let mut segments = url.path_segments()?;
            if segments.next()? != "video" {
                return None;
            }
            let id = segments.next()?;
            if !id.chars().all(|c| c.is_ascii_digit()) || id.is_empty() {
                return None;
            }
            return Some(format!("{VIMEO_EMBED}{id}"));
        }
        _ => return None,
    };

    is_id(&id).then(|| format!("{YOUTUBE_EMBED}{id}"))
}

pub fn render_document(doc: &Document) -> Result<String, RichTextError> {
    let mut out = String::new();
    for block in &doc.blocks {
        render_block(block, &mut out)?;
    }
    Ok(out)
}

fn render_block(block: &Block, out: &mut String) -> Result<(), RichTextError> {
    match block {
        Block::Paragraph { content } => {
            out.push_str("<p>");
            render_inlines(content, out)?;
            out.push_str("</p>");
        }
        Block::Heading { level, content } => {
            if !(1..=6).contains(level) {
                return Err(RichTextError::InvalidHeadingLevel(*level));
            }
            let _ = write!(out, "<h{level}>");
            render_inlines(content, out)?;
            let _ = write!(out, "</h{level}>");
        }
        Block::BulletList { items } | Block::OrderedList { items } => {
            let tag = if matches!(block, Block::BulletList { .. }) { "ul" } else { "ol" };
            let _ = write!(out, "<{tag}>");
            for item in items {
                out.push_str("<li>");
                render_inlines(item, out)?;
                out.push_str("</li>");
            }
            let _ = write!(out, "</{tag}>");
        }
        Block::Quote { content } => {
            out.push_str("<blockquote>");
            render_inlines(content, out)?;
            out.push_str("</blockquote>");
        }
        Block::Code { language, code } => {
            out.push_str("<pre><code");
            if let Some(lang) = language.as_deref().filter(|l| !l.trim().is_empty()) {
                let _ = write!(out, " class=\"language-{}\"", escape(&lang.trim().to_lowercase()));
            }
            out.push('>');
            out.push_str(&escape(code));
            out.push_str("</code></pre>");
        }
        Block::Table { header, rows } => {
            out.push_str("<table>");
            if !header.is_empty() {
                out.push_str("<thead><tr>");
                for cell in header {
                    let _ = write!(out, "<th>{}</th>", escape(cell));
                }
                out.push_str("</tr></thead>");
            }
            out.push_str("<tbody>");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    let _ = write!(out, "<td>{}</td>", escape(cell));
                }
                out.push_str("</tr>");
            }
            out.push_str("</tbody></table>");
        }
        Block::Image { src, alt, caption } => {
            if !is_web_url(src) {
                return Err(RichTextError::InvalidImageSource(src.clone()));
            }
            let alt = alt.as_deref().unwrap_or_default();
            let img = format!("<img src=\"{}\" alt=\"{}\">", escape(src), escape(alt));
            match caption {
                Some(caption) => {
                    let _ = write!(out, "<figure>{img}<figcaption>{}</figcaption></figure>", escape(caption));
                }
                None => out.push_str(&img),
            }
        }
        Block::Video { url } => {
            let src = embed_url(url).ok_or_else(|| RichTextError::UnsupportedVideo(url.clone()))?;
            let _ = write!(
                out,
                "<iframe src=\"{}\" title=\"Embedded video\" width=\"560\" height=\"315\" allowfullscreen></iframe>",
                escape(&src)
            );
        }
        Block::Rule => out.push_str("<hr>"),
    }
    Ok(())
}

fn render_inlines(inlines: &[Inline], out: &mut String) -> Result<(), RichTextError> {
    for inline in inlines {
        match inline {
            Inline::Text { text, marks } => {
                let mut open = String::new();
                let mut close = Vec::new();
                for mark in marks {
                    let tag = match mark {
                        Mark::Bold => "strong",
                        Mark::Italic => "em",
                        Mark::Underline => "u",
                        Mark::Strike => "s",
                        Mark::Code => "code",
                    };
                    let _ = write!(open, "<{tag}>");
                    close.push(tag);
                }
                out.push_str(&open);
                out.push_str(&escape(text));
                for tag in close.iter().rev() {
                    let _ = write!(out, "</{tag}>");
                }
            }
            Inline::Link { href, text } => {
                let allowed = is_web_url(href)
                    || href.starts_with("mailto:")
                    || href.starts_with("tel:");
                if !allowed {
                    return Err(RichTextError::InvalidLink(href.clone()));
                }
                let _ = write!(out, "<a href=\"{}\">{}</a>", escape(href), escape(text));
            }
            Inline::LineBreak => out.push_str("<br>"),
        }
    }
    Ok(())
}

fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .map(|u| u.scheme() == "http" || u.scheme() == "https")
        .unwrap_or(false)
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(t: &str) -> Inline {
        Inline::Text { text: t.into(), marks: vec![] }
    }

    #[test]
    fn document_renders_marks_in_nesting_order() {
        let doc = Document {
            blocks: vec![Block::Paragraph {
                content: vec![Inline::Text { text: "hi".into(), marks: vec![Mark::Bold, Mark::Italic] }],
            }],
        };
        assert_eq!(render_document(&doc).unwrap(), "<p><strong><em>hi</em></strong></p>");
    }

    #[test]
    fn document_escapes_text_and_code() {
        let doc = Document {
            blocks: vec![
                Block::Paragraph { content: vec![text("a < b & c")] },
                Block::Code { language: Some("Rust".into()), code: "if a < b {}".into() },
            ],
        };
        let html = render_document(&doc).unwrap();
        assert!(html.contains("<p>a &lt; b &amp; c</p>"));
        assert!(html.contains("<pre><code class=\"language-rust\">if a &lt; b {}</code></pre>"));
    }

    #[test]
    fn heading_level_out_of_range_is_rejected() {
        let doc = Document { blocks: vec![Block::Heading { level: 7, content: vec![text("x")] }] };
        assert_eq!(render_document(&doc), Err(RichTextError::InvalidHeadingLevel(7)));
    }

    #[test]
    fn tables_render_header_and_rows() {
        let doc = Document {
            blocks: vec![Block::Table {
                header: vec!["Lang".into()],
                rows: vec![vec!["Rust".into()], vec!["Go".into()]],
            }],
        };
        assert_eq!(
            render_document(&doc).unwrap(),
            "<table><thead><tr><th>Lang</th></tr></thead><tbody><tr><td>Rust</td></tr><tr><td>Go</td></tr></tbody></table>"
        );
    }

    #[test]
    fn video_urls_become_embed_urls() {
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
        assert_eq!(
            embed_url("https://youtu.be/dQw4w9WgXcQ").as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
        assert_eq!(
            embed_url("https://vimeo.com/76979871").as_deref(),
            Some("https://player.vimeo.com/video/76979871")
        );
        assert_eq!(embed_url("https://example.com/video.mp4"), None);
    }

    #[test]
    fn video_block_survives_sanitizing() {
        let input = RichTextInput::Document(Document {
            blocks: vec![Block::Video { url: "https://youtu.be/dQw4w9WgXcQ".into() }],
        });
        let html = input.into_html().unwrap();
        assert!(html.contains("src=\"https://www.youtube.com/embed/dQw4w9WgXcQ\""));
    }

    #[test]
    fn sanitizer_strips_scripts_and_foreign_iframes() {
        let dirty = r#"<p onclick="x()">ok</p><script>alert(1)</script><iframe src="https://evil.test/x"></iframe>"#;
        let clean = sanitize_html(dirty);
        assert!(clean.contains("<p>ok</p>"));
        assert!(!clean.contains("script"));
        assert!(!clean.contains("onclick"));
        assert!(!clean.contains("evil.test"));
    }

    #[test]
    fn links_get_nofollow() {
        let clean = sanitize_html(r#"<a href="https://rust-lang.org">Rust</a>"#);
        assert!(clean.contains("rel=\"nofollow noopener noreferrer\""));
    }

    #[test]
    fn markdown_input_renders_and_sanitizes() {
        let html = RichTextInput::Markdown("# Title\n\n**bold** <script>x</script>".into())
            .into_html()
            .unwrap();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn empty_after_sanitizing_is_an_error() {
        let result = RichTextInput::Html("<script>only()</script>".into()).into_html();
        assert_eq!(result, Err(RichTextError::Empty));
    }

    #[test]
    fn input_deserializes_from_tagged_json() {
        let input: RichTextInput = serde_json::from_value(serde_json::json!({
            "format": "document",
            "body": { "blocks": [ { "type": "rule" }, { "type": "paragraph", "content": [ { "type": "line_break" } ] } ] }
        }))
        .unwrap();
        assert_eq!(input.into_html().unwrap(), "<hr><p><br></p>");
    }
}
