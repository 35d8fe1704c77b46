use once_cell::sync::Lazy;
use regex::Regex;

/// Average adult reading speed used for read-time estimates.
pub const WORDS_PER_MINUTE: usize = 200;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static HTML_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[a-zA-Z#0-9]+;").expect("valid entity regex"));

/// Lowercase, hyphen-separated slug. Runs of non-alphanumerics collapse into a
/// single hyphen and edges are trimmed, so applying it twice is a no-op.
pub fn generate_slug(title: &str) -> String {
    slug::slugify(title)
}

/// Drops markup and entities, leaving the words a reader would see.
pub fn strip_html(html: &str) -> String {
    let without_tags = HTML_TAG.replace_all(html, " ");
    HTML_ENTITY.replace_all(&without_tags, " ").into_owned()
}

pub fn word_count(html: &str) -> usize {
    strip_html(html).split_whitespace().count()
}

/// Minutes needed to read `content`, never less than one.
pub fn estimate_read_time(content: &str) -> i32 {
    let words = word_count(content);
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    i32::try_from(minutes).unwrap_or(i32::MAX)
}

/// First `max_chars` characters of the visible text, cut at a word boundary.
pub fn summarize(html: &str, max_chars: usize) -> String {
    let text = strip_html(html).split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }

    let mut cut: String = text.chars().take(max_chars).collect();
    if let Some(pos) = cut.rfind(' ') {
        cut.truncate(pos);
    }
    format!("{}…", cut.trim_end_matches(|c: char| !c.is_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_punctuation_and_spaces() {
        assert_eq!(generate_slug("Hello, World!  Foo"), "hello-world-foo");
    }

    #[test]
    fn slug_is_idempotent() {
        let once = generate_slug("  Rust & WebAssembly: A Field Guide ");
        assert_eq!(generate_slug(&once), once);
    }

    #[test]
    fn read_time_rounds_up_and_floors_at_one() {
        let four_hundred = vec!["word"; 400].join(" ");
        assert_eq!(estimate_read_time(&four_hundred), 2);
        assert_eq!(estimate_read_time("word"), 1);
        assert_eq!(estimate_read_time(""), 1);

        let four_hundred_one = vec!["word"; 401].join(" ");
        assert_eq!(estimate_read_time(&four_hundred_one), 3);
    }

    #[test]
    fn read_time_ignores_markup() {
        let html = format!("<p>{}</p><img src=\"a.png\" alt=\"x\">", vec!["w"; 200].join(" "));
        assert_eq!(word_count(&html), 200);
        assert_eq!(estimate_read_time(&html), 1);
    }

    #[test]
    fn summarize_cuts_on_word_boundary() {
        let summary = summarize("<p>The quick brown fox jumps over the lazy dog</p>", 18);
        assert_eq!(summary, "The quick brown…");
        assert_eq!(summarize("<b>short</b>", 50), "short");
    }
}
