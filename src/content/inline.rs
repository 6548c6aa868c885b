use lazy_static::lazy_static;
use regex::Regex;

use crate::content::Inline;

lazy_static! {
    static ref BOLD_REGEX: Regex = Regex::new(r"\*\*(?P<bold>.+?)\*\*").unwrap();
    static ref BOLD_OR_LINK_REGEX: Regex = Regex::new(
        r"\*\*(?P<bold>.+?)\*\*|\[(?P<label>[^\]]+)\]\((?P<href>[^)\s]+)\)"
    ).unwrap();
}

/// Splits a line of text into plain, bold and (optionally) link spans.
/// Text outside the matches is kept verbatim; with no match the result is
/// a single text span holding the input.
pub fn split_inline(text: &str, links: bool) -> Vec<Inline> {
    let regex: &Regex = if links { &*BOLD_OR_LINK_REGEX } else { &*BOLD_REGEX };

    let mut spans = vec![];
    let mut last = 0;
    for cap in regex.captures_iter(text) {
        let Some(whole) = cap.get(0) else { continue };
        if whole.start() > last {
            spans.push(Inline::text(&text[last..whole.start()]));
        }

        if let Some(bold) = cap.name("bold") {
            spans.push(Inline::bold(bold.as_str()));
        } else if let (Some(label), Some(href)) = (cap.name("label"), cap.name("href")) {
            spans.push(Inline::Link {
                text: label.as_str().to_string(),
                href: href.as_str().to_string(),
            });
        }
        last = whole.end();
    }

    if last < text.len() {
        spans.push(Inline::text(&text[last..]));
    }
    if spans.is_empty() {
        spans.push(Inline::text(text));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_spans() {
        let spans = split_inline("Hello **world**.", false);
        assert_eq!(spans, vec![Inline::text("Hello "), Inline::bold("world"), Inline::text(".")]);
    }

    #[test]
    fn test_no_match_keeps_text() {
        let spans = split_inline("Nothing to see * here", true);
        assert_eq!(spans, vec![Inline::text("Nothing to see * here")]);
    }

    #[test]
    fn test_adjacent_and_edge_bold() {
        let spans = split_inline("**a****b** tail", false);
        assert_eq!(spans, vec![Inline::bold("a"), Inline::bold("b"), Inline::text(" tail")]);
    }

    #[test]
    fn test_links_toggle() {
        let text = "See [the docs](https://example.com/docs) and **ship**";
        let spans = split_inline(text, true);
        assert_eq!(spans, vec![
            Inline::text("See "),
            Inline::Link { text: "the docs".to_string(), href: "https://example.com/docs".to_string() },
            Inline::text(" and "),
            Inline::bold("ship"),
        ]);

        let spans = split_inline(text, false);
        assert_eq!(spans, vec![
            Inline::text("See [the docs](https://example.com/docs) and "),
            Inline::bold("ship"),
        ]);
    }

    #[test]
    fn test_unclosed_bold() {
        let spans = split_inline("**not closed", false);
        assert_eq!(spans, vec![Inline::text("**not closed")]);
    }
}
