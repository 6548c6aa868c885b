use std::mem;

use lazy_static::lazy_static;
use regex::Regex;
use spdlog::debug;

use crate::content::faq::is_faq_heading;
use crate::content::inline::split_inline;
use crate::content::parse_options::ParseOptions;
use crate::content::{is_video_path, ContentNode, ListStyle};
use crate::text_utils::anchor_id;

lazy_static! {
    static ref MEDIA_REGEX: Regex = Regex::new(
        r#"^!\[(?P<alt>[^\]]*)\]\((?P<src>[^)\s]+)(?:\s+"[^"]*")?\)$"#
    ).unwrap();
    static ref ORDERED_REGEX: Regex = Regex::new(r"^(?P<number>\d+)\.\s+(?P<text>.*)$").unwrap();
    static ref QUOTE_AUTHOR_REGEX: Regex = Regex::new(
        r"(?s)^(?P<quote>.*?)\s+(?:--|—)\s*(?P<author>[^\s\-—](?:[^\-—]|-[^\-—])*)$"
    ).unwrap();
}

/// Multi-line construct currently being accumulated. At most one is open.
enum OpenBlock {
    None,
    Code { language: Option<String>, lines: Vec<String> },
    Quote(Vec<String>),
    Script(Vec<String>),
    Table(Vec<String>),
}

pub struct MarkdownParser {
    options: ParseOptions,
}

impl MarkdownParser {
    pub fn new(options: ParseOptions) -> Self {
        MarkdownParser { options }
    }

    /// Converts post content into presentation nodes in one forward pass.
    /// Never fails: anything unrecognised ends up as paragraph text.
    pub fn parse(&self, content: &str) -> Vec<ContentNode> {
        let mut state = ParseState::new(self.options);
        for line in content.lines() {
            state.feed(line);
        }
        state.finish()
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

pub fn parse_markdown(content: &str, options: ParseOptions) -> Vec<ContentNode> {
    MarkdownParser::new(options).parse(content)
}

struct ParseState {
    options: ParseOptions,
    nodes: Vec<ContentNode>,
    block: OpenBlock,
    paragraph: Vec<String>,
    seen_image: bool,
    seen_paragraph: bool,
}

impl ParseState {
    fn new(options: ParseOptions) -> Self {
        ParseState {
            options,
            nodes: vec![],
            block: OpenBlock::None,
            paragraph: vec![],
            seen_image: false,
            seen_paragraph: false,
        }
    }

    fn feed(&mut self, line: &str) {
        let trimmed = line.trim();
        if self.continue_block(line, trimmed) {
            return;
        }
        self.classify(trimmed);
    }

    /// Gives the line to the open construct. Returns false when the line is not
    /// part of it (the construct is flushed and the line still needs classifying).
    fn continue_block(&mut self, line: &str, trimmed: &str) -> bool {
        match &mut self.block {
            OpenBlock::None => false,
            OpenBlock::Code { lines, .. } => {
                if trimmed.starts_with("```") {
                    self.flush_block();
                } else {
                    lines.push(line.to_string());
                }
                true
            }
            OpenBlock::Script(lines) => {
                lines.push(line.to_string());
                if trimmed.contains("</script>") {
                    self.flush_block();
                }
                true
            }
            OpenBlock::Quote(lines) => {
                if trimmed.starts_with('>') {
                    lines.push(strip_quote(trimmed).to_string());
                    true
                } else {
                    self.flush_block();
                    false
                }
            }
            OpenBlock::Table(rows) => {
                if trimmed.starts_with('|') {
                    rows.push(trimmed.to_string());
                    true
                } else {
                    self.flush_block();
                    false
                }
            }
        }
    }

    fn classify(&mut self, trimmed: &str) {
        if trimmed.is_empty() {
            self.flush_paragraph();
            return;
        }

        if self.options.code_blocks && trimmed.starts_with("```") {
            self.flush_paragraph();
            let language = trimmed.trim_start_matches('`').trim();
            self.block = OpenBlock::Code {
                language: (!language.is_empty()).then(|| language.to_string()),
                lines: vec![],
            };
            return;
        }

        if self.options.blockquotes && trimmed.starts_with('>') {
            self.flush_paragraph();
            self.block = OpenBlock::Quote(vec![strip_quote(trimmed).to_string()]);
            return;
        }

        if trimmed.starts_with("<script") {
            self.flush_paragraph();
            if trimmed.contains("</script>") {
                self.nodes.push(ContentNode::RawHtml { html: trimmed.to_string() });
            } else {
                self.block = OpenBlock::Script(vec![trimmed.to_string()]);
            }
            return;
        }

        if let Some(node) = self.media_node(trimmed) {
            self.flush_paragraph();
            self.nodes.push(node);
            return;
        }

        if self.options.tables && trimmed.starts_with('|') {
            self.flush_paragraph();
            self.block = OpenBlock::Table(vec![trimmed.to_string()]);
            return;
        }

        // FAQ markup belongs to the extracted FAQ list, not to the body
        if is_faq_heading(trimmed) || trimmed == "---" || is_faq_question(trimmed) {
            self.flush_paragraph();
            return;
        }

        if let Some((level, text)) = heading(trimmed) {
            self.flush_paragraph();
            self.nodes.push(ContentNode::Heading {
                level,
                id: anchor_id(text),
                text: split_inline(text, self.options.links),
            });
            return;
        }

        if let Some(text) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            self.flush_paragraph();
            self.nodes.push(ContentNode::ListItem {
                style: ListStyle::Bullet,
                number: None,
                text: split_inline(text.trim(), self.options.links),
            });
            return;
        }

        if let Some(cap) = ORDERED_REGEX.captures(trimmed) {
            if let (Some(number), Some(text)) = (cap.name("number"), cap.name("text")) {
                self.flush_paragraph();
                self.nodes.push(ContentNode::ListItem {
                    style: ListStyle::Ordered,
                    number: Some(number.as_str().to_string()),
                    text: split_inline(text.as_str().trim(), self.options.links),
                });
                return;
            }
        }

        self.paragraph.push(trimmed.to_string());
    }

    fn media_node(&mut self, trimmed: &str) -> Option<ContentNode> {
        let cap = MEDIA_REGEX.captures(trimmed)?;
        let alt = cap.name("alt")?.as_str().to_string();
        let src = cap.name("src")?.as_str().to_string();

        if is_video_path(&src) {
            if !self.options.videos {
                return None;
            }
            return Some(ContentNode::Video { src, alt });
        }

        if !self.options.images {
            return None;
        }
        let priority = self.options.priority_first_image && !self.seen_image;
        self.seen_image = true;
        Some(ContentNode::Image { src, alt, priority })
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = mem::take(&mut self.paragraph).join(" ");
        let lead = self.options.highlight_first_paragraph && !self.seen_paragraph;
        self.seen_paragraph = true;
        self.nodes.push(ContentNode::Paragraph {
            text: split_inline(&text, self.options.links),
            lead,
        });
    }

    fn flush_block(&mut self) {
        let node = match mem::replace(&mut self.block, OpenBlock::None) {
            OpenBlock::None => return,
            OpenBlock::Code { language, lines } => ContentNode::CodeBlock {
                language,
                code: lines.join("\n"),
            },
            OpenBlock::Quote(lines) => blockquote_node(&lines),
            OpenBlock::Script(lines) => ContentNode::RawHtml { html: lines.join("\n") },
            OpenBlock::Table(rows) => table_node(&rows),
        };
        self.nodes.push(node);
    }

    fn finish(mut self) -> Vec<ContentNode> {
        self.flush_paragraph();
        if let OpenBlock::Script(lines) = &self.block {
            debug!("Dropping unterminated script block of {} lines", lines.len());
            self.block = OpenBlock::None;
        }
        self.flush_block();
        self.nodes
    }
}

fn heading(trimmed: &str) -> Option<(u8, &str)> {
    let (level, text) = if let Some(text) = trimmed.strip_prefix("### ") {
        (3, text)
    } else if let Some(text) = trimmed.strip_prefix("## ") {
        (2, text)
    } else if let Some(text) = trimmed.strip_prefix("# ") {
        (1, text)
    } else {
        return None;
    };
    Some((level, text.trim()))
}

fn is_faq_question(trimmed: &str) -> bool {
    trimmed.len() > 5 && trimmed.starts_with("**") && trimmed.ends_with("?**")
}

fn strip_quote(trimmed: &str) -> &str {
    let rest = trimmed.strip_prefix('>').unwrap_or(trimmed);
    rest.strip_prefix(' ').unwrap_or(rest)
}

fn blockquote_node(lines: &[String]) -> ContentNode {
    let text = lines.iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    match QUOTE_AUTHOR_REGEX.captures(&text) {
        Some(cap) => {
            let quote = cap.name("quote").map_or("", |m| m.as_str()).trim();
            let author = cap.name("author").map_or("", |m| m.as_str()).trim();
            if quote.is_empty() || author.is_empty() {
                ContentNode::Blockquote { text, author: None }
            } else {
                ContentNode::Blockquote {
                    text: quote.to_string(),
                    author: Some(author.to_string()),
                }
            }
        }
        None => ContentNode::Blockquote { text, author: None },
    }
}

/// Row 1 is the header row, row 2 the separator (always dropped), the rest data.
fn table_node(rows: &[String]) -> ContentNode {
    let mut rows = rows.iter().map(|r| split_table_row(r));
    let headers = rows.next().unwrap_or_default();
    let _separator = rows.next();
    ContentNode::Table {
        headers,
        rows: rows.collect(),
    }
}

/// Splits a `|`-delimited row into trimmed cells, without the empty cells
/// produced by the leading and trailing pipes.
pub fn split_table_row(row: &str) -> Vec<String> {
    let mut cells: Vec<String> = row.split('|').map(|c| c.trim().to_string()).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

#[cfg(test)]
mod tests {
    use crate::content::Inline;

    use super::*;

    fn parse(content: &str) -> Vec<ContentNode> {
        MarkdownParser::default().parse(content)
    }

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_heading_and_bold_paragraph() {
        let nodes = parse("## Getting Started\nHello **world**.");
        assert_eq!(nodes, vec![
            ContentNode::Heading {
                level: 2,
                id: "getting-started".to_string(),
                text: vec![Inline::text("Getting Started")],
            },
            ContentNode::Paragraph {
                text: vec![Inline::text("Hello "), Inline::bold("world"), Inline::text(".")],
                lead: false,
            },
        ]);
    }

    #[test]
    fn test_table() {
        let nodes = parse("| A | B |\n|---|---|\n| 1 | 2 |");
        assert_eq!(nodes, vec![ContentNode::Table {
            headers: strings(&["A", "B"]),
            rows: vec![strings(&["1", "2"])],
        }]);
    }

    #[test]
    fn test_table_flushed_by_text_and_separator_always_dropped() {
        let nodes = parse("| Plan | Seats |\n| Pro | 5 |\n| Team | 20 |\nAfter the table.");
        assert_eq!(nodes, vec![
            ContentNode::Table {
                headers: strings(&["Plan", "Seats"]),
                rows: vec![strings(&["Team", "20"])],
            },
            ContentNode::Paragraph { text: vec![Inline::text("After the table.")], lead: false },
        ]);
    }

    #[test]
    fn test_split_table_row() {
        assert_eq!(split_table_row("| a |  | c |"), strings(&["a", "", "c"]));
        assert_eq!(split_table_row("a | b"), strings(&["a", "b"]));
        assert!(split_table_row("|").is_empty());
    }

    #[test]
    fn test_code_block_keeps_indentation() {
        let nodes = parse("```rust\nfn main() {\n    println!(\"hi\");\n\n}\n```\nDone");
        assert_eq!(nodes[0], ContentNode::CodeBlock {
            language: Some("rust".to_string()),
            code: "fn main() {\n    println!(\"hi\");\n\n}".to_string(),
        });
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_unterminated_code_block_is_flushed() {
        let nodes = parse("```\n# not a heading\n| not | a table |");
        assert_eq!(nodes, vec![ContentNode::CodeBlock {
            language: None,
            code: "# not a heading\n| not | a table |".to_string(),
        }]);
    }

    #[test]
    fn test_blockquote_with_author() {
        let nodes = parse("> Rendering is finally fast.\n> -- Ada Park\n\n> Second quote — Jean-Luc Moreau\nText");
        assert_eq!(nodes[0], ContentNode::Blockquote {
            text: "Rendering is finally fast.".to_string(),
            author: Some("Ada Park".to_string()),
        });
        assert_eq!(nodes[1], ContentNode::Blockquote {
            text: "Second quote".to_string(),
            author: Some("Jean-Luc Moreau".to_string()),
        });
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn test_blockquote_without_author() {
        let nodes = parse("> A state-of-the-art result\n> on two lines");
        assert_eq!(nodes, vec![ContentNode::Blockquote {
            text: "A state-of-the-art result on two lines".to_string(),
            author: None,
        }]);
    }

    #[test]
    fn test_script_passthrough() {
        let content = "Before\n<script type=\"text/javascript\">\n  window.x = 1;\n\n</script>\nAfter";
        let nodes = parse(content);
        assert_eq!(nodes[1], ContentNode::RawHtml {
            html: "<script type=\"text/javascript\">\n  window.x = 1;\n\n</script>".to_string(),
        });
        assert_eq!(nodes.len(), 3);

        let nodes = parse("<script src=\"/embed.js\"></script>");
        assert_eq!(nodes, vec![ContentNode::RawHtml { html: "<script src=\"/embed.js\"></script>".to_string() }]);
    }

    #[test]
    fn test_unterminated_script_is_dropped() {
        let nodes = parse("Intro\n<script>\nlet a = 1;");
        assert_eq!(nodes, vec![ContentNode::Paragraph { text: vec![Inline::text("Intro")], lead: false }]);
    }

    #[test]
    fn test_images_and_videos() {
        let content = "![Hero](/images/hero.png)\n![Demo](/videos/demo.webm)\n![Second](/images/second.jpg \"caption\")";
        let nodes = parse(content);
        assert_eq!(nodes, vec![
            ContentNode::Image { src: "/images/hero.png".to_string(), alt: "Hero".to_string(), priority: true },
            ContentNode::Video { src: "/videos/demo.webm".to_string(), alt: "Demo".to_string() },
            ContentNode::Image { src: "/images/second.jpg".to_string(), alt: "Second".to_string(), priority: false },
        ]);

        let options = ParseOptions { priority_first_image: false, videos: false, ..ParseOptions::default() };
        let nodes = MarkdownParser::new(options).parse(content);
        assert_eq!(nodes[0], ContentNode::Image { src: "/images/hero.png".to_string(), alt: "Hero".to_string(), priority: false });
        assert!(matches!(nodes[1], ContentNode::Paragraph { .. }));
    }

    #[test]
    fn test_faq_markup_is_skipped() {
        let nodes = parse("Body\n\n---\n\n## FAQ\n\n**Q1: Is it fast?**\n\nYes.");
        assert_eq!(nodes, vec![
            ContentNode::Paragraph { text: vec![Inline::text("Body")], lead: false },
            ContentNode::Paragraph { text: vec![Inline::text("Yes.")], lead: false },
        ]);
    }

    #[test]
    fn test_lists() {
        let nodes = parse("- one\n* **two**\n3. three\n10. ten");
        assert_eq!(nodes, vec![
            ContentNode::ListItem { style: ListStyle::Bullet, number: None, text: vec![Inline::text("one")] },
            ContentNode::ListItem { style: ListStyle::Bullet, number: None, text: vec![Inline::bold("two")] },
            ContentNode::ListItem { style: ListStyle::Ordered, number: Some("3".to_string()), text: vec![Inline::text("three")] },
            ContentNode::ListItem { style: ListStyle::Ordered, number: Some("10".to_string()), text: vec![Inline::text("ten")] },
        ]);
    }

    #[test]
    fn test_heading_levels() {
        let nodes = parse("# One\n### Three: the **end**\n#### Four");
        assert!(matches!(&nodes[0], ContentNode::Heading { level: 1, id, .. } if id == "one"));
        assert!(matches!(&nodes[1], ContentNode::Heading { level: 3, id, .. } if id == "three-the-end"));
        assert!(matches!(&nodes[2], ContentNode::Paragraph { .. }));
    }

    #[test]
    fn test_paragraph_lines_join_and_lead() {
        let options = ParseOptions { highlight_first_paragraph: true, ..ParseOptions::default() };
        let nodes = MarkdownParser::new(options).parse("First line\nsecond line\n\nNext paragraph");
        assert_eq!(nodes, vec![
            ContentNode::Paragraph { text: vec![Inline::text("First line second line")], lead: true },
            ContentNode::Paragraph { text: vec![Inline::text("Next paragraph")], lead: false },
        ]);
    }

    #[test]
    fn test_disabled_features_fall_through() {
        let content = "| A | B |\n\n> quote\n\n```\ncode\n```";
        let nodes = MarkdownParser::new(ParseOptions::plain()).parse(content);
        // the three code lines join into one paragraph
        assert_eq!(nodes.len(), 3);
        assert!(nodes.iter().all(|n| matches!(n, ContentNode::Paragraph { .. })));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let content = "# T\n\n![a](/a.png)\n| x |\n|---|\n| 1 |\n> q -- me\n- item\n```\nc";
        assert_eq!(parse(content), parse(content));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n   \n").is_empty());
    }
}
