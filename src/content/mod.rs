use serde::{Deserialize, Serialize};

pub mod faq;
pub mod inline;
pub mod parse_options;
pub mod parser;

/// A run of inline text inside a paragraph, heading or list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    Text { text: String },
    Bold { text: String },
    Link { text: String, href: String },
}

impl Inline {
    pub fn text(s: &str) -> Self {
        Inline::Text { text: s.to_string() }
    }

    pub fn bold(s: &str) -> Self {
        Inline::Bold { text: s.to_string() }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Inline::Text { text } | Inline::Bold { text } | Inline::Link { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListStyle {
    Bullet,
    Ordered,
}

/// Presentation node produced by the markdown parser, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentNode {
    Heading {
        level: u8,
        id: String,
        text: Vec<Inline>,
    },
    Paragraph {
        text: Vec<Inline>,
        lead: bool,
    },
    ListItem {
        style: ListStyle,
        #[serde(skip_serializing_if = "Option::is_none")]
        number: Option<String>,
        text: Vec<Inline>,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Image {
        src: String,
        alt: String,
        priority: bool,
    },
    Video {
        src: String,
        alt: String,
    },
    CodeBlock {
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        code: String,
    },
    Blockquote {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        author: Option<String>,
    },
    RawHtml {
        html: String,
    },
}

/// Concatenated text of a run of inline spans, markup removed.
pub fn plain_text(spans: &[Inline]) -> String {
    spans.iter().map(Inline::as_str).collect()
}

pub const VIDEO_EXTENSIONS: [&str; 3] = [".mp4", ".webm", ".mov"];

/// True when the path (query string and fragment ignored) ends in a video extension.
pub fn is_video_path(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path).to_ascii_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
