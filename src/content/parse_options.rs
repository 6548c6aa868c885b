use serde::Deserialize;

/// Feature toggles of the markdown parser. A disabled feature makes its lines
/// fall through to plain paragraph text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub tables: bool,
    pub images: bool,
    pub videos: bool,
    pub highlight_first_paragraph: bool,
    pub links: bool,
    pub code_blocks: bool,
    pub blockquotes: bool,
    pub priority_first_image: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            tables: true,
            images: true,
            videos: true,
            highlight_first_paragraph: false,
            links: true,
            code_blocks: true,
            blockquotes: true,
            priority_first_image: true,
        }
    }
}

impl ParseOptions {
    /// Every construct disabled: the parser only emits headings, lists and paragraphs.
    pub fn plain() -> Self {
        ParseOptions {
            tables: false,
            images: false,
            videos: false,
            highlight_first_paragraph: false,
            links: false,
            code_blocks: false,
            blockquotes: false,
            priority_first_image: false,
        }
    }
}
