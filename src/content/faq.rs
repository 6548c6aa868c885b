//! FAQ section extraction.
//!
//! Posts end with an optional section authored as
//!
//! ```text
//! ## FAQ
//!
//! **Q1: Does it run on laptops?**
//!
//! Yes, on any recent discrete GPU.
//! ```
//!
//! Matching is pattern bound: a question has to be bold, end with `?` and be
//! followed by a blank line. Content written any other way yields no items.

use lazy_static::lazy_static;
use regex::Regex;

use crate::post::FaqItem;

lazy_static! {
    static ref FAQ_HEADER_REGEX: Regex = Regex::new(r"(?im)^[ \t]*##[ \t]+faqs?\b[^\n]*$").unwrap();
    static ref FAQ_LINE_REGEX: Regex = Regex::new(r"(?i)^##[ \t]+faqs?\b").unwrap();
    static ref QUESTION_REGEX: Regex = Regex::new(
        r"(?m)^[ \t]*\*\*(?:Q\d+[:.][ \t]*)?(?P<question>[^*\n]+?\?)\*\*[ \t]*\r?\n[ \t]*\r?\n"
    ).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqExtraction {
    pub items: Vec<FaqItem>,
    /// Content with the whole FAQ section removed.
    pub cleaned: String,
}

/// True for a `## FAQ` heading line, any case.
pub fn is_faq_heading(line: &str) -> bool {
    FAQ_LINE_REGEX.is_match(line.trim())
}

/// Splits the trailing FAQ section off `raw`. The section runs from the first
/// `## FAQ` heading outside a code fence to the end of the content.
pub fn extract_faq(raw: &str) -> FaqExtraction {
    let header = FAQ_HEADER_REGEX.find_iter(raw)
        .find(|m| !inside_code_fence(raw, m.start()));
    let Some(header) = header else {
        return FaqExtraction {
            items: vec![],
            cleaned: raw.to_string(),
        };
    };

    let section = &raw[header.end()..];
    let questions: Vec<_> = QUESTION_REGEX.captures_iter(section)
        .filter_map(|cap| Some((cap.get(0)?, cap.name("question")?)))
        .collect();

    let mut items = vec![];
    for (i, (block, question)) in questions.iter().enumerate() {
        let answer_end = questions.get(i + 1)
            .map_or(section.len(), |(next, _)| next.start());
        let answer = clean_answer(&section[block.end()..answer_end]);
        if answer.is_empty() {
            continue;
        }
        items.push(FaqItem {
            question: question.as_str().trim().to_string(),
            answer,
        });
    }

    FaqExtraction {
        items,
        cleaned: raw[..header.start()].trim().to_string(),
    }
}

/// True when an odd number of fence lines precede `pos`.
fn inside_code_fence(raw: &str, pos: usize) -> bool {
    raw[..pos].lines()
        .filter(|line| line.trim_start().starts_with("```"))
        .count() % 2 == 1
}

fn clean_answer(text: &str) -> String {
    let mut lines: Vec<&str> = text.trim().lines().collect();
    while let Some(last) = lines.last() {
        let last = last.trim();
        if last.is_empty() || last == "---" {
            lines.pop();
        } else {
            break;
        }
    }
    lines.join("\n").trim().to_string()
}
