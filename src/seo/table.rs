use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::config::Site;
use crate::content::parser::split_table_row;
use crate::post::Post;
use crate::seo::{Organization, StructuredData, SCHEMA_CONTEXT};

const PROCESS_KEYWORDS: [&str; 6] = ["step", "process", "workflow", "phase", "stage", "procedure"];

lazy_static! {
    static ref SEPARATOR_ROW_REGEX: Regex = Regex::new(r"^\|?(?:\s*:?-+:?\s*\|)*\s*:?-+:?\s*\|?$").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn is_process(&self) -> bool {
        self.headers.iter()
            .chain(self.rows.iter().flatten())
            .map(|cell| cell.to_lowercase())
            .any(|cell| PROCESS_KEYWORDS.iter().any(|keyword| cell.contains(keyword)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HowToStep {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub position: usize,
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HowTo {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub name: String,
    pub description: String,
    pub step: Vec<HowToStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub name: String,
    pub description: String,
    pub url: String,
    pub creator: Organization,
    pub variable_measured: Vec<String>,
}

/// One HowTo or Dataset per table in the post content.
pub fn table_schemas(post: &Post, site: &Site) -> Vec<StructuredData> {
    scan_tables(post.content_str())
        .into_iter()
        .enumerate()
        .map(|(i, table)| {
            if table.is_process() {
                StructuredData::HowTo(how_to_schema(post, &table))
            } else {
                StructuredData::Dataset(dataset_schema(post, site, &table, i + 1))
            }
        })
        .collect()
}

fn how_to_schema(post: &Post, table: &RawTable) -> HowTo {
    let step = table.rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let name = row.first().cloned().unwrap_or_default();
            let text = row.iter()
                .skip(1)
                .filter(|cell| !cell.is_empty())
                .cloned()
                .collect::<Vec<String>>()
                .join(" - ");
            HowToStep {
                schema_type: "HowToStep",
                position: i + 1,
                text: if text.is_empty() { name.clone() } else { text },
                name,
            }
        })
        .collect();

    HowTo {
        context: SCHEMA_CONTEXT,
        schema_type: "HowTo",
        name: post.headline().to_string(),
        description: post.description().to_string(),
        step,
    }
}

fn dataset_schema(post: &Post, site: &Site, table: &RawTable, number: usize) -> Dataset {
    Dataset {
        context: SCHEMA_CONTEXT,
        schema_type: "Dataset",
        name: format!("{} - Table {}", post.title, number),
        description: format!("Data table from \"{}\" with columns: {}", post.title, table.headers.join(", ")),
        url: site.post_url(&post.slug),
        creator: Organization::from_site(site),
        variable_measured: table.headers.clone(),
    }
}

/// Finds `|` tables in raw markdown, outside code fences. The first row is the
/// header, alignment rows are skipped and tables without data rows are dropped.
pub fn scan_tables(content: &str) -> Vec<RawTable> {
    let mut tables = vec![];
    let mut block: Vec<&str> = vec![];
    let mut in_code = false;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with("```") {
            in_code = !in_code;
        }
        if !in_code && line.starts_with('|') {
            block.push(line);
            continue;
        }
        if let Some(table) = table_from_rows(&block) {
            tables.push(table);
        }
        block.clear();
    }
    if let Some(table) = table_from_rows(&block) {
        tables.push(table);
    }

    tables
}

fn table_from_rows(block: &[&str]) -> Option<RawTable> {
    let (header, rest) = block.split_first()?;
    let rows: Vec<Vec<String>> = rest.iter()
        .filter(|row| !SEPARATOR_ROW_REGEX.is_match(row))
        .map(|row| split_table_row(row))
        .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .collect();

    if rows.is_empty() {
        return None;
    }
    Some(RawTable {
        headers: split_table_row(header),
        rows,
    })
}
