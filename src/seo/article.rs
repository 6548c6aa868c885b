use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::config::Site;
use crate::post::Post;
use crate::seo::{Organization, Person, SCHEMA_CONTEXT};
use crate::text_utils::word_count;

const MAX_KEYWORDS: usize = 10;

lazy_static! {
    static ref SECTION_HEADING_REGEX: Regex = Regex::new(r"(?m)^#{2,3}[ \t]+(.+?)[ \t]*$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebPage {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub headline: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub url: String,
    pub date_published: String,
    pub date_modified: String,
    pub author: Person,
    pub publisher: Organization,
    pub main_entity_of_page: WebPage,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    pub article_section: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub position: usize,
    pub name: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub name: String,
    pub accepted_answer: Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPage {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub main_entity: Vec<Question>,
}

pub fn article_schema(post: &Post, site: &Site) -> Article {
    let url = site.post_url(&post.slug);
    let image = post.image.as_ref()
        .or(site.default_image.as_ref())
        .map(|image| site.absolute_url(image));

    Article {
        context: SCHEMA_CONTEXT,
        schema_type: "Article",
        headline: post.headline().to_string(),
        description: post.description().to_string(),
        image,
        url: url.clone(),
        date_published: post.date.clone(),
        date_modified: post.date.clone(),
        author: Person {
            schema_type: "Person",
            name: post.author.clone(),
            job_title: post.author_role.clone(),
        },
        publisher: Organization::from_site(site),
        main_entity_of_page: WebPage {
            schema_type: "WebPage",
            id: url,
        },
        word_count: word_count(post.content_str()),
        keywords: heading_keywords(post.content_str()),
        article_section: post.category.clone(),
    }
}

/// Home, the blog index, then the post itself.
pub fn breadcrumb_schema(post: &Post, site: &Site) -> BreadcrumbList {
    let crumbs = [
        ("Home".to_string(), site.absolute_url("/")),
        ("Blog".to_string(), site.blog_url()),
        (post.title.clone(), site.post_url(&post.slug)),
    ];

    BreadcrumbList {
        context: SCHEMA_CONTEXT,
        schema_type: "BreadcrumbList",
        item_list_element: crumbs.into_iter()
            .enumerate()
            .map(|(i, (name, item))| ListItem {
                schema_type: "ListItem",
                position: i + 1,
                name,
                item,
            })
            .collect(),
    }
}

pub fn faq_schema(post: &Post) -> Option<FaqPage> {
    let items = post.faq_items();
    if items.is_empty() {
        return None;
    }

    Some(FaqPage {
        context: SCHEMA_CONTEXT,
        schema_type: "FAQPage",
        main_entity: items.iter()
            .map(|item| Question {
                schema_type: "Question",
                name: item.question.clone(),
                accepted_answer: Answer {
                    schema_type: "Answer",
                    text: item.answer.clone(),
                },
            })
            .collect(),
    })
}

/// Words longer than three characters from the level 2 and 3 headings,
/// lowercased, stripped of punctuation, first occurrence kept, at most ten.
pub fn heading_keywords(content: &str) -> Vec<String> {
    let mut keywords: Vec<String> = vec![];
    for cap in SECTION_HEADING_REGEX.captures_iter(content) {
        for word in cap[1].split_whitespace() {
            let word: String = word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .collect::<String>()
                .trim_matches('-')
                .to_lowercase();
            if word.chars().count() <= 3 || keywords.contains(&word) {
                continue;
            }
            keywords.push(word);
            if keywords.len() == MAX_KEYWORDS {
                return keywords;
            }
        }
    }
    keywords
}
