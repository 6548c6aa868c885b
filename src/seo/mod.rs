//! schema.org JSON-LD documents derived from a post.

use serde::Serialize;

use crate::config::Site;
use crate::post::Post;

pub mod article;
pub mod table;
pub mod video;

pub use article::{Article, BreadcrumbList, FaqPage};
pub use table::{Dataset, HowTo};
pub use video::VideoObject;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub name: String,
    #[serde(rename = "jobTitle", skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organization {
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageObject>,
}

impl Organization {
    pub fn from_site(site: &Site) -> Self {
        Organization {
            schema_type: "Organization",
            name: site.name.clone(),
            url: site.absolute_url("/"),
            logo: site.logo.as_ref().map(|logo| ImageObject {
                schema_type: "ImageObject",
                url: site.absolute_url(logo),
            }),
        }
    }
}

/// One JSON-LD document. Serializes as the bare schema object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StructuredData {
    Article(Article),
    Breadcrumb(BreadcrumbList),
    Video(VideoObject),
    FaqPage(FaqPage),
    HowTo(HowTo),
    Dataset(Dataset),
}

impl StructuredData {
    pub fn schema_type(&self) -> &'static str {
        match self {
            StructuredData::Article(_) => "Article",
            StructuredData::Breadcrumb(_) => "BreadcrumbList",
            StructuredData::Video(_) => "VideoObject",
            StructuredData::FaqPage(_) => "FAQPage",
            StructuredData::HowTo(_) => "HowTo",
            StructuredData::Dataset(_) => "Dataset",
        }
    }

    pub fn to_json_ld(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Wraps the document in a `<script type="application/ld+json">` element.
    /// `</` is escaped so content can never close the element early.
    pub fn to_script_tag(&self) -> serde_json::Result<String> {
        let json = self.to_json_ld()?.replace("</", "<\\/");
        Ok(format!("<script type=\"application/ld+json\">{}</script>", json))
    }
}

/// Every document for a post page: article, breadcrumb, hero video, content
/// videos, FAQ page, then one document per data table.
pub fn generate_all(post: &Post, site: &Site) -> Vec<StructuredData> {
    let mut documents = vec![
        StructuredData::Article(article::article_schema(post, site)),
        StructuredData::Breadcrumb(article::breadcrumb_schema(post, site)),
    ];

    if let Some(hero) = video::hero_video_schema(post, site) {
        documents.push(StructuredData::Video(hero));
    }
    documents.extend(video::content_video_schemas(post, site).into_iter().map(StructuredData::Video));

    if let Some(faq) = article::faq_schema(post) {
        documents.push(StructuredData::FaqPage(faq));
    }
    documents.extend(table::table_schemas(post, site));

    documents
}
