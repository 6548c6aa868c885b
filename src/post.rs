use std::fmt;
use std::fmt::{Display, Formatter};
use std::io;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::text_utils::parse_post_date;

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// ISO-8601 duration, e.g. `PT2M30S`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
}

/// A blog post as stored on disk, one JSON file per post.
///
/// ```json
/// {
///   "id": 12,
///   "slug": "gaussian-splatting-explained",
///   "title": "Gaussian Splatting Explained",
///   "category": "Research",
///   "date": "2024-05-02",
///   "author": "Dana Reyes",
///   "excerpt": "...",
///   "readTime": "7 min read",
///   "content": "## Why splats?\n..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    pub category: String,
    pub date: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_role: Option<String>,
    pub excerpt: String,
    pub read_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_metadata: Option<VideoMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faq: Option<Vec<FaqItem>>,
}

/// List view of a post: all of its metadata, without `content`. `faq` is only
/// present when the post file declares it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: u64,
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    pub category: String,
    pub date: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_role: Option<String>,
    pub excerpt: String,
    pub read_time: String,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_video: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_metadata: Option<VideoMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faq: Option<Vec<FaqItem>>,
}

impl Post {
    /// Parses a post file body: BOM and surrounding whitespace are removed before decoding.
    pub fn from_json(file_name: &Path, raw: &str) -> io::Result<Post> {
        let trimmed = raw.trim_start_matches(BYTE_ORDER_MARK).trim();
        serde_json::from_str::<Post>(trimmed).map_err(|e| {
            io::Error::new(ErrorKind::InvalidData, format!("{} - file={}", e, file_name.display()))
        })
    }

    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        parse_post_date(&self.date).ok()
    }

    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }

    pub fn headline(&self) -> &str {
        self.seo_title.as_deref().unwrap_or(&self.title)
    }

    pub fn description(&self) -> &str {
        self.seo_description.as_deref().unwrap_or(&self.excerpt)
    }

    pub fn content_str(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    pub fn faq_items(&self) -> &[FaqItem] {
        self.faq.as_deref().unwrap_or(&[])
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id,
            slug: self.slug.clone(),
            title: self.title.clone(),
            seo_title: self.seo_title.clone(),
            seo_description: self.seo_description.clone(),
            category: self.category.clone(),
            date: self.date.clone(),
            author: self.author.clone(),
            author_role: self.author_role.clone(),
            excerpt: self.excerpt.clone(),
            read_time: self.read_time.clone(),
            featured: self.is_featured(),
            image: self.image.clone(),
            hero_video: self.hero_video.clone(),
            video_metadata: self.video_metadata.clone(),
            faq: self.faq.clone(),
        }
    }
}

impl PostSummary {
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        parse_post_date(&self.date).ok()
    }
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, slug={}, date={}, author={}, category={}\ntitle={}\ncontent:\n{}",
               self.id,
               self.slug,
               self.date,
               self.author,
               self.category,
               self.title,
               self.content_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::test_data::POST_JSON;

    use super::*;

    #[test]
    fn test_from_json() {
        let post = Post::from_json(&PathBuf::from("neural-rendering-pipeline.json"), POST_JSON).unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.slug, "neural-rendering-pipeline");
        assert_eq!(post.author_role.as_deref(), Some("Head of Graphics"));
        assert_eq!(post.read_time, "8 min read");
        assert!(post.is_featured());
        assert!(post.faq.is_none());
        let metadata = post.video_metadata.as_ref().unwrap();
        assert_eq!(metadata.duration.as_deref(), Some("PT2M10S"));
        assert!(metadata.thumbnail.is_none());
    }

    #[test]
    fn test_from_json_with_bom_and_whitespace() {
        let raw = format!("\u{feff}\n\n  {}  \n", POST_JSON);
        let post = Post::from_json(&PathBuf::from("x.json"), &raw).unwrap();
        assert_eq!(post.title, "Inside our neural rendering pipeline");
    }

    #[test]
    fn test_from_json_invalid() {
        let err = Post::from_json(&PathBuf::from("broken.json"), "{ \"id\": 1, ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().contains("file=broken.json"));
    }

    #[test]
    fn test_fallbacks() {
        let mut post = Post::from_json(&PathBuf::from("x.json"), POST_JSON).unwrap();
        assert_eq!(post.headline(), "Neural Rendering Pipeline Deep Dive");
        post.seo_title = None;
        post.seo_description = None;
        assert_eq!(post.headline(), "Inside our neural rendering pipeline");
        assert_eq!(post.description(), post.excerpt);
        post.faq = None;
        assert!(post.faq_items().is_empty());
    }

    #[test]
    fn test_summary_has_no_content() {
        let post = Post::from_json(&PathBuf::from("x.json"), POST_JSON).unwrap();
        let json = serde_json::to_value(post.summary()).unwrap();
        assert!(json.get("content").is_none());
        assert!(json.get("faq").is_none());
        assert_eq!(json["readTime"], "8 min read");
        assert_eq!(json["featured"], true);
        assert_eq!(json["seoTitle"], "Neural Rendering Pipeline Deep Dive");
        assert_eq!(json["seoDescription"], "How we turn phone captures into real-time 3D scenes.");
        assert_eq!(json["videoMetadata"]["duration"], "PT2M10S");
    }

    #[test]
    fn test_summary_keeps_explicit_faq() {
        let mut post = Post::from_json(&PathBuf::from("x.json"), POST_JSON).unwrap();
        post.faq = Some(vec![FaqItem { question: "Q?".to_string(), answer: "A.".to_string() }]);
        let json = serde_json::to_value(post.summary()).unwrap();
        assert_eq!(json["faq"][0]["question"], "Q?");
        assert!(json.get("content").is_none());
    }
}
