use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::config::Site;
use crate::content::is_video_path;
use crate::post::Post;
use crate::seo::SCHEMA_CONTEXT;

/// Placeholder used when a hero video has no known duration.
const DEFAULT_HERO_DURATION: &str = "PT1M";

lazy_static! {
    static ref VIDEO_TAG_REGEX: Regex = Regex::new(r"(?i)<video\b[^>]*>").unwrap();
    static ref TAG_ATTR_REGEX: Regex = Regex::new(r#"(?i)\s(src|poster|data-duration)\s*=\s*["']([^"']*)["']"#).unwrap();
    static ref MD_MEDIA_REGEX: Regex = Regex::new(r"!\[(?P<alt>[^\]]*)\]\((?P<src>[^)\s]+)\)").unwrap();
    static ref YOUTUBE_REGEX: Regex = Regex::new(
        r"https?://(?:www\.|m\.)?(?:youtube\.com/watch\?(?:[^\s<>]*?&)?v=|youtu\.be/|youtube\.com/shorts/)(?P<id>[A-Za-z0-9_-]{11})"
    ).unwrap();
    static ref VIMEO_REGEX: Regex = Regex::new(r"https?://(?:www\.|player\.)?vimeo\.com/(?:video/)?(?P<id>\d+)").unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoObject {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub schema_type: &'static str,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub upload_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
}

/// A video referenced from post content, before fallbacks are applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoReference {
    pub content_url: Option<String>,
    pub embed_url: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<String>,
    pub title: Option<String>,
}

impl VideoReference {
    /// The URL two references are compared by.
    fn key(&self) -> &str {
        self.embed_url.as_deref()
            .or(self.content_url.as_deref())
            .unwrap_or("")
    }
}

fn post_thumbnail(post: &Post, site: &Site) -> Option<String> {
    post.image.as_ref()
        .or(site.default_image.as_ref())
        .map(|image| site.absolute_url(image))
}

pub fn hero_video_schema(post: &Post, site: &Site) -> Option<VideoObject> {
    let hero = post.hero_video.as_ref()?;
    let meta = post.video_metadata.as_ref()?;

    Some(VideoObject {
        context: SCHEMA_CONTEXT,
        schema_type: "VideoObject",
        name: meta.title.clone().unwrap_or_else(|| post.title.clone()),
        description: meta.description.clone().unwrap_or_else(|| post.excerpt.clone()),
        thumbnail_url: meta.thumbnail.as_ref()
            .map(|thumbnail| site.absolute_url(thumbnail))
            .or_else(|| post_thumbnail(post, site)),
        upload_date: meta.upload_date.clone().unwrap_or_else(|| post.date.clone()),
        duration: Some(meta.duration.clone().unwrap_or_else(|| DEFAULT_HERO_DURATION.to_string())),
        content_url: Some(site.absolute_url(hero)),
        embed_url: None,
    })
}

/// Content videos, excluding a repeat of the hero video.
pub fn content_video_schemas(post: &Post, site: &Site) -> Vec<VideoObject> {
    let hero_url = post.hero_video.as_ref().map(|hero| site.absolute_url(hero));
    let references: Vec<VideoReference> = find_video_references(post.content_str())
        .into_iter()
        .filter(|reference| {
            let url = reference.content_url.as_ref().map(|url| site.absolute_url(url));
            url.is_none() || url != hero_url
        })
        .collect();
    let numbered = references.len() > 1;

    references.into_iter()
        .enumerate()
        .map(|(i, reference)| {
            let name = match reference.title.clone() {
                Some(title) => title,
                None if numbered => format!("{} - video {}", post.title, i + 1),
                None => post.title.clone(),
            };
            VideoObject {
                context: SCHEMA_CONTEXT,
                schema_type: "VideoObject",
                name,
                description: post.excerpt.clone(),
                thumbnail_url: reference.thumbnail.as_ref()
                    .map(|thumbnail| site.absolute_url(thumbnail))
                    .or_else(|| post_thumbnail(post, site)),
                upload_date: post.date.clone(),
                duration: reference.duration,
                content_url: reference.content_url.map(|url| site.absolute_url(&url)),
                embed_url: reference.embed_url,
            }
        })
        .collect()
}

/// Videos in `<video>` tags, markdown media, YouTube links and Vimeo links, in
/// that order, keeping the first reference to each URL.
pub fn find_video_references(content: &str) -> Vec<VideoReference> {
    let found = video_tags(content).into_iter()
        .chain(markdown_videos(content))
        .chain(youtube_videos(content))
        .chain(vimeo_videos(content));

    let mut references: Vec<VideoReference> = vec![];
    for reference in found {
        if reference.key().is_empty() || references.iter().any(|r| r.key() == reference.key()) {
            continue;
        }
        references.push(reference);
    }
    references
}

fn video_tags(content: &str) -> Vec<VideoReference> {
    VIDEO_TAG_REGEX.find_iter(content)
        .map(|tag| {
            let mut reference = VideoReference::default();
            for attr in TAG_ATTR_REGEX.captures_iter(tag.as_str()) {
                let value = attr[2].trim().to_string();
                if value.is_empty() {
                    continue;
                }
                match attr[1].to_ascii_lowercase().as_str() {
                    "src" => reference.content_url = Some(value),
                    "poster" => reference.thumbnail = Some(value),
                    _ => reference.duration = Some(value),
                }
            }
            reference
        })
        .filter(|reference| reference.content_url.is_some())
        .collect()
}

fn markdown_videos(content: &str) -> Vec<VideoReference> {
    MD_MEDIA_REGEX.captures_iter(content)
        .filter(|cap| is_video_path(&cap["src"]))
        .map(|cap| {
            let alt = cap["alt"].trim();
            VideoReference {
                content_url: Some(cap["src"].to_string()),
                title: (!alt.is_empty()).then(|| alt.to_string()),
                ..Default::default()
            }
        })
        .collect()
}

fn youtube_videos(content: &str) -> Vec<VideoReference> {
    YOUTUBE_REGEX.captures_iter(content)
        .map(|cap| {
            let id = &cap["id"];
            VideoReference {
                content_url: Some(format!("https://www.youtube.com/watch?v={}", id)),
                embed_url: Some(format!("https://www.youtube.com/embed/{}", id)),
                thumbnail: Some(format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", id)),
                ..Default::default()
            }
        })
        .collect()
}

fn vimeo_videos(content: &str) -> Vec<VideoReference> {
    VIMEO_REGEX.captures_iter(content)
        .map(|cap| {
            let id = &cap["id"];
            VideoReference {
                content_url: Some(format!("https://vimeo.com/{}", id)),
                embed_url: Some(format!("https://player.vimeo.com/video/{}", id)),
                ..Default::default()
            }
        })
        .collect()
}
