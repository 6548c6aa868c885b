#[cfg(test)]
pub const POST_JSON: &str = r##"{
  "id": 7,
  "slug": "neural-rendering-pipeline",
  "title": "Inside our neural rendering pipeline",
  "seoTitle": "Neural Rendering Pipeline Deep Dive",
  "seoDescription": "How we turn phone captures into real-time 3D scenes.",
  "category": "Engineering",
  "date": "2024-05-02",
  "author": "Dana Reyes",
  "authorRole": "Head of Graphics",
  "excerpt": "From capture to real-time radiance fields in ten minutes.",
  "readTime": "8 min read",
  "featured": true,
  "image": "/images/blog/pipeline.jpg",
  "heroVideo": "/videos/pipeline-hero.mp4",
  "videoMetadata": {
    "title": "Pipeline walkthrough",
    "duration": "PT2M10S"
  },
  "content": "Rendering at interactive rates needs more than a fast GPU.\n\n## Pipeline Overview\n\nOur pipeline has **three** stages.\n\n| Step | Action | Output |\n|------|--------|--------|\n| 1 | Capture | Images |\n| 2 | Train | Radiance field |\n\n## Benchmark Results\n\n| GPU | FPS |\n|-----|-----|\n| A100 | 120 |\n\nWatch the walkthrough: https://youtu.be/dQw4w9WgXcQ\n\n## FAQ\n\n**Q1: Does it run on laptops?**\n\nYes, on any recent discrete GPU.\n\n**Q2: Is training required per scene?**\n\nYes, about ten minutes per scene.\n"
}"##;

#[cfg(test)]
pub const FAQ_MARKDOWN: &str = "Intro paragraph.

## Details

Some details.

## FAQ

**Q1: What formats can I export?**

GLB, USDZ and PLY.

**Q2: Can I use it commercially?**

Yes. Every paid plan includes a commercial license.

---

**Q3: Is there an API?**

Yes, a REST API is available on the Studio plan.
";

/// Minimal post file used by the store tests.
#[cfg(test)]
pub fn post_json(id: u64, slug: &str, category: &str, date: &str) -> String {
    format!(r##"{{
  "id": {id},
  "slug": "{slug}",
  "title": "Post {slug}",
  "category": "{category}",
  "date": "{date}",
  "author": "Author {id}",
  "excerpt": "Excerpt of {slug}",
  "readTime": "3 min read"
}}"##)
}

#[cfg(test)]
pub fn test_site() -> crate::config::Site {
    crate::config::Site {
        name: "Voxelight".to_string(),
        base_url: "https://voxelight.ai".to_string(),
        blog_path: "/blog".to_string(),
        logo: Some("/logo.png".to_string()),
        default_image: Some("/images/default.jpg".to_string()),
    }
}

/// `POST_JSON` as the store hands it out: FAQ section moved out of the content.
#[cfg(test)]
pub fn sample_post() -> crate::post::Post {
    let mut post = crate::post::Post::from_json(std::path::Path::new("post.json"), POST_JSON).unwrap();
    let extraction = crate::content::faq::extract_faq(post.content_str());
    post.content = Some(extraction.cleaned);
    post.faq = Some(extraction.items);
    post
}
