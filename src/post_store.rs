use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use std::{fs, io};

use serde::Serialize;
use spdlog::{debug, error, warn};

use crate::content::faq::extract_faq;
use crate::paginator::{Page, Paginator};
use crate::post::{Post, PostSummary};
use crate::post_list::{slug_from_path, PostList};

/// Entry of the author directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub post_count: usize,
}

/// Read-only view over a directory of post files. Every call goes to disk.
pub struct PostStore {
    post_list: PostList,
}

impl PostStore {
    pub fn new(content_dir: &Path) -> Self {
        PostStore {
            post_list: PostList::new(content_dir),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.post_list.root_dir
    }

    /// Every post that could be read, newest first, without content.
    /// Files that fail to read or parse are logged and skipped.
    pub fn list_all(&self) -> Vec<PostSummary> {
        let files = match self.post_list.retrieve_files() {
            Ok(files) => files,
            Err(e) => {
                warn!("Could not list posts in {}: {}", self.content_dir().display(), e);
                return vec![];
            }
        };

        let mut posts: Vec<PostSummary> = files.iter()
            .filter_map(|path| match load_post(path) {
                Ok(post) => Some(post.summary()),
                Err(e) => {
                    error!("Skipping post file {}: {}", path.display(), e);
                    None
                }
            })
            .collect();

        // stable: files with the same date keep their path order
        posts.sort_by_cached_key(|p| Reverse(p.parsed_date()));
        posts
    }

    /// The full post, with the FAQ section split out of its content.
    /// `None` when no post file exists for the slug or it cannot be parsed.
    pub fn get_by_slug(&self, slug: &str) -> Option<Post> {
        if !is_valid_slug(slug) {
            debug!("Rejecting invalid slug {:?}", slug);
            return None;
        }

        let path = self.post_list.file_for_slug(slug);
        let mut post = match load_post(&path) {
            Ok(post) => post,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Post not found: {}", slug);
                return None;
            }
            Err(e) => {
                error!("Error loading post {}: {}", path.display(), e);
                return None;
            }
        };

        if let Some(content) = post.content.take() {
            let extraction = extract_faq(&content);
            if post.faq.is_none() {
                post.faq = Some(extraction.items);
            }
            post.content = Some(extraction.cleaned);
        }

        Some(post)
    }

    /// Case-insensitive category match.
    pub fn get_by_category(&self, category: &str) -> Vec<PostSummary> {
        self.list_all()
            .into_iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .collect()
    }

    pub fn get_featured(&self) -> Vec<PostSummary> {
        self.list_all().into_iter().filter(|p| p.featured).collect()
    }

    /// Up to `limit` posts: same category first, then the most recent others.
    /// Never contains the post itself or duplicates.
    pub fn get_related(&self, slug: &str, limit: usize) -> Vec<PostSummary> {
        let all = self.list_all();
        let category = all.iter()
            .find(|p| p.slug == slug)
            .map(|p| p.category.clone());

        let mut related: Vec<PostSummary> = all.iter()
            .filter(|p| p.slug != slug && Some(&p.category) == category.as_ref())
            .take(limit)
            .cloned()
            .collect();

        if related.len() < limit {
            let missing = limit - related.len();
            let backfill: Vec<PostSummary> = all.iter()
                .filter(|p| p.slug != slug && !related.iter().any(|r| r.slug == p.slug))
                .take(missing)
                .cloned()
                .collect();
            related.extend(backfill);
        }

        related
    }

    /// Distinct categories, compared the way `get_by_category` matches them.
    /// Each is spelled as in its newest post.
    pub fn get_all_categories(&self) -> Vec<String> {
        let mut categories: BTreeMap<String, String> = BTreeMap::new();
        for post in self.list_all() {
            categories.entry(post.category.to_ascii_lowercase()).or_insert(post.category);
        }
        categories.into_values().collect()
    }

    /// Authors sorted by name. The role comes from the newest post that declares one.
    pub fn get_authors(&self) -> Vec<AuthorEntry> {
        let mut authors: BTreeMap<String, AuthorEntry> = BTreeMap::new();
        for post in self.list_all() {
            let entry = authors.entry(post.author.clone()).or_insert_with(|| AuthorEntry {
                name: post.author.clone(),
                role: None,
                post_count: 0,
            });
            entry.post_count += 1;
            if entry.role.is_none() {
                entry.role = post.author_role;
            }
        }
        authors.into_values().collect()
    }

    pub fn page(&self, page: usize, page_size: usize) -> io::Result<Page<PostSummary>> {
        let posts = self.list_all();
        let paginator = Paginator::from(&posts, page_size);
        paginator.page(page).map_err(|e| io::Error::new(ErrorKind::InvalidInput, e))
    }
}

/// Reads one post file. The slug is always the file stem.
fn load_post(path: &Path) -> io::Result<Post> {
    let raw = fs::read_to_string(path)?;
    let mut post = Post::from_json(path, &raw)?;

    let stem = slug_from_path(path).ok_or_else(|| {
        io::Error::new(ErrorKind::InvalidInput, format!("Invalid post file name {}", path.display()))
    })?;
    if post.slug != stem {
        warn!("Post slug {} does not match its file {}, using the file name", post.slug, path.display());
        post.slug = stem;
    }
    Ok(post)
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains(['/', '\\']) && !slug.contains("..")
}
