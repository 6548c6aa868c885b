use std::path::{Path, PathBuf};
use std::{fs, io};

/// The post files of a content directory: every `*.json` regular file directly inside it.
pub struct PostList {
    pub root_dir: PathBuf,
}

impl PostList {
    pub fn new(root_dir: &Path) -> Self {
        PostList { root_dir: root_dir.to_path_buf() }
    }

    /// Returns the post files sorted by path, so listing order does not depend
    /// on the file system.
    pub fn retrieve_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut posts = vec![];
        let entries = fs::read_dir(self.root_dir.as_path())?;
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() {
                continue;
            }
            if Self::is_post_file(&entry.path()) {
                posts.push(entry.path());
            }
        }
        posts.sort();
        Ok(posts)
    }

    pub fn file_for_slug(&self, slug: &str) -> PathBuf {
        self.root_dir.join(format!("{}.json", slug))
    }

    fn is_post_file(path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some("json")
    }
}

/// The slug of a post file: its name without the `.json` extension.
pub fn slug_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_string())
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;

    #[test]
    fn test_retrieve_files() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        File::create(dir.path().join("b-post.json"))?;
        File::create(dir.path().join("a-post.json"))?;
        File::create(dir.path().join("notes.md"))?;
        fs::create_dir(dir.path().join("nested.json"))?;

        let post_list = PostList::new(dir.path());
        let files = post_list.retrieve_files()?;
        assert_eq!(files, vec![dir.path().join("a-post.json"), dir.path().join("b-post.json")]);
        Ok(())
    }

    #[test]
    fn test_missing_dir() {
        let post_list = PostList::new(Path::new("this/dir/does/not/exist"));
        assert!(post_list.retrieve_files().is_err());
    }

    #[test]
    fn test_slug_from_path() {
        let path = PathBuf::from("content/blog/gaussian-splatting.json");
        assert_eq!(slug_from_path(&path).as_deref(), Some("gaussian-splatting"));
    }
}
