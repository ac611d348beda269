// ABOUTME: Local content tree scanning for publication.
// ABOUTME: Produces object keys, absolute paths and sizes for every regular file.

use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;
use snafu::{OptionExt, ResultExt, ensure};

use super::error::{
    ContentError, MetadataSnafu, NonUtf8PathSnafu, NotADirectorySnafu, WalkSnafu,
};

/// Per-directory ignore file using gitignore syntax.
pub const IGNORE_FILE: &str = ".edgesiteignore";

/// One file to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    /// Object key: path relative to the root, `/`-separated.
    pub key: String,
    pub path: PathBuf,
    pub size: u64,
}

/// A scanned content directory.
///
/// Files are listed in key order. Hidden files are included; entries matched
/// by an `.edgesiteignore` file are skipped.
#[derive(Debug, Clone)]
pub struct ContentRoot {
    root: PathBuf,
    files: Vec<ContentFile>,
}

impl ContentRoot {
    /// Walk `root` and collect every regular file beneath it.
    pub fn scan(root: impl AsRef<Path>) -> Result<Self, ContentError> {
        let root = root.as_ref().to_path_buf();
        ensure!(root.is_dir(), NotADirectorySnafu { path: root.clone() });

        let walker = WalkBuilder::new(&root)
            .standard_filters(false)
            .add_custom_ignore_filename(IGNORE_FILE)
            .follow_links(true)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.context(WalkSnafu { root: root.clone() })?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if entry.file_name() == IGNORE_FILE {
                continue;
            }

            let path = entry.path().to_path_buf();
            let size = entry
                .metadata()
                .context(MetadataSnafu { path: path.clone() })?
                .len();
            let key = object_key(&root, &path)?;
            files.push(ContentFile { key, path, size });
        }

        files.sort_by(|a, b| a.key.cmp(&b.key));
        tracing::debug!(root = %root.display(), files = files.len(), "scanned content root");
        Ok(Self { root, files })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[ContentFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of all file sizes in bytes.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Relative path of `path` under `root`, joined with `/`.
fn object_key(root: &Path, path: &Path) -> Result<String, ContentError> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut parts = Vec::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().context(NonUtf8PathSnafu { path })?;
            parts.push(part);
        }
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();
        fs::create_dir_all(dir.path().join("assets/css")).unwrap();
        fs::write(dir.path().join("assets/css/site.css"), "body{}").unwrap();
        dir
    }

    #[test]
    fn keys_are_relative_and_slash_separated() {
        let dir = site();
        let content = ContentRoot::scan(dir.path()).unwrap();

        let keys: Vec<_> = content.files().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["assets/css/site.css", "index.html"]);
    }

    #[test]
    fn total_size_sums_file_lengths() {
        let dir = site();
        let content = ContentRoot::scan(dir.path()).unwrap();
        assert_eq!(content.total_size(), 11 + 6);
        assert_eq!(content.len(), 2);
    }

    #[test]
    fn hidden_files_are_included() {
        let dir = site();
        fs::create_dir_all(dir.path().join(".well-known")).unwrap();
        fs::write(dir.path().join(".well-known/security.txt"), "x").unwrap();

        let content = ContentRoot::scan(dir.path()).unwrap();
        assert!(
            content
                .files()
                .iter()
                .any(|f| f.key == ".well-known/security.txt")
        );
    }

    #[test]
    fn ignore_file_excludes_matches_and_itself() {
        let dir = site();
        fs::write(dir.path().join(IGNORE_FILE), "*.map\n").unwrap();
        fs::write(dir.path().join("app.js.map"), "{}").unwrap();

        let content = ContentRoot::scan(dir.path()).unwrap();
        let keys: Vec<_> = content.files().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["assets/css/site.css", "index.html"]);
    }

    #[test]
    fn missing_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = ContentRoot::scan(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ContentError::NotADirectory { .. }));
    }

    #[test]
    fn empty_directory_has_no_files() {
        let dir = TempDir::new().unwrap();
        let content = ContentRoot::scan(dir.path()).unwrap();
        assert!(content.is_empty());
        assert_eq!(content.total_size(), 0);
    }
}
