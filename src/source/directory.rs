//! Local directory of slide files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::source::{non_empty, SlideSource};
use crate::types::SlideId;

/// Slide source listing the files directly inside one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectorySource {
    /// Create a source over `root` accepting the given file extensions
    /// (case-insensitive, without the dot).
    pub fn new(root: impl Into<PathBuf>, extensions: &[impl AsRef<str>]) -> Self {
        Self {
            root: root.into(),
            extensions: extensions.iter().map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase()).collect(),
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
    }

    /// Scan the directory, returning accepted files sorted by file name.
    pub fn scan(&self) -> Result<Vec<SlideId>> {
        if !self.root.is_dir() {
            return Err(Error::source(
                format!("Slide directory {} not found", self.root.display()),
                Some("Set SLIDE_SOURCE to an existing directory or a listing server URL"),
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf);
                match e.into_io_error() {
                    Some(io) => Error::io(io, path),
                    None => Error::Msg("directory walk failed".to_string()),
                }
            })?;
            if entry.file_type().is_file() && self.accepts(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        tracing::info!("Found {} slides in {}", files.len(), self.root.display());
        Ok(files.into_iter().map(SlideId::from).collect())
    }
}

#[async_trait]
impl SlideSource for DirectorySource {
    async fn load(&self) -> Result<Vec<SlideId>> {
        let source = self.clone();
        let slides = tokio::task::spawn_blocking(move || source.scan())
            .await
            .map_err(|e| Error::Msg(format!("directory scan task failed: {e}")))??;
        non_empty(slides)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use fs_err as fs;

    #[tokio::test]
    async fn lists_matching_files_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jpg", "a.PNG", "notes.txt", "c.pdf"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let source = DirectorySource::new(dir.path(), &["jpg", "png", ".pdf"]);
        let slides = source.load().await.unwrap();
        let names: Vec<_> = slides.iter().map(SlideId::display_name).collect();
        assert_eq!(names, ["a.PNG", "b.jpg", "c.pdf"]);
    }

    #[tokio::test]
    async fn empty_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path(), &["jpg"]);
        assert!(matches!(source.load().await, Err(Error::EmptySlideList)));
    }

    #[tokio::test]
    async fn missing_directory_is_source_unavailable() {
        let source = DirectorySource::new("/definitely/not/here", &["jpg"]);
        assert!(matches!(source.load().await, Err(Error::SourceUnavailable { .. })));
        assert_eq!(source.describe(), "/definitely/not/here");
    }
}
