// src/output/writer.rs
// =============================================================================
// Writes one markdown file per page and appends the page URL to the
// session's manifest.
//
// Markdown files never contend with each other (one path per URL), but the
// manifest is shared by every page of the session. Appends go through a
// mutex so concurrent completions cannot interleave half-written rows.
//
// The manifest is append-only: rows from earlier runs are never read back
// or deduplicated, so crawling the same site twice lists its URLs twice.
// =============================================================================

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use url::Url;

use crate::crawl::sanitize_path;
use crate::extract::ExtractedDocument;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not append to manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Where one URL's output goes. Derived from names only, no filesystem access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub markdown: PathBuf,
    pub manifest: PathBuf,
}

impl OutputPaths {
    pub fn new(root: &Path, domain_key: &str, url: &Url) -> Self {
        Self {
            markdown: pages_dir(root, domain_key).join(format!("{}.md", sanitize_path(url))),
            manifest: manifest_path(root, domain_key),
        }
    }
}

fn pages_dir(root: &Path, domain_key: &str) -> PathBuf {
    root.join("scraped_pages").join(domain_key)
}

fn manifest_path(root: &Path, domain_key: &str) -> PathBuf {
    root.join("url_list").join(format!("{domain_key}_urls.csv"))
}

/// Output sink for one session.
///
/// Creating a writer touches nothing on disk; folders appear with the first
/// page written, so a session that fails early leaves no trace.
#[derive(Debug)]
pub struct OutputWriter {
    root: PathBuf,
    domain_key: String,
    manifest_lock: Mutex<()>,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>, domain_key: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            domain_key: domain_key.into(),
            manifest_lock: Mutex::new(()),
        }
    }

    pub fn paths_for(&self, url: &Url) -> OutputPaths {
        OutputPaths::new(&self.root, &self.domain_key, url)
    }

    pub fn manifest_path(&self) -> PathBuf {
        manifest_path(&self.root, &self.domain_key)
    }

    // Saves a page and records it in the manifest
    //
    // Takes the document by value: each extracted page is written once.
    // An existing markdown file at the same path is overwritten.
    //
    // Returns: the markdown file path
    pub fn write(&self, document: ExtractedDocument) -> Result<PathBuf, OutputError> {
        let paths = self.paths_for(document.source_url());

        if let Some(dir) = paths.markdown.parent() {
            create_dir(dir)?;
        }
        fs::write(&paths.markdown, document.to_markdown()).map_err(|source| OutputError::Io {
            path: paths.markdown.clone(),
            source,
        })?;

        self.append_manifest(&paths.manifest, document.source_url())?;

        Ok(paths.markdown)
    }

    fn append_manifest(&self, path: &Path, url: &Url) -> Result<(), OutputError> {
        let _guard = self
            .manifest_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(dir) = path.parent() {
            create_dir(dir)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| OutputError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let manifest_error = |source| OutputError::Manifest {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record([url.as_str()]).map_err(manifest_error)?;
        writer
            .flush()
            .map_err(|e| manifest_error(csv::Error::from(e)))?;

        Ok(())
    }
}

fn create_dir(dir: &Path) -> Result<(), OutputError> {
    fs::create_dir_all(dir).map_err(|source| OutputError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(url: &str, body: &str) -> ExtractedDocument {
        ExtractedDocument::new(Url::parse(url).unwrap(), body.to_string())
    }

    #[test]
    fn test_paths_are_derived_from_domain_and_path() {
        let url = Url::parse("https://www.example.com/docs/intro?v=2").unwrap();
        let paths = OutputPaths::new(Path::new("out"), "examplecom", &url);
        assert_eq!(
            paths.markdown,
            Path::new("out/scraped_pages/examplecom/docsintrov2.md")
        );
        assert_eq!(paths.manifest, Path::new("out/url_list/examplecom_urls.csv"));
    }

    #[test]
    fn test_write_creates_markdown_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path(), "examplecom");

        let path = writer
            .write(doc("https://example.com/", "## Hello\n\nWorld"))
            .unwrap();

        assert_eq!(path, dir.path().join("scraped_pages/examplecom/index.md"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# https://example.com/\n\n## Hello\n\nWorld"
        );
        assert_eq!(
            fs::read_to_string(writer.manifest_path()).unwrap(),
            "https://example.com/\n"
        );
    }

    #[test]
    fn test_manifest_is_append_only_across_writers() {
        let dir = tempfile::tempdir().unwrap();

        for _ in 0..2 {
            let writer = OutputWriter::new(dir.path(), "examplecom");
            writer.write(doc("https://example.com/a", "a")).unwrap();
        }

        let manifest = fs::read_to_string(dir.path().join("url_list/examplecom_urls.csv")).unwrap();
        assert_eq!(manifest, "https://example.com/a\nhttps://example.com/a\n");
    }

    #[test]
    fn test_markdown_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path(), "examplecom");

        writer.write(doc("https://example.com/a", "first")).unwrap();
        let path = writer.write(doc("https://example.com/a", "second")).unwrap();

        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "# https://example.com/a\n\nsecond"
        );
    }

    #[test]
    fn test_manifest_escapes_commas() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path(), "examplecom");
        writer.write(doc("https://example.com/?a=1,2", "x")).unwrap();

        assert_eq!(
            fs::read_to_string(writer.manifest_path()).unwrap(),
            "\"https://example.com/?a=1,2\"\n"
        );
    }

    #[test]
    fn test_concurrent_appends_keep_rows_intact() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path(), "examplecom");

        std::thread::scope(|scope| {
            for i in 0..8 {
                let writer = &writer;
                scope.spawn(move || {
                    let url = format!("https://example.com/page-{i}");
                    writer.write(doc(&url, "body")).unwrap();
                });
            }
        });

        let manifest = fs::read_to_string(writer.manifest_path()).unwrap();
        let mut rows: Vec<&str> = manifest.lines().collect();
        rows.sort();
        let expected: Vec<String> = (0..8)
            .map(|i| format!("https://example.com/page-{i}"))
            .collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn test_nothing_touches_disk_before_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let _writer = OutputWriter::new(dir.path(), "examplecom");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
