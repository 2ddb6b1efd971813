// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::hash::Hasher;
use std::path::{Path, PathBuf};

use rustc_hash::FxHasher;

use crate::document::Document;
use crate::export;
use crate::LtxError;

/// A content-hash-keyed store of parsed documents.
///
/// The cache key combines the requested file's name with a hash of its raw
/// bytes, so any edit re-parses while an unchanged file loads straight from
/// its snapshot. The parser core never depends on this module; it is one
/// consumer of the snapshot contract in [`crate::export`].
pub struct DocumentCache {
    dir: PathBuf,
}

impl DocumentCache {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        DocumentCache {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// The conventional per-user cache location.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("ltx-cfg"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load a document through the cache: deserialize the snapshot keyed by
    /// the file's current content hash, or parse and store on a miss. A
    /// stale or unreadable snapshot falls back to a re-parse.
    ///
    /// # Examples
    /// ```no_run
    /// # use ltx_cfg::DocumentCache;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let cache = DocumentCache::new(".cache");
    /// let doc = cache.load("configs/system.ltx")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Document, LtxError> {
        let path = path.as_ref();

        let bytes = fs::read(path).map_err(|e| LtxError::File {
            message: format!("Failed to read file: {}", e),
            path: path.display().to_string(),
            hint: Some("Check that the file exists and is readable".into()),
            code: Some(401),
        })?;

        let snapshot_path = self.dir.join(snapshot_name(path, &bytes));

        if let Ok(text) = fs::read_to_string(&snapshot_path) {
            match export::from_json(&text) {
                Ok(document) => {
                    tracing::debug!(path = %snapshot_path.display(), "loaded document snapshot");
                    return Ok(document);
                }
                Err(e) => {
                    tracing::warn!(
                        path = %snapshot_path.display(),
                        error = %e,
                        "discarding unusable snapshot"
                    );
                }
            }
        }

        let document = Document::from_file(path)?;
        self.store(&snapshot_path, &document);
        Ok(document)
    }

    /// Best effort: a document that cannot be snapshotted is still returned
    /// to the caller.
    fn store(&self, snapshot_path: &Path, document: &Document) {
        let result = fs::create_dir_all(&self.dir)
            .map_err(|e| e.to_string())
            .and_then(|_| export::to_json(document).map_err(|e| e.to_string()))
            .and_then(|json| fs::write(snapshot_path, json).map_err(|e| e.to_string()));

        if let Err(error) = result {
            tracing::warn!(
                path = %snapshot_path.display(),
                error = %error,
                "failed to write document snapshot"
            );
        }
    }
}

/// `system.ltx` with content hash `1f...` snapshots as
/// `system_ltx_1f....json`.
fn snapshot_name(path: &Path, bytes: &[u8]) -> String {
    let base = match path.file_name() {
        Some(name) => name.to_string_lossy().replace('.', "_"),
        None => "ltx".to_string(),
    };

    let mut hasher = FxHasher::default();
    hasher.write(bytes);

    format!("{}_{:016x}.json", base, hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Value;

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("system.ltx");
        fs::write(&path, "[actor]\nhp = 100\n").expect("Failed to write sample");
        path
    }

    #[test]
    fn test_miss_parses_and_stores_snapshot() {
        let tmp = tempfile::tempdir().expect("Failed to create temp dir");
        let cache = DocumentCache::new(tmp.path().join("cache"));
        let path = write_sample(tmp.path());

        let doc = cache.load(&path).expect("Failed to load document");
        assert_eq!(doc.section("actor").unwrap().get(&doc, "hp"), Value::Scalar("100".into()));

        let snapshots: Vec<_> = fs::read_dir(cache.dir())
            .expect("Cache dir missing")
            .flatten()
            .collect();
        assert_eq!(snapshots.len(), 1);
    }

    #[test]
    fn test_hit_answers_like_a_parse() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DocumentCache::new(tmp.path().join("cache"));
        let path = write_sample(tmp.path());

        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();

        let a = first.section("actor").unwrap();
        let b = second.section("actor").unwrap();
        assert_eq!(a.get_all(&first), b.get_all(&second));
    }

    #[test]
    fn test_changed_content_gets_a_new_key() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DocumentCache::new(tmp.path().join("cache"));
        let path = write_sample(tmp.path());

        cache.load(&path).unwrap();

        fs::write(&path, "[actor]\nhp = 250\n").unwrap();
        let doc = cache.load(&path).unwrap();
        assert_eq!(doc.section("actor").unwrap().get(&doc, "hp"), Value::Scalar("250".into()));

        let snapshots: Vec<_> = fs::read_dir(cache.dir()).unwrap().flatten().collect();
        assert_eq!(snapshots.len(), 2);
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_parse() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DocumentCache::new(tmp.path().join("cache"));
        let path = write_sample(tmp.path());

        cache.load(&path).unwrap();

        // clobber every snapshot in the cache dir
        for entry in fs::read_dir(cache.dir()).unwrap().flatten() {
            fs::write(entry.path(), "not a snapshot").unwrap();
        }

        let doc = cache.load(&path).expect("Fallback parse failed");
        assert_eq!(doc.section("actor").unwrap().get(&doc, "hp"), Value::Scalar("100".into()));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DocumentCache::new(tmp.path().join("cache"));

        assert!(matches!(
            cache.load(tmp.path().join("absent.ltx")),
            Err(LtxError::File { .. })
        ));
    }
}
