//! Filesystem probing for path carriers.
//!
//! The resolver only ever asks three questions about a path, captured by
//! `FileProbe`. Production code uses `OsFiles`; tests and manifest-only
//! projects use `MemoryFiles`, a deterministic in-memory tree.
//!
//! All returned listings are lexicographically sorted. Resolution results
//! feed memoization and dedup keys, so ordering is part of the contract,
//! not a cosmetic choice.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// The slice of the filesystem the carrier resolver depends on.
pub trait FileProbe {
    fn directory_exists(&self, path: &str) -> bool;

    fn file_exists(&self, path: &str) -> bool;

    /// All files under `path`, recursively, in lexicographic order.
    /// Empty when `path` is not a directory.
    fn read_directory(&self, path: &str) -> Vec<String>;
}

/// `FileProbe` over the real filesystem.
///
/// Paths are interpreted as-is (project-relative carriers therefore require
/// the process, or an explicit root prefix, to anchor them). Listings come
/// back with forward slashes regardless of platform.
#[derive(Debug, Default, Clone)]
pub struct OsFiles;

impl OsFiles {
    fn collect_files(dir: &Path, out: &mut BTreeSet<String>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                Self::collect_files(&path, out);
            } else {
                out.insert(path.to_string_lossy().replace('\\', "/"));
            }
        }
    }
}

impl FileProbe for OsFiles {
    fn directory_exists(&self, path: &str) -> bool {
        Path::new(path).is_dir()
    }

    fn file_exists(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn read_directory(&self, path: &str) -> Vec<String> {
        let mut out = BTreeSet::new();
        Self::collect_files(Path::new(path), &mut out);
        out.into_iter().collect()
    }
}

/// Deterministic in-memory file tree.
///
/// Stores a flat sorted set of file paths; directories exist implicitly
/// whenever some file lives under them.
#[derive(Debug, Default, Clone)]
pub struct MemoryFiles {
    files: BTreeSet<String>,
}

impl MemoryFiles {
    pub fn new(files: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add(&mut self, file: impl Into<String>) {
        self.files.insert(file.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileProbe for MemoryFiles {
    fn directory_exists(&self, path: &str) -> bool {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        self.files.iter().any(|f| f.starts_with(&prefix))
    }

    fn file_exists(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    fn read_directory(&self, path: &str) -> Vec<String> {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        self.files
            .iter()
            .filter(|f| f.starts_with(&prefix))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_files_distinguish_files_from_directories() {
        let files = MemoryFiles::new(["/src/a.ts", "/src/sub/b.ts"]);
        assert!(files.file_exists("/src/a.ts"));
        assert!(!files.file_exists("/src"));
        assert!(files.directory_exists("/src"));
        assert!(files.directory_exists("/src/sub"));
        assert!(!files.directory_exists("/src/a.ts"));
    }

    #[test]
    fn memory_listing_is_recursive_and_sorted() {
        let files = MemoryFiles::new(["/src/z.ts", "/src/sub/b.ts", "/src/a.ts", "/other/c.ts"]);
        assert_eq!(
            files.read_directory("/src"),
            vec!["/src/a.ts", "/src/sub/b.ts", "/src/z.ts"]
        );
        assert!(files.read_directory("/missing").is_empty());
    }
}
