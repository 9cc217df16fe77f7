//! Recursive directory listing.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub trait FolderLister: Send + Sync {
    /// Flat listing of everything below `root`, in traversal order.
    ///
    /// `depth` of `None` means unbounded. `name_filter` keeps entries whose
    /// file name contains the given text, `ext_filter` keeps files with the
    /// given extension (case-insensitive). Directories are only returned
    /// when `include_dirs` is set; filters never apply to them.
    fn list_contents(
        &self,
        root: &Path,
        depth: Option<usize>,
        name_filter: Option<&str>,
        ext_filter: Option<&str>,
        include_dirs: bool,
    ) -> Vec<PathBuf>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WalkDirLister;

impl FolderLister for WalkDirLister {
    fn list_contents(
        &self,
        root: &Path,
        depth: Option<usize>,
        name_filter: Option<&str>,
        ext_filter: Option<&str>,
        include_dirs: bool,
    ) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name();
        if let Some(depth) = depth {
            walker = walker.max_depth(depth);
        }

        walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                    None
                }
            })
            .filter(|entry| {
                if entry.file_type().is_dir() {
                    return include_dirs;
                }

                let name = entry.file_name().to_string_lossy();
                if let Some(filter) = name_filter {
                    if !name.contains(filter) {
                        return false;
                    }
                }
                if let Some(ext) = ext_filter {
                    let matches = entry
                        .path()
                        .extension()
                        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
                        .unwrap_or(false);
                    if !matches {
                        return false;
                    }
                }
                true
            })
            .map(|entry| entry.into_path())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b/c.csv"), "c").unwrap();
        fs::write(dir.path().join("b/nested/d.TXT"), "d").unwrap();
        dir
    }

    #[test]
    fn test_lists_everything_in_order() {
        let dir = sample_tree();
        let root = dir.path();

        let listing = WalkDirLister.list_contents(root, None, None, None, true);
        assert_eq!(
            listing,
            vec![
                root.join("a.txt"),
                root.join("b"),
                root.join("b/c.csv"),
                root.join("b/nested"),
                root.join("b/nested/d.TXT"),
            ]
        );
    }

    #[test]
    fn test_depth_and_filters() {
        let dir = sample_tree();
        let root = dir.path();

        let shallow = WalkDirLister.list_contents(root, Some(1), None, None, false);
        assert_eq!(shallow, vec![root.join("a.txt")]);

        let txt = WalkDirLister.list_contents(root, None, None, Some("txt"), false);
        assert_eq!(txt, vec![root.join("a.txt"), root.join("b/nested/d.TXT")]);

        let named = WalkDirLister.list_contents(root, None, Some("c."), None, false);
        assert_eq!(named, vec![root.join("b/c.csv")]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let listing = WalkDirLister.list_contents(&dir.path().join("absent"), None, None, None, true);
        assert!(listing.is_empty());
    }
}
