//! Top-down directory traversal with folder pruning.
//!
//! [`Walker`] is a lazy iterator: each call to `next` reads one directory and
//! returns its files. Subdirectories are listed at the same moment, pruned
//! through the [`FilterSet`], and pushed for later visits. Because the
//! subdirectory list is a snapshot, folders created while the caller handles a
//! listing are not visited during the same walk.

use crate::classifier::extension_token;
use crate::file_organizer::{OrganizeError, OrganizeResult};
use crate::filters::FilterSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// A non-directory entry found during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Name as stored on disk; may not be valid UTF-8.
    pub file_name: OsString,
    /// Lossy UTF-8 rendering of `file_name`, for display and matching.
    pub name: String,
    pub path: PathBuf,
    /// Uppercased extension token, see [`extension_token`].
    pub extension: String,
}

/// The files directly inside one visited directory.
#[derive(Debug, Clone)]
pub struct DirListing {
    pub path: PathBuf,
    pub files: Vec<FileEntry>,
}

/// Depth-first, top-down traversal of a directory tree.
pub struct Walker<'a> {
    filters: &'a FilterSet,
    recursive: bool,
    pending: Vec<PathBuf>,
}

impl<'a> Walker<'a> {
    /// Starts a walk at `root`. With `recursive` off only `root` itself is listed.
    pub fn new(root: &Path, filters: &'a FilterSet, recursive: bool) -> Self {
        Self {
            filters,
            recursive,
            pending: vec![root.to_path_buf()],
        }
    }

    fn visit(&mut self, dir: PathBuf) -> OrganizeResult<DirListing> {
        let entries = fs::read_dir(&dir).map_err(|e| OrganizeError::DirectoryReadFailed {
            path: dir.clone(),
            source: e,
        })?;

        let mut files = Vec::new();
        let mut subdirs = Vec::new();

        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy().to_string();
            let path = entry.path();

            if file_type.is_dir() {
                if !self.recursive {
                    continue;
                }
                if self.filters.is_folder_excluded(&name) {
                    tracing::debug!("Pruned folder: {}", path.display());
                } else {
                    subdirs.push(path);
                }
            } else if file_type.is_symlink() && is_link_to_dir(&path) {
                tracing::debug!("Not following linked directory: {}", path.display());
            } else {
                if file_type.is_symlink() && fs::metadata(&path).is_err() {
                    tracing::debug!("Dangling link listed as a file: {}", path.display());
                }
                files.push(FileEntry {
                    extension: extension_token(&name),
                    file_name,
                    name,
                    path,
                });
            }
        }

        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        // Reverse order on the stack so children pop in name order.
        subdirs.sort_by(|a, b| b.cmp(a));
        self.pending.extend(subdirs);

        Ok(DirListing { path: dir, files })
    }
}

impl Iterator for Walker<'_> {
    type Item = OrganizeResult<DirListing>;

    fn next(&mut self) -> Option<Self::Item> {
        let dir = self.pending.pop()?;
        Some(self.visit(dir))
    }
}

/// Links to directories are never followed. Every other link, dangling ones
/// included, is handled like a file and moved as a link.
fn is_link_to_dir(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_dir()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent");
        }
        fs::write(path, "x").expect("Failed to write file");
    }

    fn collect(walker: Walker<'_>) -> Vec<DirListing> {
        walker
            .map(|listing| listing.expect("walk failed"))
            .collect()
    }

    fn names(listing: &DirListing) -> Vec<&str> {
        listing.files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_walk_visits_top_down_in_name_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(root, "b.txt");
        touch(root, "a.jpg");
        touch(root, "beta/x.md");
        touch(root, "alpha/inner/y.rs");

        let filters = FilterSet::default();
        let listings = collect(Walker::new(root, &filters, true));
        let dirs: Vec<PathBuf> = listings.iter().map(|l| l.path.clone()).collect();

        assert_eq!(
            dirs,
            vec![
                root.to_path_buf(),
                root.join("alpha"),
                root.join("alpha/inner"),
                root.join("beta"),
            ]
        );
        assert_eq!(names(&listings[0]), vec!["a.jpg", "b.txt"]);
        assert_eq!(listings[0].files[0].extension, "JPG");
    }

    #[test]
    fn test_non_recursive_lists_root_only() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(root, "top.txt");
        touch(root, "sub/deep.txt");

        let filters = FilterSet::default();
        let listings = collect(Walker::new(root, &filters, false));

        assert_eq!(listings.len(), 1);
        assert_eq!(names(&listings[0]), vec!["top.txt"]);
    }

    #[test]
    fn test_excluded_folder_is_pruned() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(root, "keep/a.txt");
        touch(root, "node_modules/b.js");
        touch(root, "node_modules/nested/c.js");

        let filters = FilterSet::new(Vec::<String>::new(), ["node_modules"], Vec::<String>::new());
        let listings = collect(Walker::new(root, &filters, true));

        assert!(
            listings
                .iter()
                .all(|l| !l.path.starts_with(root.join("node_modules")))
        );
        assert_eq!(listings.len(), 2);
    }

    #[test]
    fn test_format_named_folders_are_pruned() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(root, "tmp/a.tmp");
        touch(root, "PDF/b.pdf");
        touch(root, "other/c.txt");

        let filters = FilterSet::new(["TMP"], Vec::<String>::new(), ["pdf"]);
        let listings = collect(Walker::new(root, &filters, true));
        let dirs: Vec<PathBuf> = listings.iter().map(|l| l.path.clone()).collect();

        assert_eq!(dirs, vec![root.to_path_buf(), root.join("other")]);
    }

    #[test]
    fn test_folders_created_mid_walk_are_not_visited() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(root, "a.txt");

        let filters = FilterSet::default();
        let mut walker = Walker::new(root, &filters, true);
        let first = walker.next().expect("root listing").expect("walk failed");
        assert_eq!(first.path, root);

        fs::create_dir(root.join("TXT")).expect("Failed to create folder");
        assert!(walker.next().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_links_to_directories_are_not_followed() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(root, "real/inside.txt");
        std::os::unix::fs::symlink(root.join("real"), root.join("shortcut"))
            .expect("Failed to create link");

        let filters = FilterSet::default();
        let listings = collect(Walker::new(root, &filters, true));
        let dirs: Vec<PathBuf> = listings.iter().map(|l| l.path.clone()).collect();

        assert_eq!(dirs, vec![root.to_path_buf(), root.join("real")]);
        assert!(listings[0].files.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_and_dangling_links_are_listed_as_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        touch(root, "data.csv");
        std::os::unix::fs::symlink(root.join("data.csv"), root.join("alias.csv"))
            .expect("Failed to create link");
        std::os::unix::fs::symlink(root.join("gone.txt"), root.join("dangling.lnk"))
            .expect("Failed to create link");

        let filters = FilterSet::default();
        let listings = collect(Walker::new(root, &filters, false));

        assert_eq!(
            names(&listings[0]),
            vec!["alias.csv", "dangling.lnk", "data.csv"]
        );
        assert_eq!(listings[0].files[1].extension, "LNK");
    }

    #[test]
    fn test_missing_root_yields_error() {
        let filters = FilterSet::default();
        let mut walker = Walker::new(Path::new("/non/existent/ftorg/root"), &filters, true);
        assert!(matches!(
            walker.next(),
            Some(Err(OrganizeError::DirectoryReadFailed { .. }))
        ));
        assert!(walker.next().is_none());
    }
}
