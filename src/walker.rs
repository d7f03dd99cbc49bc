//! Folder discovery.
//!
//! A video library is either flat (videos directly in the input root) or
//! subfoldered (one level of subfolders, each containing videos). Exactly
//! one level of nesting is supported; anything deeper inside a subfolder is
//! not descended into. Listings are sorted lexicographically by file name so
//! allocation — which is order-dependent when the budget is tight — is
//! reproducible across platforms and runs.

use std::path::{Path, PathBuf};

use crate::error::SiftError;

/// Video file extensions the walker recognises (matched case-insensitively).
pub const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "m4v", "mov", "avi", "mkv"];

/// One folder of videos to allocate and extract as a unit.
///
/// Either a subfolder of the input root, or the root itself when it contains
/// no subfolders. `name` seeds both the output subdirectory and the
/// screenshot file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafFolder {
    /// Folder name used for output naming.
    pub name: String,
    /// Absolute or caller-relative path of the folder.
    pub path: PathBuf,
}

/// Returns `true` if `path` has a recognised video extension.
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            let lowered = extension.to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&lowered.as_str())
        })
}

/// Discover the leaf folders of a library root.
///
/// If the root contains any subdirectories, those subdirectories are the
/// leaves (whether or not they actually hold videos — empty ones are
/// reported with zero counts later). Otherwise the root itself is the single
/// leaf, named after its final path component.
///
/// # Errors
///
/// Returns [`SiftError::InputFolder`] if the root cannot be read as a
/// directory.
pub fn discover_leaf_folders(root: &Path) -> Result<Vec<LeafFolder>, SiftError> {
    let entries = std::fs::read_dir(root).map_err(|error| SiftError::InputFolder {
        path: root.to_path_buf(),
        reason: error.to_string(),
    })?;

    let mut subfolders: Vec<LeafFolder> = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = entry.file_name().to_string_lossy().into_owned();
            subfolders.push(LeafFolder { name, path });
        }
    }

    if subfolders.is_empty() {
        let name = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string());
        return Ok(vec![LeafFolder {
            name,
            path: root.to_path_buf(),
        }]);
    }

    subfolders.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(subfolders)
}

/// List the video files directly inside `folder`, sorted by file name.
///
/// Non-video files and nested directories are ignored.
///
/// # Errors
///
/// Returns [`SiftError::InputFolder`] if the folder cannot be read.
pub fn list_video_files(folder: &Path) -> Result<Vec<PathBuf>, SiftError> {
    let entries = std::fs::read_dir(folder).map_err(|error| SiftError::InputFolder {
        path: folder.to_path_buf(),
        reason: error.to_string(),
    })?;

    let mut videos: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_video_file(&path) {
            videos.push(path);
        }
    }

    videos.sort();
    Ok(videos)
}
