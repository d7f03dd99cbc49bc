//! Folder discovery tests.

use std::fs;
use std::path::Path;

use stillsift::{discover_leaf_folders, is_video_file, list_video_files};
use tempfile::TempDir;

fn touch(path: &Path) {
    fs::write(path, b"").unwrap();
}

#[test]
fn recognised_extensions_are_case_insensitive() {
    for name in [
        "a.mp4", "b.M4V", "c.mov", "d.AVI", "e.mkv", "f.Mp4", "g.MKV",
    ] {
        assert!(is_video_file(Path::new(name)), "{name} should be a video");
    }

    for name in ["notes.txt", "a.mp3", "clip.webm", "still.jpg", "noext"] {
        assert!(!is_video_file(Path::new(name)), "{name} should not match");
    }
}

#[test]
fn flat_folder_is_its_own_leaf() {
    let root = TempDir::new().unwrap();
    touch(&root.path().join("a.mp4"));
    touch(&root.path().join("b.mkv"));

    let leaves = discover_leaf_folders(root.path()).unwrap();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].path, root.path());
}

#[test]
fn subfolders_become_leaves_in_sorted_order() {
    let root = TempDir::new().unwrap();
    fs::create_dir(root.path().join("zoo")).unwrap();
    fs::create_dir(root.path().join("alps")).unwrap();
    fs::create_dir(root.path().join("misc")).unwrap();
    // A stray file at the root does not make the root a leaf.
    touch(&root.path().join("stray.mp4"));

    let leaves = discover_leaf_folders(root.path()).unwrap();
    let names: Vec<&str> = leaves.iter().map(|leaf| leaf.name.as_str()).collect();
    assert_eq!(names, vec!["alps", "misc", "zoo"]);
}

#[test]
fn listing_filters_and_sorts_video_files() {
    let folder = TempDir::new().unwrap();
    touch(&folder.path().join("zz.mp4"));
    touch(&folder.path().join("aa.mkv"));
    touch(&folder.path().join("readme.txt"));
    fs::create_dir(folder.path().join("nested")).unwrap();
    touch(&folder.path().join("nested").join("deep.mp4"));

    let videos = list_video_files(folder.path()).unwrap();
    let names: Vec<String> = videos
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    // Sorted, no text file, and nothing from the nested directory.
    assert_eq!(names, vec!["aa.mkv", "zz.mp4"]);
}

#[test]
fn missing_root_is_an_input_folder_error() {
    let result = discover_leaf_folders(Path::new("/definitely/not/here"));
    assert!(matches!(
        result,
        Err(stillsift::SiftError::InputFolder { .. })
    ));
}
