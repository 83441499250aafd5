//! File discovery: scene files of a project and previously generated documents.

use std::{
    io,
    path::{Path, PathBuf},
};

use log::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Directories starting with `.` (`.godot`, `.git`, ...) are never entered.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Walks `root` and returns every file accepted by `accept`, sorted by path.
fn collect_files(root: &Path, accept: impl Fn(&Path) -> bool) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
    {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && accept(path) {
            trace!(path = path.display().to_string(); "Discovered file");
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Returns the scene files under `project_dir` with the given extension.
pub fn find_scenes(project_dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let scenes = collect_files(project_dir, |path| {
        path.extension().and_then(|ext| ext.to_str()) == Some(extension)
    })?;
    debug!(scenes_count = scenes.len(); "Scene files discovered");
    Ok(scenes)
}

/// Returns the documents under `output_dir` whose name ends with `suffix`.
pub fn find_generated(output_dir: &Path, suffix: &str) -> io::Result<Vec<PathBuf>> {
    if !output_dir.exists() {
        return Ok(Vec::new());
    }
    collect_files(output_dir, |path| {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(suffix))
    })
}
