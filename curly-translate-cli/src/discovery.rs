use crate::workbook::read_headers;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Collect files with `extension` under `dir`, descending into subfolders when `recursive`
fn collect_from_dir(dir: &Path, extension: &str, recursive: bool, found: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to read directory '{}': {}", dir.display(), e);
            return;
        }
    };

    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            if recursive {
                collect_from_dir(&path, extension, recursive, found);
            }
        } else if has_extension(&path, extension) {
            found.push(path);
        }
    }
}

/// Build the list of input files for a run
///
/// Explicit `files` with the right extension (case-insensitive) come first,
/// followed by matches under `folder` in sorted order. Each path appears once,
/// at its first position.
pub fn find_input_files(
    files: &[PathBuf],
    folder: Option<&Path>,
    recursive: bool,
    extension: &str,
) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = files
        .iter()
        .filter(|p| has_extension(p, extension))
        .cloned()
        .collect();

    if let Some(folder) = folder {
        collect_from_dir(folder, extension, recursive, &mut candidates);
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Header of the first file, used as the default column selection
///
/// Empty when there are no files or the first one cannot be read.
pub fn scan_columns_from_first_file(files: &[PathBuf]) -> Vec<String> {
    let Some(first) = files.first() else {
        return Vec::new();
    };
    read_headers(first).unwrap_or_else(|e| {
        warn!("Could not scan columns of '{}': {}", first.display(), e);
        Vec::new()
    })
}
