use crate::utils::error::{ConvertError, Result};
use regex::Regex;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use zip::ZipArchive;

static HTML_EXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.html$").expect("static regex is valid")
});

pub fn is_html_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| HTML_EXT.is_match(name))
        .unwrap_or(false)
}

/// Unpacks the takeout zip into `dest`. Returns the number of entries.
pub fn extract_archive(zip_path: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;
    let entries = archive.len();
    archive.extract(dest)?;
    Ok(entries)
}

/// First subdirectory of `takeout_dir` (by name) holding at least one `.html` file.
pub fn find_keep_dir(takeout_dir: &Path) -> Result<PathBuf> {
    let not_found = || ConvertError::KeepDirNotFound {
        takeout_dir: takeout_dir.display().to_string(),
    };

    let entries = fs::read_dir(takeout_dir).map_err(|_| not_found())?;
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    for dir in dirs {
        if !html_documents(&dir)?.is_empty() {
            return Ok(dir);
        }
    }

    Err(not_found())
}

/// `.html` files directly inside `dir`, sorted by name.
pub fn html_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_html_file(&path) {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}
