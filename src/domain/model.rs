use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ARCHIVE_LABEL: &str = "Archive";
pub const UNTITLED: &str = "No title";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    #[cfg_attr(feature = "cli", value(name = "Evernote"))]
    Evernote,
}

/// A note as read from one Keep HTML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    /// Text fragments of the title element, in document order.
    pub title: Vec<String>,
    pub text: String,
    pub labels: Vec<String>,
    pub archived: bool,
}

/// A note after title selection and escaping, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedNote {
    pub title: String,
    pub text: String,
    pub labels: Vec<String>,
    pub untitled: bool,
    pub title_truncated: bool,
}

#[derive(Debug, Clone)]
pub struct SourceNote {
    pub index: usize,
    pub path: PathBuf,
    pub note: Note,
    /// 標題或內容區塊完全缺席
    pub incomplete: bool,
}

#[derive(Debug, Clone)]
pub struct RenderedNote {
    pub index: usize,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub index: usize,
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractBatch {
    pub keep_dir: PathBuf,
    pub documents: Vec<SourceNote>,
    pub skipped: Vec<SkippedDocument>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub keep_dir: PathBuf,
    pub notes: Vec<RenderedNote>,
    pub skipped: Vec<SkippedDocument>,
    pub documents_seen: usize,
    pub untitled_notes: usize,
    pub truncated_titles: usize,
    pub archived_notes: usize,
    pub incomplete_documents: usize,
}

/// Diagnostic tallies for one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    pub archive: PathBuf,
    pub keep_dir: PathBuf,
    pub output_dir: PathBuf,
    pub encoding: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub documents_seen: usize,
    pub notes_written: usize,
    pub untitled_notes: usize,
    pub truncated_titles: usize,
    pub archived_notes: usize,
    pub incomplete_documents: usize,
    pub skipped: Vec<SkippedDocument>,
}
