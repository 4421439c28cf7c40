use crate::core::archive;
use crate::core::extractor::NoteExtractor;
use crate::core::normalizer::normalize;
use crate::core::serializer::{encode_document, render_enex};
use crate::core::{
    ConfigProvider, ConversionReport, ExtractBatch, Pipeline, SkippedDocument, SourceNote,
    Storage, TransformResult,
};
use crate::domain::model::RenderedNote;
use crate::utils::error::Result;
use crate::utils::retry::{create_dir_with_retry, remove_dir_with_retry};
use chrono::Utc;

/// Converts a Keep takeout archive into one `.enex` file per note.
pub struct KeepPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    extractor: NoteExtractor,
}

impl<S: Storage, C: ConfigProvider> KeepPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let extractor = NoteExtractor::new(config.markers())?;
        Ok(Self {
            storage,
            config,
            extractor,
        })
    }

    fn output_name(&self, index: usize) -> String {
        format!("{}.{}", index, self.config.output_extension())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for KeepPipeline<S, C> {
    async fn extract(&self) -> Result<ExtractBatch> {
        let policy = self.config.retry_policy();
        remove_dir_with_retry(self.config.takeout_dir(), policy).await?;

        let archive_path = self.config.archive_path();
        if archive_path.is_file() {
            tracing::info!("Extracting {} ...", archive_path.display());
        }
        let entries = archive::extract_archive(archive_path, self.config.archive_dir())?;
        tracing::debug!("Unpacked {} archive entries", entries);

        let keep_dir = archive::find_keep_dir(self.config.takeout_dir())?;
        tracing::info!("Keep dir: {}", keep_dir.display());

        let mut batch = ExtractBatch {
            keep_dir: keep_dir.clone(),
            ..Default::default()
        };

        // 輸出編號依列舉順序保留，失敗的文件也佔用一個編號
        for (index, path) in archive::html_documents(&keep_dir)?.into_iter().enumerate() {
            let html = match tokio::fs::read(&path).await {
                Ok(bytes) => match String::from_utf8(bytes) {
                    Ok(html) => html,
                    Err(e) => {
                        tracing::warn!("Skipping file {}: {}", path.display(), e);
                        batch.skipped.push(SkippedDocument {
                            index,
                            path,
                            reason: format!("not valid UTF-8: {}", e),
                        });
                        continue;
                    }
                },
                Err(e) => {
                    tracing::warn!("Skipping file {}: {}", path.display(), e);
                    batch.skipped.push(SkippedDocument {
                        index,
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let extraction = self.extractor.extract(&html);
            tracing::debug!(
                "Extracted {} ({} title fragments, {} labels)",
                path.display(),
                extraction.note.title.len(),
                extraction.note.labels.len()
            );
            batch.documents.push(SourceNote {
                index,
                path,
                note: extraction.note,
                incomplete: extraction.incomplete,
            });
        }

        Ok(batch)
    }

    async fn transform(&self, batch: ExtractBatch) -> Result<TransformResult> {
        let encoding = self.config.encoding();
        let mut result = TransformResult {
            keep_dir: batch.keep_dir,
            documents_seen: batch.documents.len() + batch.skipped.len(),
            skipped: batch.skipped,
            ..Default::default()
        };

        for source in batch.documents {
            if source.incomplete {
                result.incomplete_documents += 1;
            }
            if source.note.archived {
                result.archived_notes += 1;
            }

            let note = normalize(source.note);
            let xml = render_enex(&note, encoding);
            match encode_document(&xml, encoding) {
                Ok(bytes) => {
                    if note.untitled {
                        result.untitled_notes += 1;
                    }
                    if note.title_truncated {
                        tracing::debug!("Title of {} moved into the body", source.path.display());
                        result.truncated_titles += 1;
                    }
                    result.notes.push(RenderedNote {
                        index: source.index,
                        path: source.path,
                        bytes,
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping file {}: {}", source.path.display(), e);
                    result.skipped.push(SkippedDocument {
                        index: source.index,
                        path: source.path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        result.skipped.sort_by_key(|skipped| skipped.index);
        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<ConversionReport> {
        let output_dir = self.config.output_dir();
        let policy = self.config.retry_policy();
        remove_dir_with_retry(output_dir, policy).await?;
        create_dir_with_retry(output_dir, policy).await?;

        tracing::info!("Building text files in {} ...", output_dir.display());

        for note in &result.notes {
            let name = self.output_name(note.index);
            tracing::debug!("Writing {} from {}", name, note.path.display());
            self.storage.write_file(&name, &note.bytes).await?;
        }

        let now = Utc::now();
        Ok(ConversionReport {
            archive: self.config.archive_path().to_path_buf(),
            keep_dir: result.keep_dir,
            output_dir: output_dir.to_path_buf(),
            encoding: self.config.encoding().output_encoding().name().to_string(),
            started_at: now,
            finished_at: now,
            documents_seen: result.documents_seen,
            notes_written: result.notes.len(),
            untitled_notes: result.untitled_notes,
            truncated_titles: result.truncated_titles,
            archived_notes: result.archived_notes,
            incomplete_documents: result.incomplete_documents,
            skipped: result.skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use crate::config::Settings;
    use crate::domain::model::OutputFormat;
    use crate::utils::error::ConvertError;
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::sync::Mutex;
    use zip::write::{SimpleFileOptions, ZipWriter};

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn len(&self) -> usize {
            self.files.lock().await.len()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn write_takeout(dir: &Path, notes: &[(&str, &[u8])]) -> std::path::PathBuf {
        let zip_path = dir.join("takeout.zip");
        let mut zip = ZipWriter::new(std::fs::File::create(&zip_path).unwrap());
        for (name, content) in notes {
            zip.start_file(format!("Takeout/Keep/{}", name), SimpleFileOptions::default())
                .unwrap();
            zip.write_all(content).unwrap();
        }
        zip.finish().unwrap();
        zip_path
    }

    fn settings(zip_path: &Path, encoding: Option<&str>) -> Settings {
        let mut file_config = TomlConfig::default();
        file_config.retry.delay_ms = 1;
        file_config.retry.max_attempts = 3;
        Settings::resolve(zip_path, file_config, encoding, false, OutputFormat::Evernote).unwrap()
    }

    #[tokio::test]
    async fn test_extract_reserves_indices_in_name_order() {
        let temp_dir = TempDir::new().unwrap();
        let zip_path = write_takeout(
            temp_dir.path(),
            &[
                ("b.html", "<div class=\"title\">B</div><div class=\"content\">b</div>".as_bytes()),
                ("a.html", "<div class=\"title\">A</div><div class=\"content\">a</div>".as_bytes()),
                ("aa_bad.html", &[0xff, 0xfe, b'x'][..]),
                ("c.html", "<div class=\"content\">untitled</div>".as_bytes()),
            ],
        );

        let pipeline = KeepPipeline::new(MockStorage::new(), settings(&zip_path, None)).unwrap();
        let batch = pipeline.extract().await.unwrap();

        assert_eq!(batch.keep_dir, temp_dir.path().join("Takeout/Keep"));
        let indices: Vec<(usize, String)> = batch
            .documents
            .iter()
            .map(|d| (d.index, d.note.title.first().cloned().unwrap_or_default()))
            .collect();
        assert_eq!(
            indices,
            vec![(0, "A".to_string()), (2, "B".to_string()), (3, String::new())]
        );
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].index, 1);
        assert!(batch.documents[2].incomplete);
    }

    #[tokio::test]
    async fn test_transform_counts_and_skips_unencodable() {
        let temp_dir = TempDir::new().unwrap();
        let long_title = "t".repeat(260);
        let long_note = format!(
            "<div class=\"title\">{}</div><div class=\"content\">body</div>",
            long_title
        );
        let zip_path = write_takeout(
            temp_dir.path(),
            &[
                ("1.html", long_note.as_bytes()),
                (
                    "2.html",
                    "<div class=\"title\">日本</div><div class=\"content\">x</div>".as_bytes(),
                ),
                (
                    "3.html",
                    "<span class=\"archived\"></span><div class=\"content\">old</div>".as_bytes(),
                ),
            ],
        );

        let pipeline =
            KeepPipeline::new(MockStorage::new(), settings(&zip_path, Some("windows-1252")))
                .unwrap();
        let batch = pipeline.extract().await.unwrap();
        let result = pipeline.transform(batch).await.unwrap();

        assert_eq!(result.documents_seen, 3);
        assert_eq!(result.notes.len(), 2);
        assert_eq!(result.truncated_titles, 1);
        assert_eq!(result.untitled_notes, 1);
        assert_eq!(result.archived_notes, 1);
        assert_eq!(result.incomplete_documents, 1);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].index, 1);
    }

    #[tokio::test]
    async fn test_load_writes_numbered_files() {
        let temp_dir = TempDir::new().unwrap();
        let zip_path = write_takeout(
            temp_dir.path(),
            &[
                (
                    "grocery.html",
                    "<div class=\"title\">Grocery List</div><div class=\"content\">milk<br>bread</div><span class=\"label-name\">shopping</span>".as_bytes(),
                ),
                ("other.html", "<span class=\"archived\"></span>".as_bytes()),
            ],
        );

        let storage = MockStorage::new();
        let pipeline = KeepPipeline::new(storage.clone(), settings(&zip_path, None)).unwrap();
        let batch = pipeline.extract().await.unwrap();
        let result = pipeline.transform(batch).await.unwrap();
        let report = pipeline.load(result).await.unwrap();

        assert_eq!(report.notes_written, 2);
        assert_eq!(report.encoding, "UTF-8");
        assert!(temp_dir.path().join("Text").is_dir());
        assert_eq!(storage.len().await, 2);

        let first = String::from_utf8(storage.get_file("0.enex").await.unwrap()).unwrap();
        assert!(first.contains("<title>Grocery List</title>"));
        assert!(first.contains("milk<br/>bread"));
        assert!(first.contains("<tag>shopping</tag>"));
        assert!(!first.contains("<tag>Archive</tag>"));

        let second = String::from_utf8(storage.get_file("1.enex").await.unwrap()).unwrap();
        assert!(second.contains("<title>No title</title>"));
        assert!(second.trim_end().ends_with("<tag>Archive</tag>\n  </note>\n</en-export>"));
    }

    #[tokio::test]
    async fn test_missing_keep_dir_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let zip_path = temp_dir.path().join("takeout.zip");
        let mut zip = ZipWriter::new(std::fs::File::create(&zip_path).unwrap());
        zip.start_file("Takeout/Drive/doc.txt", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"hello").unwrap();
        zip.finish().unwrap();

        let pipeline = KeepPipeline::new(MockStorage::new(), settings(&zip_path, None)).unwrap();
        let result = pipeline.extract().await;
        assert!(matches!(result, Err(ConvertError::KeepDirNotFound { .. })));
    }
}
