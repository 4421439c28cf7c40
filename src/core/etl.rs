use crate::core::{ConversionReport, Pipeline};
use crate::utils::error::Result;
use chrono::Utc;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<ConversionReport> {
        let started_at = Utc::now();

        // Extract
        let batch = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} notes ({} unreadable)",
            batch.documents.len(),
            batch.skipped.len()
        );

        // Transform
        let transformed = self.pipeline.transform(batch).await?;
        tracing::info!(
            "Converted {} of {} notes",
            transformed.notes.len(),
            transformed.documents_seen
        );

        // Load
        let mut report = self.pipeline.load(transformed).await?;
        report.started_at = started_at;
        report.finished_at = Utc::now();
        tracing::info!("Done.");

        Ok(report)
    }
}
