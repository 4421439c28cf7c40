use crate::config::toml_config::MarkerConfig;
use crate::domain::model::{ConversionReport, ExtractBatch, TransformResult};
use crate::utils::error::Result;
use crate::utils::retry::RetryPolicy;
use async_trait::async_trait;
use encoding_rs::Encoding;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn archive_path(&self) -> &Path;
    /// Directory the archive is unpacked into.
    fn archive_dir(&self) -> &Path;
    fn takeout_dir(&self) -> &Path;
    fn output_dir(&self) -> &Path;
    fn output_extension(&self) -> &str;
    fn encoding(&self) -> &'static Encoding;
    fn markers(&self) -> &MarkerConfig;
    fn retry_policy(&self) -> RetryPolicy;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractBatch>;
    async fn transform(&self, batch: ExtractBatch) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<ConversionReport>;
}
