pub mod archive;
pub mod etl;
pub mod extractor;
pub mod normalizer;
pub mod pipeline;
pub mod serializer;

pub use crate::domain::model::{
    ConversionReport, ExtractBatch, SkippedDocument, SourceNote, TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
