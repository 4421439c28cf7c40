pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, Settings};

pub use self::core::{etl::EtlEngine, pipeline::KeepPipeline};
pub use domain::model::{ConversionReport, Note, OutputFormat};
pub use utils::error::{ConvertError, Result};
