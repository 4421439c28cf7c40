use crate::config::toml_config::{MarkerConfig, TomlConfig};
use crate::domain::model::OutputFormat;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ConvertError, Result};
use crate::utils::retry::RetryPolicy;
use crate::utils::validation::Validate;
use encoding_rs::{Encoding, UTF_8};
use std::path::{Path, PathBuf};

/// Fully resolved settings for one conversion run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub archive_path: PathBuf,
    pub archive_dir: PathBuf,
    pub takeout_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_extension: String,
    pub encoding: &'static Encoding,
    pub format: OutputFormat,
    pub markers: MarkerConfig,
    pub retry: RetryPolicy,
}

impl Settings {
    /// `encoding` wins over `system_encoding`, which wins over the
    /// configuration file; UTF-8 otherwise.
    pub fn resolve(
        archive_path: &Path,
        file_config: TomlConfig,
        encoding: Option<&str>,
        system_encoding: bool,
        format: OutputFormat,
    ) -> Result<Self> {
        file_config.validate()?;

        let system_label = if system_encoding {
            system_encoding_label()
        } else {
            None
        };
        let label = encoding
            .map(str::to_string)
            .or(system_label)
            .or_else(|| file_config.output.encoding.clone());
        let encoding = resolve_encoding(label.as_deref())?;

        let archive_dir = match archive_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self {
            archive_path: archive_path.to_path_buf(),
            takeout_dir: archive_dir.join(&file_config.source.takeout_dir),
            output_dir: archive_dir.join(&file_config.output.dir_name),
            archive_dir,
            output_extension: file_config.output.extension,
            encoding,
            format,
            markers: file_config.markers,
            retry: file_config.retry.policy(),
        })
    }
}

/// Only encodings `encoding_rs` can write are accepted; UTF-16 and
/// `replacement` would silently come out as UTF-8.
pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    let Some(label) = label else {
        return Ok(UTF_8);
    };

    match Encoding::for_label(label.trim().as_bytes()) {
        Some(encoding) if encoding.output_encoding() == encoding => Ok(encoding),
        _ => Err(ConvertError::UnknownEncoding {
            label: label.to_string(),
        }),
    }
}

/// Codeset of the process locale, e.g. `UTF-8` from `en_US.UTF-8@euro`.
pub fn system_encoding_label() -> Option<String> {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .and_then(|locale| codeset_of(&locale))
}

fn codeset_of(locale: &str) -> Option<String> {
    let (_, codeset) = locale.split_once('.')?;
    let codeset = codeset.split('@').next().unwrap_or(codeset);
    if codeset.is_empty() {
        None
    } else {
        Some(codeset.to_string())
    }
}

impl ConfigProvider for Settings {
    fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    fn takeout_dir(&self) -> &Path {
        &self.takeout_dir
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn output_extension(&self) -> &str {
        &self.output_extension
    }

    fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    fn markers(&self) -> &MarkerConfig {
        &self.markers
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }
}
