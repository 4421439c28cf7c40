pub mod cli;
pub mod settings;
pub mod toml_config;

pub use settings::Settings;

#[cfg(feature = "cli")]
use crate::domain::model::OutputFormat;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "keep-enex")]
#[command(about = "Convert a Google Keep takeout archive into Evernote .enex files")]
pub struct CliConfig {
    /// Google Takeout zip archive
    #[arg(value_name = "zipFile")]
    pub zip_file: PathBuf,

    #[arg(long, help = "character encoding of output")]
    pub encoding: Option<String>,

    #[arg(long, help = "use the system encoding for the output")]
    pub system_encoding: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Evernote, help = "Output Format")]
    pub format: OutputFormat,

    /// TOML file overriding markers, directory names and retry policy
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a JSON conversion report to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn settings(&self) -> Result<Settings> {
        let file_config = match &self.config {
            Some(path) => toml_config::TomlConfig::from_file(path)?,
            None => toml_config::TomlConfig::default(),
        };

        Settings::resolve(
            &self.zip_file,
            file_config,
            self.encoding.as_deref(),
            self.system_encoding,
            self.format,
        )
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("zipFile", &self.zip_file.to_string_lossy())?;
        if let Some(config) = &self.config {
            validate_path("config", &config.to_string_lossy())?;
        }
        if let Some(report) = &self.report {
            validate_path("report", &report.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let cli = CliConfig::try_parse_from([
            "keep-enex",
            "takeout.zip",
            "--encoding",
            "utf-8",
            "--system-encoding",
            "--format",
            "Evernote",
        ])
        .unwrap();

        assert_eq!(cli.zip_file, PathBuf::from("takeout.zip"));
        assert_eq!(cli.encoding.as_deref(), Some("utf-8"));
        assert!(cli.system_encoding);
        assert_eq!(cli.format, OutputFormat::Evernote);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_format_defaults_to_evernote() {
        let cli = CliConfig::try_parse_from(["keep-enex", "takeout.zip"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Evernote);
        assert!(!cli.system_encoding);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = CliConfig::try_parse_from(["keep-enex", "takeout.zip", "--format", "Markdown"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_zip_file_rejected() {
        assert!(CliConfig::try_parse_from(["keep-enex"]).is_err());
    }
}
