use crate::utils::error::{ConvertError, Result};
use crate::utils::retry::RetryPolicy;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub markers: MarkerConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub retry: RetryConfig,
}

/// One element marker: `<tag attribute="value">`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub tag: String,
    pub attribute: String,
    pub value: String,
}

impl Marker {
    pub fn new(tag: &str, attribute: &str, value: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    fn validate(&self, field: &str) -> Result<()> {
        validation::validate_non_empty_string(&format!("{}.tag", field), &self.tag)?;
        validation::validate_non_empty_string(&format!("{}.attribute", field), &self.attribute)?;
        validation::validate_non_empty_string(&format!("{}.value", field), &self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub title: Marker,
    pub content: Marker,
    pub label: Marker,
    pub archived: Marker,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            title: Marker::new("div", "class", "title"),
            content: Marker::new("div", "class", "content"),
            label: Marker::new("span", "class", "label-name"),
            archived: Marker::new("span", "class", "archived"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub takeout_dir: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            takeout_dir: "Takeout".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir_name: String,
    pub extension: String,
    pub encoding: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir_name: "Text".to_string(),
            extension: "enex".to_string(),
            encoding: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            delay_ms: policy.delay.as_millis() as u64,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_millis(self.delay_ms),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConvertError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConvertError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${KEEP_ENEX_ENCODING})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConvertError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.markers.title.validate("markers.title")?;
        self.markers.content.validate("markers.content")?;
        self.markers.label.validate("markers.label")?;
        self.markers.archived.validate("markers.archived")?;

        validation::validate_dir_name("source.takeout_dir", &self.source.takeout_dir)?;
        validation::validate_dir_name("output.dir_name", &self.output.dir_name)?;
        validation::validate_non_empty_string("output.extension", &self.output.extension)?;
        validation::validate_positive_number(
            "retry.max_attempts",
            self.retry.max_attempts as usize,
            1,
        )?;

        Ok(())
    }
}
