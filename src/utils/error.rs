use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown output encoding: {label}")]
    UnknownEncoding { label: String },

    #[error("No Keep directory found under {takeout_dir}")]
    KeepDirNotFound { takeout_dir: String },

    #[error("{operation} still failing after {attempts} attempts: {last_error}")]
    RetryExhausted {
        operation: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Note cannot be represented in {encoding}")]
    Unencodable { encoding: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Archive,
    FileSystem,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConvertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConvertError::ZipError(_) | ConvertError::KeepDirNotFound { .. } => {
                ErrorCategory::Archive
            }
            ConvertError::IoError(_) | ConvertError::RetryExhausted { .. } => {
                ErrorCategory::FileSystem
            }
            ConvertError::ConfigError { .. }
            | ConvertError::InvalidConfigValueError { .. }
            | ConvertError::UnknownEncoding { .. } => ErrorCategory::Configuration,
            ConvertError::SerializationError(_) | ConvertError::Unencodable { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單一筆記無法編碼，只跳過該筆
            ConvertError::Unencodable { .. } => ErrorSeverity::Low,
            ConvertError::RetryExhausted { .. } => ErrorSeverity::Medium,
            ConvertError::ConfigError { .. }
            | ConvertError::InvalidConfigValueError { .. }
            | ConvertError::UnknownEncoding { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ConvertError::ZipError(_) => {
                "Check that the file is a complete Google Takeout zip archive"
            }
            ConvertError::IoError(_) => "Check file permissions and available disk space",
            ConvertError::KeepDirNotFound { .. } => {
                "Make sure the takeout archive contains Keep notes (Takeout/Keep/*.html)"
            }
            ConvertError::RetryExhausted { .. } => {
                "Close programs that may hold the directory open (explorer, antivirus) and retry"
            }
            ConvertError::UnknownEncoding { .. } => {
                "Use a standard encoding label such as utf-8, windows-1252 or shift_jis"
            }
            ConvertError::ConfigError { .. } | ConvertError::InvalidConfigValueError { .. } => {
                "Review the command line arguments and the configuration file"
            }
            ConvertError::Unencodable { .. } => "Choose an output encoding such as utf-8",
            ConvertError::SerializationError(_) => "Check that the report path is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ConvertError::ZipError(e) => format!("Could not read the takeout archive: {}", e),
            ConvertError::KeepDirNotFound { .. } => "No Keep directory found".to_string(),
            ConvertError::UnknownEncoding { label } => {
                format!("Unknown output encoding '{}'", label)
            }
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
