use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    /// 使用者輸入不合法，直接回報，不重試
    #[error("{message}")]
    ValidationError { message: String },

    #[error("Unsupported file type: .{extension}")]
    UnsupportedFileType { extension: String },

    #[error("No valid email found in {file}")]
    NoAddressesFound { file: String },

    #[error("Backend responded with HTTP {status}")]
    BackendRejected {
        status: u16,
        message: Option<String>,
    },

    /// 已套用後備文字的寄送失敗訊息
    #[error("{message}")]
    SendFailed { message: String },

    #[error("Failed to load template {name}")]
    TemplateUnavailable { name: String },

    #[error("Failed to save settings")]
    SettingsNotSaved,

    /// 讀不到後端目前的設定，存檔會把沒給的欄位清空
    #[error("Could not load current settings: {message}")]
    SettingsNotLoaded { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Network,
    Import,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::ValidationError { .. } => ErrorCategory::Validation,
            ClientError::ApiError(_)
            | ClientError::BackendRejected { .. }
            | ClientError::SendFailed { .. }
            | ClientError::TemplateUnavailable { .. }
            | ClientError::SettingsNotSaved
            | ClientError::SettingsNotLoaded { .. } => ErrorCategory::Network,
            ClientError::CsvError(_)
            | ClientError::SpreadsheetError(_)
            | ClientError::UnsupportedFileType { .. }
            | ClientError::NoAddressesFound { .. } => ErrorCategory::Import,
            ClientError::ConfigError { .. }
            | ClientError::InvalidConfigValueError { .. }
            | ClientError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ClientError::IoError(_) | ClientError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Import => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 顯示給使用者的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            ClientError::ApiError(e) if e.is_connect() => {
                "Could not reach the MailDesk backend".to_string()
            }
            ClientError::ApiError(e) if e.is_timeout() => {
                "The MailDesk backend did not answer in time".to_string()
            }
            ClientError::UnsupportedFileType { .. } => format!(
                "Only {} files are supported.",
                crate::core::import::SUPPORTED_EXTENSIONS.join(", ")
            ),
            ClientError::NoAddressesFound { .. } => {
                "No valid email found in the file.".to_string()
            }
            ClientError::BackendRejected {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::TemplateUnavailable { .. } => "Failed to load template".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ClientError::ValidationError { .. } => "Correct the highlighted input and try again",
            ClientError::UnsupportedFileType { .. } => {
                "Convert the file to csv, txt, html, xls or xlsx"
            }
            ClientError::NoAddressesFound { .. } => {
                "Check that the file contains addresses such as name@example.com"
            }
            ClientError::ApiError(_) => "Make sure the backend is running and --base-url is correct",
            ClientError::BackendRejected { .. } | ClientError::SendFailed { .. } => {
                "Check the SMTP and proxy settings, then check the backend log"
            }
            ClientError::TemplateUnavailable { .. } => "Run `maildesk templates` to list templates",
            ClientError::SettingsNotSaved => "Check that the backend can write its config file",
            ClientError::SettingsNotLoaded { .. } => {
                "Start the backend first, or pass every settings flag to overwrite all fields"
            }
            ClientError::ConfigError { .. }
            | ClientError::InvalidConfigValueError { .. }
            | ClientError::ConfigValidationError { .. } => "Fix the configuration file or flags",
            ClientError::CsvError(_) | ClientError::SpreadsheetError(_) => {
                "Make sure the file is not corrupted or password protected"
            }
            ClientError::IoError(_) | ClientError::SerializationError(_) => {
                "Check file permissions and try again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
