use thiserror::Error;

#[derive(Error, Debug)]
pub enum MlopsError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Schema validation failed: {message}")]
    SchemaValidationError { message: String },

    #[error("Invalid input for '{field}': {reason}")]
    InvalidInputError { field: String, reason: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("Model has not been fitted")]
    ModelNotFitted,

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Command '{command}' failed: {reason}")]
    CommandError { command: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Model,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MlopsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MlopsError::HttpError(_) => ErrorCategory::Network,
            MlopsError::ConfigValidationError { .. }
            | MlopsError::InvalidConfigValueError { .. }
            | MlopsError::MissingConfigError { .. } => ErrorCategory::Configuration,
            MlopsError::CsvError(_)
            | MlopsError::ZipError(_)
            | MlopsError::SchemaValidationError { .. }
            | MlopsError::InvalidInputError { .. }
            | MlopsError::ProcessingError { .. } => ErrorCategory::Data,
            MlopsError::DimensionMismatch { .. }
            | MlopsError::ModelNotFitted => ErrorCategory::Model,
            MlopsError::IoError(_)
            | MlopsError::SerializationError(_)
            | MlopsError::CommandError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MlopsError::InvalidInputError { .. } => ErrorSeverity::Low,
            // 網路錯誤通常可重試
            MlopsError::HttpError(_) => ErrorSeverity::Medium,
            MlopsError::IoError(_) | MlopsError::CommandError { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and the data_ingestion.source_url setting",
            ErrorCategory::Configuration => "Review config/config.toml and fix the reported field",
            ErrorCategory::Data => "Inspect the dataset under artifacts/ and the [schema] section",
            ErrorCategory::Model => "Run `wine-mlops train` to produce a fresh model artifact",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MlopsError::HttpError(_) => "Could not download the dataset".to_string(),
            MlopsError::ModelNotFitted => "No trained model is available yet".to_string(),
            MlopsError::SchemaValidationError { message } => {
                format!("The dataset does not match the expected schema: {}", message)
            }
            MlopsError::InvalidInputError { field, .. } => {
                format!("The value for '{}' is not a valid number", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MlopsError>;
