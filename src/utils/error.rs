use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScribeError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Model request failed with status {status}: {body}")]
    ModelError { status: u16, body: String },

    #[error("Model API key is not configured")]
    MissingCredential,

    #[error("Malformed multipart request: {message}")]
    MultipartError { message: String },

    #[error("No files provided")]
    NoImages,

    #[error("Unexpected response from transcription service: {message}")]
    InvalidResponse { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Model,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScribeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScribeError::ConfigError { .. }
            | ScribeError::ConfigValidationError { .. }
            | ScribeError::InvalidConfigValueError { .. }
            | ScribeError::MissingCredential => ErrorCategory::Configuration,
            ScribeError::ApiError(_) | ScribeError::InvalidResponse { .. } => {
                ErrorCategory::Network
            }
            ScribeError::ModelError { .. } => ErrorCategory::Model,
            ScribeError::NoImages
            | ScribeError::MultipartError { .. }
            | ScribeError::ValidationError { .. } => ErrorCategory::Input,
            ScribeError::IoError(_) | ScribeError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Model => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ScribeError::NoImages => "No image files were provided".to_string(),
            ScribeError::MissingCredential => "The Gemini API key is missing".to_string(),
            ScribeError::ApiError(_) | ScribeError::InvalidResponse { .. } => {
                "Failed to transcribe images. Please try again.".to_string()
            }
            ScribeError::ModelError { status, .. } => {
                format!("The transcription model rejected the request ({})", status)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the configuration file and the GEMINI_API_KEY environment variable"
            }
            ErrorCategory::Network => "Make sure the transcription server is running and reachable",
            ErrorCategory::Model => "Verify the model name and API quota, then retry",
            ErrorCategory::Input => "Provide at least one readable image file",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScribeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_category() {
        assert_eq!(ScribeError::NoImages.severity(), ErrorSeverity::Low);
        assert_eq!(ScribeError::MissingCredential.severity(), ErrorSeverity::High);
        assert_eq!(
            ScribeError::ModelError {
                status: 429,
                body: "quota".into()
            }
            .category(),
            ErrorCategory::Model
        );
    }
}
