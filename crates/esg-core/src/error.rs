use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EsgError {
    /// A required input field is missing or malformed.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    /// The remote text generator failed or produced unusable output.
    #[error("upstream generation failed: {0}")]
    Upstream(String),
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("render failure: {0}")]
    Render(String),
}

impl EsgError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<std::io::Error> for EsgError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for EsgError {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(e.to_string())
    }
}
