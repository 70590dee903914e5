use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Invalid context: {0}")]
    InvalidContext(String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Archive operation failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Template engine error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, DocError>;
