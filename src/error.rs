use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScopeError>;

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("Script error: {0}")]
    Script(String),

    #[error("No command metadata for '{cmdlet}' (API version {api_version})")]
    UnknownCommand { cmdlet: String, api_version: String },

    #[error("Metadata error in {file}: {message}")]
    Metadata { file: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ScopeError {
    pub fn exit_code(&self) -> i32 {
        2
    }
}
