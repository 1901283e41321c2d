//! Error types for capy-apps

/// Launcher engine errors
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to replace layout file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Launch failed: {0}")]
    Launch(String),
}
