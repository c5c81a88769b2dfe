use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    /// Missing record, or a record the principal may not touch.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// A unique value (slug, username) is already stored.
    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl SiteError {
    pub fn not_found(what: impl Into<String>) -> Self {
        SiteError::NotFound(what.into())
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
