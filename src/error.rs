use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a site or building its search index.
///
/// Every variant aborts the generation pass: the index is either written
/// whole or not at all.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Render error in '{page}': {message}")]
    Render { page: String, message: String },

    #[error("Missing field '{field}' in '{page}'")]
    MissingField { page: String, field: String },

    #[error("Invalid param '{param}' in '{page}': {message}")]
    InvalidParam {
        page: String,
        param: String,
        message: String,
    },

    #[error("Invalid front matter in '{path}': {message}")]
    FrontMatter { path: String, message: String },

    #[error("Duplicate objectID '{id}' shared by '{first}' and '{second}'")]
    DuplicateObjectId {
        id: String,
        first: String,
        second: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndexError::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the page path to a render failure raised without one.
    pub(crate) fn in_page(self, page: &str) -> Self {
        match self {
            IndexError::Render { page: p, message } if p.is_empty() => IndexError::Render {
                page: page.to_string(),
                message,
            },
            other => other,
        }
    }
}

impl From<config::ConfigError> for IndexError {
    fn from(err: config::ConfigError) -> Self {
        IndexError::Config(err.to_string())
    }
}

pub type Result<T, E = IndexError> = std::result::Result<T, E>;
