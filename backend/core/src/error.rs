use thiserror::Error;

/// Top-level error type for activity statistics.
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("query failed ({query}): {message}")]
    QueryFailed { query: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ActivityError {
    pub fn query(query: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::QueryFailed {
            query: query.into(),
            message: err.to_string(),
        }
    }
}
