use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Malformed linkage in relationship '{relationship}': {reason}")]
    MalformedLinkage {
        relationship: String,
        reason: String,
    },

    #[error("Resource limit exceeded: document materializes more than {limit} resources")]
    ResourceLimit { limit: usize },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GraphError {
    pub(crate) fn malformed(relationship: &str, reason: impl Into<String>) -> Self {
        GraphError::MalformedLinkage {
            relationship: relationship.to_string(),
            reason: reason.into(),
        }
    }
}
