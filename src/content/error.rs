//! Content errors

use thiserror::Error;

/// Failure to turn a page's raw content field into structured content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to decode content JSON: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}
