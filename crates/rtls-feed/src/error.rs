use thiserror::Error;

/// Why a feed message, or one record inside it, was rejected.
#[derive(Error, Debug)]
pub enum FeedParseError {
    #[error("Message is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message is not a batch: expected a JSON array, got {found}")]
    NotABatch { found: &'static str },

    #[error("Record {index} is malformed: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record {index} (device {id}) has {found} coordinates, expected at least 2")]
    MissingCoordinates { index: usize, id: u32, found: usize },
}
