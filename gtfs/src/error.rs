use thiserror::Error;

/// Malformed input coming out of a backend payload. These always reach the caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeedError {
    #[error("malformed service time {0:?}, expected H:MM:SS")]
    MalformedTime(String),
    #[error("invalid {field} {value:?}, not a number")]
    InvalidCoordinate { field: &'static str, value: String },
    #[error("backend reported an error: {0}")]
    Backend(String),
}
