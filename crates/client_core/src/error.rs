use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error("doctor fetch failed: {0}")]
    Fetch(String),
    #[error("doctor subscription failed: {0}")]
    Subscribe(String),
    #[error("failed to decode doctor list: {0}")]
    Decode(String),
    #[error("directory service is not configured")]
    Unavailable,
}
