use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Conditions that abort a run. Rows and entries that can't be used are
/// skipped where they occur and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// The listing page produced no channel rows at all
    #[error("channel listing contains no usable channel rows")]
    EmptyResult,

    /// The playlist's first line is not an `#EXTM3U` header
    #[error("playlist must start with `#EXTM3U`, found `{line}`")]
    InvalidFormat { line: String },
}
