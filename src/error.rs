//! Error taxonomy of the recommendation core.
//!
//! Every variant is a contract violation by the caller or the data; nothing
//! here is transient, so nothing is retried.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoodError {
    #[error("{axis} value {value} is outside [0, 1]")]
    OutOfRange { axis: &'static str, value: f64 },

    #[error("`{bucket}` is not a valid {axis} bucket")]
    UnknownBucket { axis: &'static str, bucket: String },

    #[error("label `{0}` must have exactly 4 comma-separated fields")]
    MalformedLabel(String),

    #[error("label field `{field}` is not a digit in 0..=3")]
    InvalidDigit { field: String },

    #[error("no {axis} bucket owns digit {digit}")]
    UnknownDigit { axis: &'static str, digit: u8 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("catalog has no column `{0}`")]
    MissingColumn(String),

    #[error("catalog has no track with id `{0}`")]
    UnknownTrack(String),
}

pub type Result<T> = std::result::Result<T, MoodError>;
