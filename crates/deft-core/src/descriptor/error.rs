//! Errors raised for malformed dependency descriptors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("dependency must have 2 or 3 elements, found {0}")]
    WrongLength(usize),

    #[error("dependency source must be a string")]
    SourceNotString,

    #[error("dependency version must be a string")]
    VersionNotString,

    #[error("dependency declares no files")]
    NoFiles,

    #[error("invalid source URL '{source_url}': {reason}")]
    InvalidSourceUrl { source_url: String, reason: String },

    #[error("destination '{destination}' for '{file}' escapes the destination directory")]
    UnsafeDestination { file: String, destination: String },

    #[error("cannot resolve '{file}' against '{base}': {reason}")]
    InvalidFileUrl {
        file: String,
        base: String,
        reason: String,
    },
}
