use std::path::PathBuf;

use snafu::Snafu;

use crate::error::ErrorKind;

/// Errors raised while reading or writing the context file.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to read context from {}, error: {source}", filename.display()))]
    ReadContext { filename: PathBuf, source: std::io::Error },

    #[snafu(display("Failed to parse context from {}, error: {source}", filename.display()))]
    ParseContext { filename: PathBuf, source: serde_yaml::Error },

    #[snafu(display("Failed to serialize context, error: {source}"))]
    SerializeContext { source: serde_yaml::Error },

    #[snafu(display("Failed to create context directory {}, error: {source}", directory.display()))]
    CreateContextDirectory { directory: PathBuf, source: std::io::Error },

    #[snafu(display("Failed to write context to {}, error: {source}", filename.display()))]
    WriteContext { filename: PathBuf, source: std::io::Error },
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind { ErrorKind::ConfigIo }
}
