use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a schema tree.
///
/// Validation failures are never reported through this type; they are
/// collected as [`Issue`](crate::Issue)s on the dataset instead.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while assembling a [`Config`](crate::Config) or loading a
/// [`Locale`](crate::Locale).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read locale file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse locale file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unknown validator reference in locale: {0}")]
    UnknownReference(String),

    #[error("Global configuration has already been installed")]
    GlobalAlreadyInstalled,
}
