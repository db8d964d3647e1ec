//! Error types for the retfilter library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using retfilter's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while filtering mutants.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Input file with an extension we cannot load.
    #[error("Unsupported input format for file: {path}")]
    UnsupportedInput { path: PathBuf },

    /// Input file whose contents are not a valid analysis unit list.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A mutation references a method that the class under analysis does not declare.
    ///
    /// The caller handed us a class and a batch that do not belong together.
    #[error("Mutation location {location} does not resolve to a method of the current class")]
    UnresolvedLocation { location: String },

    /// Malformed JVM method descriptor.
    #[error("Invalid method descriptor {descriptor:?}: {message}")]
    InvalidDescriptor { descriptor: String, message: String },

    /// Feature setting naming a feature nobody provides.
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Create an unresolved-location error.
    pub fn unresolved(location: impl ToString) -> Self {
        Self::UnresolvedLocation {
            location: location.to_string(),
        }
    }

    /// Create an invalid descriptor error.
    pub fn descriptor(descriptor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            descriptor: descriptor.into(),
            message: message.into(),
        }
    }

    /// Create a parse error for an input file.
    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
