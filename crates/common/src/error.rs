//! Error types shared across goesgif crates.

use std::path::PathBuf;

/// Failure to turn a user-supplied identifier into a timezone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimezoneError {
    #[error("Unknown timezone '{identifier}' (expected an IANA name such as 'UTC' or 'America/Los_Angeles')")]
    NotFound { identifier: String },

    /// The resolver's zone data could not be consulted at all. Resolvers
    /// reading an on-disk zoneinfo tree report this; [`TzDatabase`] is
    /// compiled in and never does.
    ///
    /// [`TzDatabase`]: crate::timezone::TzDatabase
    #[error("Timezone database unavailable: {message}")]
    DatabaseUnavailable { message: String },
}

/// Top-level error type for goesgif operations.
#[derive(Debug, thiserror::Error)]
pub enum GoesgifError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input directory '{}' not found", path.display())]
    InputDirNotFound { path: PathBuf },

    #[error(transparent)]
    Timezone(#[from] TimezoneError),

    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Internal failure with no user-facing remedy, such as unreadable
    /// data bundled into the binary.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using GoesgifError.
pub type GoesgifResult<T> = Result<T, GoesgifError>;

impl GoesgifError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn decode(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub fn encode(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Encode {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Whether this error was raised while validating configuration,
    /// before any image I/O took place.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::InputDirNotFound { .. } | Self::Timezone(_)
        )
    }
}
