//! Error types for the spectext encoder.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for spectext operations.
pub type SpectextResult<T> = Result<T, SpectextError>;

/// Errors that can occur while turning text into audio.
#[derive(Debug, Error)]
pub enum SpectextError {
    /// Character has no glyph mapping.
    #[error("unsupported character {character:?} at position {position}")]
    UnsupportedCharacter {
        /// The offending character.
        character: char,
        /// Zero-based character index in the input text.
        position: usize,
    },

    /// Glyph bitmap is missing or unreadable.
    #[error("failed to load glyph {character:?} from {}: {message}", path.display())]
    AssetLoad {
        /// Character being resolved.
        character: char,
        /// Asset location that was tried.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },

    /// Invalid encoder configuration.
    #[error("invalid configuration: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Nothing to render.
    #[error("input text is empty")]
    EmptyInput,

    /// Output could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// PNG encoding of the debug image failed.
    #[error("PNG encoding error: {0}")]
    PngEncode(String),
}

impl SpectextError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an I/O error tagged with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an asset load error.
    pub fn asset_load(
        character: char,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::AssetLoad {
            character,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            SpectextError::UnsupportedCharacter { .. } => "SPECTEXT_001",
            SpectextError::AssetLoad { .. } => "SPECTEXT_002",
            SpectextError::Config { .. } => "SPECTEXT_003",
            SpectextError::EmptyInput => "SPECTEXT_004",
            SpectextError::Io { .. } => "SPECTEXT_005",
            SpectextError::PngEncode(_) => "SPECTEXT_006",
        }
    }

    /// Error category for grouping related errors.
    pub fn category(&self) -> &'static str {
        match self {
            SpectextError::UnsupportedCharacter { .. } | SpectextError::AssetLoad { .. } => {
                "glyph"
            }
            SpectextError::Config { .. } | SpectextError::EmptyInput => "input",
            SpectextError::Io { .. } | SpectextError::PngEncode(_) => "output",
        }
    }
}

impl From<png::EncodingError> for SpectextError {
    fn from(err: png::EncodingError) -> Self {
        SpectextError::PngEncode(err.to_string())
    }
}
