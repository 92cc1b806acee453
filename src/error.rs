//! Error types for the lopdf-builder library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using BuilderError
pub type Result<T> = std::result::Result<T, BuilderError>;

/// Errors that can occur while composing a document
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Error from the underlying lopdf library
    #[error("PDF operation failed: {0}")]
    PdfError(#[from] lopdf::Error),

    /// A document call was issued before `open()`
    #[error("Document is not open: call open() before adding pages or content")]
    NotOpened,

    /// A content call was issued before `new_page()`
    #[error("No active page: call new_page() before adding content")]
    NoActivePage,

    /// The requested font family/variant cannot be provided by the writer
    #[error("Font '{family}' ({variant}) is not available")]
    FontUnavailable { family: String, variant: String },

    /// Font data supplied by the caller could not be parsed
    #[error("Failed to parse font: {0}")]
    FontParse(String),

    /// Image file missing or undecodable
    #[error("Failed to load image '{}': {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Image could not be re-encoded for embedding
    #[error("Failed to encode image: {0}")]
    ImageEncode(String),

    /// Invalid table structure or table options
    #[error("Invalid table structure: {0}")]
    InvalidTable(String),

    /// Invalid dimensions
    #[error("Invalid dimensions: {0}")]
    DimensionError(String),

    /// Output could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuilderError {
    /// Call issued in the wrong session state
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::NotOpened | Self::NoActivePage)
    }

    /// Font or image resource could not be obtained
    pub fn is_resource_error(&self) -> bool {
        matches!(
            self,
            Self::FontUnavailable { .. }
                | Self::FontParse(_)
                | Self::ImageLoad { .. }
                | Self::ImageEncode(_)
        )
    }

    /// Malformed options supplied by the caller
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidTable(_) | Self::DimensionError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(BuilderError::NotOpened.is_usage_error());
        assert!(BuilderError::NoActivePage.is_usage_error());
        assert!(!BuilderError::NoActivePage.is_resource_error());

        let font = BuilderError::FontUnavailable {
            family: "Comic Sans".to_string(),
            variant: "bold".to_string(),
        };
        assert!(font.is_resource_error());
        assert!(!font.is_configuration_error());

        assert!(BuilderError::InvalidTable("x".to_string()).is_configuration_error());
    }

    #[test]
    fn test_error_messages() {
        let err = BuilderError::FontUnavailable {
            family: "Comic Sans".to_string(),
            variant: "italic".to_string(),
        };
        assert_eq!(err.to_string(), "Font 'Comic Sans' (italic) is not available");
        assert!(BuilderError::NoActivePage.to_string().contains("new_page()"));
    }
}
