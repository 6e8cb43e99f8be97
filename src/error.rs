//! Error types for tocmark.

use std::io;
use thiserror::Error;

/// Result type alias for tocmark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline and annotation interchange.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing interchange files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An outline text line matched none of the known grammars.
    #[error("unparseable outline line: {0}")]
    Format(String),

    /// A page label numeral token could not be classified or is out of range.
    #[error("unrecognized page label rule: {0}")]
    LabelRule(String),

    /// An interchange element name does not map to a known annotation kind.
    #[error("unsupported annotation type: {0}")]
    UnsupportedAnnotation(String),

    /// Required geometry or attributes are missing from interchange data,
    /// or the XML itself is not well formed.
    #[error("malformed interchange data: {0}")]
    MalformedInterchange(String),

    /// OCR collaborator failure, propagated without retry.
    #[error("OCR service error: {0}")]
    Ocr(String),

    /// Interchange data referenced a page index beyond the document.
    #[error("page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedInterchange(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedAnnotation("stamp".to_string());
        assert_eq!(err.to_string(), "unsupported annotation type: stamp");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
