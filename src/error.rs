//! Error types for kitdoc library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for kitdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading, extracting or writing documents.
///
/// Lookups that simply find nothing (a missing section, an unmatched table)
/// are not errors; they come back as `None` or as an outcome enum.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file is not a DOCX package.
    #[error("Unknown file format: not a valid DOCX package")]
    UnknownFormat,

    /// A required part is missing from the package.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// The zip container could not be read or written.
    #[error("Zip container error: {0}")]
    Zip(String),

    /// The WordprocessingML could not be parsed.
    #[error("XML error: {0}")]
    Xml(String),

    /// The document structure does not match what the reader expects.
    #[error("Malformed document structure: {0}")]
    Malformed(String),

    /// Writing the output document failed.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A replacement or extraction pattern is not a valid regular expression.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Invalid configuration (profile or rule file).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::InvalidArchive(_) => Error::UnknownFormat,
            _ => Error::Zip(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidPattern(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(
            err.to_string(),
            "Unknown file format: not a valid DOCX package"
        );

        let err = Error::FileNotFound(PathBuf::from("missing.docx"));
        assert_eq!(err.to_string(), "File not found: missing.docx");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_regex_error_conversion() {
        let err: Error = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }

    #[test]
    fn test_write_error_keeps_path() {
        let err = Error::Write {
            path: PathBuf::from("out.docx"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("Failed to write out.docx"));
    }
}
