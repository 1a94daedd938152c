//! All error types for the plist2swift crate.
//!
//! Every fallible operation (reading documents, unifying schemas, generating code)
//! returns [`Error`]. Use [`Error::kind`] to find out which class of failure occurred.

use std::{fmt::Display, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// A document could not be opened, decoded or parsed.
    #[error("couldn't read document at {}: {source}", .path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// A document was read but violates the identifier rules.
    #[error("{}: {message}", .path.display())]
    Schema { path: PathBuf, message: String },

    #[error("{0}")]
    Usage(String),
}

/// The three failure classes reported to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DocumentRead,
    Schema,
    Usage,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::DocumentRead => "document read error",
            ErrorKind::Schema => "schema error",
            ErrorKind::Usage => "usage error",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Wraps a lower-level failure so that it names the offending document.
    pub fn document_read(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::DocumentRead {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Creates a new schema error for the document at `path`.
    pub fn schema_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new usage error.
    pub fn usage_error(message: impl Into<String>) -> Self {
        Error::Usage(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Schema { .. } => ErrorKind::Schema,
            Error::Usage(_) => ErrorKind::Usage,
            _ => ErrorKind::DocumentRead,
        }
    }
}
