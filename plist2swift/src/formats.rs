//! Structured document formats understood by plist2swift.
//!
//! Each format decodes into a [`crate::types::Record`]; the [`FormatType`] enum picks
//! the right decoder for a path.

pub mod json;
pub mod plist;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

pub use json::Format as JsonFormat;
pub use plist::Format as PlistFormat;

use crate::{error::Error, traits::RecordDocument, types::Record};

/// Represents all supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// XML property list (`.plist`).
    Plist,
    /// JSON object (`.json`).
    Json,
}

impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Plist => write!(f, "plist"),
            FormatType::Json => write!(f, "json"),
        }
    }
}

/// Accepts `plist`/`xml` and `json`, case-insensitively.
///
/// # Example
/// ```rust
/// use plist2swift::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("PLIST").unwrap(), FormatType::Plist);
/// assert_eq!(FormatType::from_str("json").unwrap(), FormatType::Json);
/// assert!(FormatType::from_str("yaml").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plist" | "xml" => Ok(FormatType::Plist),
            "json" => Ok(FormatType::Json),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Picks a format from the path's extension. Anything that isn't `.json`
    /// is treated as a property list, since Xcode happily stores plists under other names.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => FormatType::Json,
            _ => FormatType::Plist,
        }
    }

    /// Reads the document at `path` in this format and returns its top-level record.
    pub fn read_record<P: AsRef<Path>>(&self, path: P) -> Result<Record, Error> {
        match self {
            FormatType::Plist => read_as::<PlistFormat, _>(path),
            FormatType::Json => read_as::<JsonFormat, _>(path),
        }
    }
}

fn read_as<F: RecordDocument, P: AsRef<Path>>(path: P) -> Result<Record, Error> {
    Ok(F::read_from(path)?.into_record())
}
