//! Reading input documents and checking their identifier field.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    codegen::is_identifier,
    error::Error,
    formats::FormatType,
    types::{Record, Value},
};

/// One input document: where it came from and its top-level record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub record: Record,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, record: Record) -> Self {
        Self {
            path: path.into(),
            record,
        }
    }

    /// Reads a document, picking the format from the file extension.
    ///
    /// Any failure is reported as [`Error::DocumentRead`] naming `path`.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let format = FormatType::from_path(path);
        let record = format
            .read_record(path)
            .map_err(|e| Error::document_read(path, e))?;

        debug!(path = %path.display(), %format, keys = record.len(), "read document");
        Ok(Document::new(path, record))
    }

    /// Returns the configuration name stored under `identifier_key`.
    ///
    /// The value must be a non-empty string usable as a Swift identifier.
    pub fn configuration_name(&self, identifier_key: &str) -> Result<&str, Error> {
        match self.record.get(identifier_key) {
            None => Err(Error::schema_error(
                &self.path,
                format!(
                    "document doesn't contain the `{}` key, add it and run again",
                    identifier_key
                ),
            )),
            Some(Value::Text(name)) if is_identifier(name) => Ok(name),
            Some(Value::Text(name)) => Err(Error::schema_error(
                &self.path,
                format!(
                    "`{}` value `{}` is not a valid Swift identifier",
                    identifier_key, name
                ),
            )),
            Some(other) => Err(Error::schema_error(
                &self.path,
                format!(
                    "`{}` must be a string, found {}",
                    identifier_key,
                    other.kind_name()
                ),
            )),
        }
    }
}

/// Reads every document in argument order and validates their identifiers.
///
/// All reads complete before anything is returned, so a failing document never
/// leaves partial results behind.
pub fn read_documents<I, P>(paths: I, identifier_key: &str) -> Result<Vec<Document>, Error>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let documents = paths
        .into_iter()
        .map(Document::read)
        .collect::<Result<Vec<_>, _>>()?;

    if documents.is_empty() {
        return Err(Error::usage_error("at least one document is required"));
    }

    validate_identifiers(&documents, identifier_key)?;
    Ok(documents)
}

/// Checks that every document names itself and that no two share a name.
///
/// Case names are compared after lower-casing their first letter, since
/// that is the form they take in the generated enum.
pub fn validate_identifiers(documents: &[Document], identifier_key: &str) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for document in documents {
        let name = document.configuration_name(identifier_key)?;
        if !seen.insert(crate::codegen::lower_first(name)) {
            return Err(Error::schema_error(
                &document.path,
                format!("configuration name `{}` is used by more than one document", name),
            ));
        }
    }
    Ok(())
}
