//! Options controlling how documents are unified and how code is generated.

use serde::Serialize;

use crate::error::Error;

/// The key every document must define; its value names the enum case and struct.
pub const DEFAULT_IDENTIFIER_KEY: &str = "configurationName";

/// How optional ("odd") keys are derived from the documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OddKeysMode {
    /// Optional keys are exactly the keys missing from at least one document.
    /// A single document therefore produces no optional keys.
    #[default]
    Inferred,
    /// The first document's keys seed the optional set. With two or more documents
    /// this yields the same partition as `Inferred`; with a single document every
    /// key but the identifier key becomes optional.
    Forced,
}

/// Generation behavior options for [`crate::Generator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Name of the generated enum; the top-level protocol is `<enum_name>Protocol`.
    pub enum_name: String,
    /// Key holding each document's configuration name.
    pub identifier_key: String,
    pub odd_keys: OddKeysMode,
}

impl GenerateOptions {
    /// Creates options for the given enum name with default settings.
    pub fn new(enum_name: impl Into<String>) -> Self {
        Self {
            enum_name: enum_name.into(),
            identifier_key: DEFAULT_IDENTIFIER_KEY.to_string(),
            odd_keys: OddKeysMode::default(),
        }
    }

    /// Sets the identifier key.
    pub fn with_identifier_key(mut self, identifier_key: impl Into<String>) -> Self {
        self.identifier_key = identifier_key.into();
        self
    }

    /// Sets the optional-keys mode.
    pub fn with_odd_keys(mut self, odd_keys: OddKeysMode) -> Self {
        self.odd_keys = odd_keys;
        self
    }

    pub fn protocol_name(&self) -> String {
        format!("{}Protocol", self.enum_name)
    }

    /// Checks that the options can produce valid Swift.
    pub fn validate(&self) -> Result<(), Error> {
        if !crate::codegen::is_identifier(&self.enum_name) {
            return Err(Error::usage_error(format!(
                "enum name `{}` is not a valid Swift identifier",
                self.enum_name
            )));
        }
        if self.identifier_key.trim().is_empty() {
            return Err(Error::usage_error("identifier key must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GenerateOptions::new("Api");
        assert_eq!(options.identifier_key, "configurationName");
        assert_eq!(options.odd_keys, OddKeysMode::Inferred);
        assert_eq!(options.protocol_name(), "ApiProtocol");
    }

    #[test]
    fn test_builders() {
        let options = GenerateOptions::new("Env")
            .with_identifier_key("name")
            .with_odd_keys(OddKeysMode::Forced);
        assert_eq!(options.identifier_key, "name");
        assert_eq!(options.odd_keys, OddKeysMode::Forced);
    }

    #[test]
    fn test_validate_rejects_bad_enum_names() {
        assert!(GenerateOptions::new("Api").validate().is_ok());
        assert!(GenerateOptions::new("").validate().is_err());
        assert!(GenerateOptions::new("My Api").validate().is_err());
        assert!(GenerateOptions::new("1Api").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_identifier_key() {
        let err = GenerateOptions::new("Api")
            .with_identifier_key(" ")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "identifier key must not be empty");
    }
}
