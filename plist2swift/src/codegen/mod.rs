//! Swift code generation.
//!
//! [`Generator`] unifies the documents once and then emits, in order: the header,
//! the protocols (top-level first, nested ones at first reference), the enum with one
//! struct per document and the exhaustive `configuration` accessor, and finally one
//! conformance extension per document supplying the optional keys.

mod emitter;
mod enumeration;
mod naming;
mod protocol;
mod validate;
mod variant;

use indoc::indoc;
use serde::Serialize;
use tracing::debug;

pub use emitter::Emitter;
pub use naming::{
    case_name, escape_keyword, is_identifier, lower_first, property_name, string_literal,
    type_name, upper_first,
};

use crate::{
    document::{Document, validate_identifiers},
    error::Error,
    infer::{NestedSchemas, TypeTag},
    options::GenerateOptions,
    schema::Schema,
    types::Record,
};

const HEADER: &str = indoc! {"
    //
    // Generated by plist2swift - Swift code from plists generator
    //

    import Foundation
"};

/// The unified schemas, as printed by `--dump-schema`.
#[derive(Debug, Serialize)]
pub struct SchemaReport<'a> {
    pub protocol: String,
    pub root: &'a Schema,
    pub nested: &'a NestedSchemas,
}

/// Generates Swift source for a set of documents.
#[derive(Debug)]
pub struct Generator<'a> {
    options: &'a GenerateOptions,
    documents: &'a [Document],
    schema: Schema,
    nested: NestedSchemas,
}

impl<'a> Generator<'a> {
    /// Validates the documents and unifies their schemas.
    ///
    /// Fails with a usage error for bad options, no documents, or an enum name whose
    /// protocol clashes with a nested one. Fails with a schema error when a document
    /// lacks a valid, unique configuration name, has a key that can't become a Swift
    /// property, or holds a value that doesn't fit the type declared for its key.
    pub fn new(documents: &'a [Document], options: &'a GenerateOptions) -> Result<Self, Error> {
        options.validate()?;
        if documents.is_empty() {
            return Err(Error::usage_error("at least one document is required"));
        }
        validate_identifiers(documents, &options.identifier_key)?;

        let records: Vec<&Record> = documents.iter().map(|d| &d.record).collect();
        let schema = Schema::unify(
            records.iter().copied(),
            options.odd_keys,
            Some(&options.identifier_key),
        );
        let nested = NestedSchemas::collect(&records);

        debug!(
            documents = documents.len(),
            common = schema.common_keys.len(),
            optional = schema.odd_keys.len(),
            nested = nested.len(),
            "unified documents"
        );

        let generator = Generator {
            options,
            documents,
            schema,
            nested,
        };
        generator.check_protocol_names()?;
        generator.check_documents()?;
        Ok(generator)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn nested(&self) -> &NestedSchemas {
        &self.nested
    }

    pub fn report(&self) -> SchemaReport<'_> {
        SchemaReport {
            protocol: self.options.protocol_name(),
            root: &self.schema,
            nested: &self.nested,
        }
    }

    /// Emits the complete Swift source.
    pub fn generate(&self) -> Result<String, Error> {
        let mut out = Emitter::new();
        out.block(HEADER);
        out.blank();

        self.emit_protocols(&mut out)?;
        self.emit_enum(&mut out)?;
        self.emit_extensions(&mut out)?;

        Ok(out.finish())
    }

    fn nested_schema(&self, key: &str) -> Result<&Schema, Error> {
        self.nested
            .get(key)
            .ok_or_else(|| Error::DataMismatch(format!("no nested schema for key `{}`", key)))
    }

    /// Configuration name of `document`; validated in [`Generator::new`].
    fn name_of<'d>(&self, document: &'d Document) -> Result<&'d str, Error> {
        document.configuration_name(&self.options.identifier_key)
    }
}

fn type_of<'s>(schema: &'s Schema, key: &str) -> Result<&'s TypeTag, Error> {
    schema
        .type_of(key)
        .ok_or_else(|| Error::DataMismatch(format!("no type inferred for key `{}`", key)))
}
