#![forbid(unsafe_code)]
//! Generate typed Swift configuration code from property lists.
//!
//! Every input document describes one configuration (for example `Prod.plist` and
//! `Dev.plist`). The documents are unified into one schema: keys present in all of them
//! become required protocol properties, the rest become optional ones. The generated
//! Swift source contains a protocol per (nested) schema, an enum with one case per
//! document, and one concrete struct per case.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use plist2swift::{GenerateOptions, generate};
//!
//! let options = GenerateOptions::new("Environment");
//! let swift = generate(["Prod.plist", "Dev.plist"], &options)?;
//! std::fs::write("Environment.swift", swift)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Supported Inputs
//!
//! - **XML property lists**: `<dict>`, `<array>`, `<string>`, `<integer>`, `<true/>`, `<false/>`
//! - **JSON**: a top-level object, for documents kept as `.json`
//!
//! Binary property lists are rejected.

pub mod codegen;
pub mod document;
pub mod error;
pub mod formats;
pub mod infer;
pub mod options;
pub mod schema;
pub mod traits;
pub mod types;

use std::path::Path;

pub use crate::{
    codegen::{Generator, SchemaReport},
    document::{Document, read_documents},
    error::{Error, ErrorKind},
    formats::FormatType,
    infer::{NestedSchemas, TypeTag},
    options::{DEFAULT_IDENTIFIER_KEY, GenerateOptions, OddKeysMode},
    schema::Schema,
    types::{Record, Value},
};

/// Reads every document in `paths` and returns the generated Swift source.
///
/// Nothing is written anywhere; callers decide where the text goes.
pub fn generate<I, P>(paths: I, options: &GenerateOptions) -> Result<String, Error>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    options.validate()?;
    let documents = read_documents(paths, &options.identifier_key)?;
    Generator::new(&documents, options)?.generate()
}
