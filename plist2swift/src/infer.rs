//! Mapping values to Swift types, and collecting the schemas of nested dictionaries.

use std::{collections::BTreeMap, fmt::Display};

use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    codegen::upper_first,
    options::OddKeysMode,
    schema::Schema,
    types::{Record, Value},
};

/// The semantic type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum TypeTag {
    Text,
    Bool,
    Int,
    List,
    /// A nested dictionary, typed by the named protocol.
    Nested(String),
}

impl TypeTag {
    /// The Swift spelling of this type.
    pub fn swift_type(&self) -> &str {
        match self {
            TypeTag::Text => "String",
            TypeTag::Bool => "Bool",
            TypeTag::Int => "Int",
            TypeTag::List => "Array<Any>",
            TypeTag::Nested(protocol) => protocol,
        }
    }

    /// Whether values of this type are emitted as plain literals.
    pub fn is_scalar(&self) -> bool {
        matches!(self, TypeTag::Text | TypeTag::Bool | TypeTag::Int)
    }

    /// Whether `value` can be emitted as a literal of this type.
    ///
    /// `String` fields take any scalar: booleans and integers are quoted.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (
                TypeTag::Text,
                Value::Text(_) | Value::Bool(_) | Value::Integer(_) | Value::Unsupported { .. }
            )
                | (TypeTag::Bool, Value::Bool(_))
                | (TypeTag::Int, Value::Integer(_))
                | (TypeTag::List, Value::List(_))
                | (TypeTag::Nested(_), Value::Record(_))
        )
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.swift_type())
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        tag.swift_type().to_string()
    }
}

/// Name of the protocol generated for the nested dictionary stored under `key`.
pub fn protocol_name(key: &str) -> String {
    format!("{}Protocol", upper_first(key))
}

/// Infers the type of `value`, found under `key`.
///
/// Kinds without a Swift counterpart (dates, reals, data) fall back to `String`.
pub fn infer_type(key: &str, value: &Value) -> TypeTag {
    match value {
        Value::Text(_) => TypeTag::Text,
        Value::Bool(_) => TypeTag::Bool,
        Value::Integer(_) => TypeTag::Int,
        Value::List(_) => TypeTag::List,
        Value::Record(_) => TypeTag::Nested(protocol_name(key)),
        Value::Unsupported { kind, .. } => {
            trace!(key, kind = %kind, "unsupported value kind, typed as String");
            TypeTag::Text
        }
    }
}

/// Schemas of nested dictionaries, one per key name.
///
/// Every dictionary found under the same key, at any depth and in any record, is
/// unified into a single schema. A key name therefore maps to exactly one protocol,
/// whose optional keys cover every place the dictionary appears.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NestedSchemas {
    schemas: BTreeMap<String, Schema>,
}

impl NestedSchemas {
    /// Collects and unifies every nested dictionary of `records`, recursively.
    pub fn collect(records: &[&Record]) -> Self {
        let mut samples: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
        for record in records {
            gather(record, &mut samples);
        }

        let schemas = samples
            .into_iter()
            .map(|(key, dictionaries)| {
                let unified =
                    Schema::unify(dictionaries.iter().copied(), OddKeysMode::Inferred, None);
                debug!(
                    key,
                    protocol = %protocol_name(key),
                    samples = dictionaries.len(),
                    optional = unified.odd_keys.len(),
                    "registered nested schema"
                );
                (key.to_string(), unified)
            })
            .collect();

        NestedSchemas { schemas }
    }

    pub fn get(&self, key: &str) -> Option<&Schema> {
        self.schemas.get(key)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.schemas.iter().map(|(key, schema)| (key.as_str(), schema))
    }
}

/// Files every dictionary of `record` under its key, descending into dictionaries only.
fn gather<'r>(record: &'r Record, samples: &mut BTreeMap<&'r str, Vec<&'r Record>>) {
    for (key, value) in record {
        if let Value::Record(nested) = value {
            samples.entry(key.as_str()).or_default().push(nested);
            gather(nested, samples);
        }
    }
}
