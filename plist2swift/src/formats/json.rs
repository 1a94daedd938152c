//! Support for JSON configuration documents.
//!
//! A JSON document must be an object. Floats and `null` have no dedicated
//! type and are kept as [`Value::Unsupported`].

use std::io::{BufRead, Write};

use serde_json::{Map, Number};

use crate::{
    error::Error,
    traits::{Parser, RecordDocument},
    types::{Record, Value},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub record: Record,
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let json: serde_json::Value = serde_json::from_reader(reader).map_err(Error::Parse)?;
        match json {
            serde_json::Value::Object(object) => Ok(Format {
                record: record_from_object(object),
            }),
            other => Err(Error::InvalidDocument(format!(
                "top-level value is {}, expected an object",
                json_kind(&other)
            ))),
        }
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let json = serde_json::Value::Object(object_from_record(&self.record));
        serde_json::to_writer_pretty(&mut writer, &json).map_err(Error::Parse)?;
        writer.write_all(b"\n").map_err(Error::Io)
    }
}

impl RecordDocument for Format {
    fn from_record(record: Record) -> Self {
        Format { record }
    }

    fn into_record(self) -> Record {
        self.record
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn record_from_object(object: Map<String, serde_json::Value>) -> Record {
    object
        .into_iter()
        .map(|(key, value)| (key, value_from_json(value)))
        .collect()
}

fn value_from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::String(text) => Value::Text(text),
        serde_json::Value::Bool(flag) => Value::Bool(flag),
        serde_json::Value::Number(number) => match number.as_i64() {
            Some(integer) => Value::Integer(integer),
            None => Value::Unsupported {
                kind: "real".to_string(),
                text: number.to_string(),
            },
        },
        serde_json::Value::Array(values) => {
            Value::List(values.into_iter().map(value_from_json).collect())
        }
        serde_json::Value::Object(object) => Value::Record(record_from_object(object)),
        serde_json::Value::Null => Value::Unsupported {
            kind: "null".to_string(),
            text: String::new(),
        },
    }
}

fn object_from_record(record: &Record) -> Map<String, serde_json::Value> {
    record
        .iter()
        .map(|(key, value)| (key.clone(), value_to_json(value)))
        .collect()
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Text(text) => serde_json::Value::String(text.clone()),
        Value::Bool(flag) => serde_json::Value::Bool(*flag),
        Value::Integer(integer) => serde_json::Value::Number(Number::from(*integer)),
        Value::List(values) => serde_json::Value::Array(values.iter().map(value_to_json).collect()),
        Value::Record(record) => serde_json::Value::Object(object_from_record(record)),
        Value::Unsupported { kind, .. } if kind == "null" => serde_json::Value::Null,
        Value::Unsupported { kind, text } if kind == "real" => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(text.clone())),
        Value::Unsupported { text, .. } => serde_json::Value::String(text.clone()),
    }
}
