use super::{
    Emitter, Generator,
    naming::{literal, property_name, type_name},
    type_of,
};
use crate::{
    document::Document,
    error::Error,
    infer::TypeTag,
    schema::Schema,
    types::{Record, Value},
};

/// Whether a property is declared as required (`let`) or optional (`var ... ?`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Binding {
    Required,
    Optional,
}

impl Generator<'_> {
    /// Emits the concrete struct of one document, holding its common keys.
    ///
    /// Optional keys are supplied by the document's conformance extension instead.
    pub(super) fn emit_variant(&self, out: &mut Emitter, document: &Document) -> Result<(), Error> {
        let name = self.name_of(document)?;
        out.open(format_args!("internal struct {}", type_name(name)));

        for key in &self.schema.common_keys {
            let tag = type_of(&self.schema, key)?;
            self.emit_property(out, key, tag, document.record.get(key), Binding::Required)?;
        }

        out.close();
        out.blank();
        Ok(())
    }

    /// Emits one stored property, preceded by its nested struct when the value is a dictionary.
    pub(super) fn emit_property(
        &self,
        out: &mut Emitter,
        key: &str,
        tag: &TypeTag,
        value: Option<&Value>,
        binding: Binding,
    ) -> Result<(), Error> {
        let name = property_name(key);
        match (tag, value, binding) {
            (TypeTag::Nested(protocol), Some(Value::Record(record)), _) => {
                let struct_name = type_name(key);
                self.emit_nested_struct(out, &struct_name, protocol, self.nested_schema(key)?, record)?;
                match binding {
                    Binding::Required => out.line(format_args!(
                        "internal let {}: {} = {}()",
                        name, protocol, struct_name
                    )),
                    Binding::Optional => out.line(format_args!(
                        "internal var {}: {}? = {}()",
                        name, protocol, struct_name
                    )),
                }
            }
            (_, Some(value), Binding::Required) => out.line(format_args!(
                "internal let {}: {} = {}",
                name,
                tag,
                literal(tag, value)
            )),
            (_, Some(value), Binding::Optional) => out.line(format_args!(
                "internal var {}: {}? = {}",
                name,
                tag,
                literal(tag, value)
            )),
            (_, None, Binding::Optional) => {
                out.line(format_args!("internal var {}: {}? = nil", name, tag))
            }
            (_, None, Binding::Required) => {
                return Err(Error::DataMismatch(format!(
                    "required key `{}` has no value",
                    key
                )));
            }
        }
        Ok(())
    }

    /// Emits a struct conforming to a nested protocol, with `record`'s values baked in.
    ///
    /// Every key of the nested schema is declared, so the struct always satisfies its
    /// protocol: optional keys missing from `record` are bound to `nil`.
    pub(super) fn emit_nested_struct(
        &self,
        out: &mut Emitter,
        struct_name: &str,
        protocol: &str,
        schema: &Schema,
        record: &Record,
    ) -> Result<(), Error> {
        out.open(format_args!("internal struct {}: {}", struct_name, protocol));

        for key in &schema.common_keys {
            let tag = type_of(schema, key)?;
            self.emit_property(out, key, tag, record.get(key), Binding::Required)?;
        }
        for key in &schema.odd_keys {
            let tag = type_of(schema, key)?;
            self.emit_property(out, key, tag, record.get(key), Binding::Optional)?;
        }

        out.close();
        out.blank();
        Ok(())
    }
}
