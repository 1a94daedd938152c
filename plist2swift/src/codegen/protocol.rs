use std::collections::BTreeSet;

use super::{Emitter, Generator, naming::property_name, type_of};
use crate::{error::Error, infer::TypeTag, schema::Schema};

impl Generator<'_> {
    /// Emits the top-level protocol, then every nested protocol at its first reference.
    pub(super) fn emit_protocols(&self, out: &mut Emitter) -> Result<(), Error> {
        let mut emitted = BTreeSet::new();
        emit_protocol(out, &self.options.protocol_name(), &self.schema)?;
        self.emit_nested_protocols(out, &self.schema, &mut emitted)
    }

    fn emit_nested_protocols(
        &self,
        out: &mut Emitter,
        schema: &Schema,
        emitted: &mut BTreeSet<String>,
    ) -> Result<(), Error> {
        for key in schema.ordered_keys() {
            let TypeTag::Nested(protocol) = type_of(schema, key)? else {
                continue;
            };
            if !emitted.insert(key.to_string()) {
                continue;
            }

            let nested = self.nested_schema(key)?;
            emit_protocol(out, protocol, nested)?;
            self.emit_nested_protocols(out, nested, emitted)?;
        }
        Ok(())
    }
}

/// Emits one protocol: required properties for common keys, then optional ones.
pub(super) fn emit_protocol(out: &mut Emitter, name: &str, schema: &Schema) -> Result<(), Error> {
    out.open(format_args!("protocol {}", name));

    if !schema.common_keys.is_empty() {
        out.line("// Common Keys");
        for key in &schema.common_keys {
            let tag = type_of(schema, key)?;
            out.line(format_args!("var {}: {} {{ get }}", property_name(key), tag));
        }
    }

    if !schema.odd_keys.is_empty() {
        if !schema.common_keys.is_empty() {
            out.blank();
        }
        out.line("// Optional Keys");
        for key in &schema.odd_keys {
            let tag = type_of(schema, key)?;
            out.line(format_args!("var {}: {}? {{ get }}", property_name(key), tag));
        }
    }

    out.close();
    out.blank();
    Ok(())
}
