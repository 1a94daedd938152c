use super::{
    Emitter, Generator,
    naming::{case_name, literal, property_name, type_name},
    type_of,
};
use crate::{error::Error, infer::TypeTag, types::Value};

impl Generator<'_> {
    /// Emits the enum: one case per document, the document structs, and the
    /// exhaustive `configuration` accessor.
    pub(super) fn emit_enum(&self, out: &mut Emitter) -> Result<(), Error> {
        out.open(format_args!("internal enum {}", self.options.enum_name));

        for document in self.documents {
            out.line(format_args!("case {}", case_name(self.name_of(document)?)));
        }
        out.blank();

        for document in self.documents {
            self.emit_variant(out, document)?;
        }

        out.open(format_args!(
            "var configuration: {}",
            self.options.protocol_name()
        ));
        // Swift style: `case` labels sit at the `switch` level.
        out.line("switch self {");
        // One arm per case and no `default`, so the compiler checks exhaustiveness.
        for document in self.documents {
            let name = self.name_of(document)?;
            out.line(format_args!("case .{}:", case_name(name)));
            out.line(format_args!("\treturn {}()", type_name(name)));
        }
        out.line("}");
        out.close();

        out.close();
        out.blank();
        Ok(())
    }

    /// Emits one extension per document conforming its struct to the top-level
    /// protocol, with a computed property for every optional key.
    pub(super) fn emit_extensions(&self, out: &mut Emitter) -> Result<(), Error> {
        let protocol = self.options.protocol_name();

        for document in self.documents {
            let header = format!(
                "extension {}.{}: {}",
                self.options.enum_name,
                type_name(self.name_of(document)?),
                protocol
            );
            if self.schema.odd_keys.is_empty() {
                out.line(format_args!("{} {{}}", header));
                out.blank();
                continue;
            }

            out.open(header);
            for key in &self.schema.odd_keys {
                let tag = type_of(&self.schema, key)?;
                self.emit_optional_accessor(out, key, tag, document.record.get(key))?;
            }
            out.close();
            out.blank();
        }
        Ok(())
    }

    fn emit_optional_accessor(
        &self,
        out: &mut Emitter,
        key: &str,
        tag: &TypeTag,
        value: Option<&Value>,
    ) -> Result<(), Error> {
        let name = property_name(key);
        let returned = match (tag, value) {
            (TypeTag::Nested(protocol), Some(Value::Record(record))) => {
                let struct_name = type_name(key);
                self.emit_nested_struct(out, &struct_name, protocol, self.nested_schema(key)?, record)?;
                format!("{}()", struct_name)
            }
            (_, Some(value)) => literal(tag, value),
            (_, None) => "nil".to_string(),
        };

        out.open(format_args!("var {}: {}?", name, tag));
        out.line(format_args!("return {}", returned));
        out.close();
        Ok(())
    }
}
