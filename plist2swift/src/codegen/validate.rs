use std::path::Path;

use super::{
    Generator,
    naming::{is_identifier, lower_first, upper_first},
    type_of,
};
use crate::{
    error::Error,
    infer::{TypeTag, protocol_name},
    schema::Schema,
    types::{Record, Value},
};

impl Generator<'_> {
    /// Rejects an enum name whose protocol is also generated for a nested dictionary.
    pub(super) fn check_protocol_names(&self) -> Result<(), Error> {
        let protocol = self.options.protocol_name();
        for (key, _) in self.nested.iter() {
            if protocol_name(key) == protocol {
                return Err(Error::usage_error(format!(
                    "enum name `{}` clashes with protocol `{}` generated for key `{}`, choose another enum name",
                    self.options.enum_name, protocol, key
                )));
            }
        }
        Ok(())
    }

    /// Checks that every key of every document can become a Swift property, and that
    /// every value fits the type inferred for its key.
    pub(super) fn check_documents(&self) -> Result<(), Error> {
        for document in self.documents {
            self.check_record(&document.path, &document.record, &self.schema, "")?;
        }
        Ok(())
    }

    fn check_record(
        &self,
        path: &Path,
        record: &Record,
        schema: &Schema,
        parent: &str,
    ) -> Result<(), Error> {
        for (key, value) in record {
            let qualified = format!("{}{}", parent, key);
            if !is_identifier(key) {
                return Err(Error::schema_error(
                    path,
                    format!("key `{}` is not a valid Swift identifier", qualified),
                ));
            }
            if let Some(other) = schema
                .all_keys()
                .into_iter()
                .find(|other| *other != key && lower_first(other) == lower_first(key))
            {
                return Err(Error::schema_error(
                    path,
                    format!(
                        "keys `{}{}` and `{}` both become property `{}`",
                        parent,
                        other,
                        qualified,
                        lower_first(key)
                    ),
                ));
            }

            let tag = type_of(schema, key)?;
            if !tag.accepts(value) {
                return Err(Error::schema_error(
                    path,
                    format!(
                        "`{}` holds a value of kind {}, but another document declares it as `{}`",
                        qualified,
                        value.kind_name(),
                        tag
                    ),
                ));
            }

            if let (TypeTag::Nested(protocol), Value::Record(nested)) = (tag, value) {
                if let Some((other, _)) = self
                    .nested
                    .iter()
                    .find(|(other, _)| *other != key && upper_first(other) == upper_first(key))
                {
                    return Err(Error::schema_error(
                        path,
                        format!(
                            "dictionaries under `{}` and `{}` both become protocol `{}`",
                            other, qualified, protocol
                        ),
                    ));
                }
                let nested_schema = self.nested_schema(key)?;
                self.check_record(path, nested, nested_schema, &format!("{}.", qualified))?;
            }
        }
        Ok(())
    }
}
