//! Unifying the keys of several records into one schema.
//!
//! A key present in every record is *common* and becomes a required property;
//! a key present in only some records is *odd* and becomes an optional one.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{trace, warn};

use crate::{
    infer::{TypeTag, infer_type},
    options::OddKeysMode,
    types::Record,
};

/// The unified shape of a set of records.
///
/// `common_keys` and `odd_keys` are disjoint and together hold every key seen in any record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub common_keys: BTreeSet<String>,
    pub odd_keys: BTreeSet<String>,
    /// Type of each key, taken from the first record that defines it.
    pub key_types: BTreeMap<String, TypeTag>,
}

impl Schema {
    /// Unifies `records`, visited in the given order.
    ///
    /// `pinned_key` stays common even in [`OddKeysMode::Forced`], as long as every record has it.
    pub fn unify<'a, I>(records: I, mode: OddKeysMode, pinned_key: Option<&str>) -> Schema
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut common_keys: Option<BTreeSet<String>> = None;
        let mut all_keys = BTreeSet::new();
        let mut key_types: BTreeMap<String, TypeTag> = BTreeMap::new();
        let mut count = 0usize;

        for record in records {
            let keys: BTreeSet<String> = record.keys().map(str::to_string).collect();
            common_keys = Some(match common_keys {
                None => keys.clone(),
                Some(common) => common.intersection(&keys).cloned().collect(),
            });
            all_keys.extend(keys);

            for (key, value) in record {
                match key_types.get_mut(key) {
                    None => {
                        key_types.insert(key.clone(), infer_type(key, value));
                    }
                    Some(tag) if tag.accepts(value) => {}
                    // Mixed scalars all have a string spelling.
                    Some(tag) if tag.is_scalar() && infer_type(key, value).is_scalar() => {
                        warn!(
                            key = %key,
                            declared = %tag,
                            found = value.kind_name(),
                            "conflicting scalar types, widening to String"
                        );
                        *tag = TypeTag::Text;
                    }
                    Some(tag) => {
                        warn!(
                            key = %key,
                            declared = %tag,
                            found = value.kind_name(),
                            "value doesn't match the type inferred from an earlier document"
                        );
                    }
                }
            }
            count += 1;
        }

        let mut common_keys = common_keys.unwrap_or_default();
        if mode == OddKeysMode::Forced && count == 1 {
            // One sample can't show which keys are optional: demote all of them.
            common_keys.retain(|key| Some(key.as_str()) == pinned_key);
        }
        let odd_keys: BTreeSet<String> = all_keys.difference(&common_keys).cloned().collect();

        trace!(
            records = count,
            common = common_keys.len(),
            odd = odd_keys.len(),
            "unified schema"
        );

        Schema {
            common_keys,
            odd_keys,
            key_types,
        }
    }

    /// Every key, sorted.
    pub fn all_keys(&self) -> BTreeSet<&str> {
        self.common_keys
            .iter()
            .chain(&self.odd_keys)
            .map(String::as_str)
            .collect()
    }

    /// Keys in emission order: common keys first, then optional keys, each group sorted.
    pub fn ordered_keys(&self) -> impl Iterator<Item = &str> {
        self.common_keys
            .iter()
            .chain(&self.odd_keys)
            .map(String::as_str)
    }

    pub fn is_optional(&self, key: &str) -> bool {
        self.odd_keys.contains(key)
    }

    pub fn type_of(&self, key: &str) -> Option<&TypeTag> {
        self.key_types.get(key)
    }
}
