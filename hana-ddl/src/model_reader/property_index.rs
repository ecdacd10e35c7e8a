use std::collections::HashMap;

use crate::activation::is_active;
use crate::model_reader::raw::RawProperty;
use crate::models::KeyColumn;
use crate::{HanaDdlError, Result};

/// Identifier to column lookup for one entity, built once before any key is resolved.
///
/// Keys and indexes reference their columns by property identifier, so the name and
/// activation state are read from the current properties, not from the key definition.
pub(crate) struct PropertyIndex<'a> {
    table_name: &'a str,
    by_id: HashMap<&'a str, KeyColumn>,
}

impl<'a> PropertyIndex<'a> {
    pub fn build(table_name: &'a str, properties: &'a [(String, RawProperty)]) -> Self {
        let mut by_id = HashMap::with_capacity(properties.len());
        for (name, property) in properties {
            let Some(id) = property.guid.as_deref() else {
                continue;
            };
            // First definition wins, as with a linear scan.
            by_id.entry(id).or_insert_with(|| KeyColumn {
                name: name.clone(),
                is_activated: is_active(property.is_activated),
            });
        }

        PropertyIndex { table_name, by_id }
    }

    pub fn resolve(&self, key_id: &str) -> Result<KeyColumn> {
        self.by_id
            .get(key_id)
            .cloned()
            .ok_or_else(|| HanaDdlError::UnresolvedKeyReference {
                table: self.table_name.to_string(),
                key_id: key_id.to_string(),
            })
    }
}
