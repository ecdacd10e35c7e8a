//! Serde shapes of the modeling tool's JSON tree.
//!
//! These mirror the input as loosely as it arrives: most fields are optional and
//! numeric modifiers only count when they are actual JSON numbers.

use std::fmt::Formatter;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModel {
    #[serde(default)]
    pub container_data: Vec<RawContainer>,
    #[serde(default)]
    pub entities: Vec<RawEntity>,
    #[serde(default)]
    pub views: Vec<RawView>,
    #[serde(default)]
    pub relationships: Vec<RawRelationship>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContainer {
    pub name: Option<String>,
    pub is_activated: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntity {
    #[serde(rename = "GUID")]
    pub guid: Option<String>,
    pub collection_name: Option<String>,
    pub name: Option<String>,
    /// `None` when the entity has no `properties` at all.
    #[serde(default, deserialize_with = "ordered_properties")]
    pub properties: Option<Vec<(String, RawProperty)>>,
    #[serde(default)]
    pub primary_key: Vec<RawCompositeKey>,
    #[serde(default)]
    pub unique_key: Vec<RawCompositeKey>,
    pub entity_level: Option<RawEntityDetails>,
    pub is_activated: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProperty {
    #[serde(rename = "GUID")]
    pub guid: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub mode: Option<String>,
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    pub required: Option<bool>,
    pub default: Option<Value>,
    pub is_activated: Option<bool>,
    #[serde(default, deserialize_with = "number_only")]
    pub length: Option<i64>,
    #[serde(default, deserialize_with = "number_only")]
    pub precision: Option<i64>,
    #[serde(default, deserialize_with = "number_only")]
    pub scale: Option<i64>,
    #[serde(default, deserialize_with = "number_only")]
    pub dimension: Option<i64>,
    #[serde(default, deserialize_with = "number_only")]
    pub srid: Option<i64>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub composite_primary_key: bool,
    #[serde(default)]
    pub composite_unique_key: bool,
    pub primary_key_options: Option<RawKeyOptions>,
    pub unique_key_options: Option<RawKeyOptions>,
    pub description: Option<String>,
    pub ref_description: Option<String>,
    pub identity: Option<RawIdentity>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawKeyOptions {
    pub constraint_name: Option<String>,
    pub defer_clause: Option<String>,
    pub rely: Option<String>,
    pub index_clause: Option<String>,
    pub validate: Option<String>,
    pub exception_clause: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIdentity {
    pub generated: Option<String>,
    #[serde(default, deserialize_with = "number_only")]
    pub start: Option<i64>,
    #[serde(default, deserialize_with = "number_only")]
    pub increment: Option<i64>,
    #[serde(default, deserialize_with = "number_only")]
    pub min_value: Option<i64>,
    #[serde(default, deserialize_with = "number_only")]
    pub max_value: Option<i64>,
    pub cycle: Option<String>,
}

/// An entry of the entity's `primaryKey`/`uniqueKey` list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompositeKey {
    #[serde(flatten)]
    pub options: RawKeyOptions,
    #[serde(default)]
    pub composite_primary_key: Vec<RawKeyReference>,
    #[serde(default)]
    pub composite_unique_key: Vec<RawKeyReference>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawKeyReference {
    pub key_id: String,
    /// Sort direction, only meaningful for index keys.
    #[serde(rename = "type")]
    pub key_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntityDetails {
    pub select_statement: Option<String>,
    #[serde(default)]
    pub temporary: bool,
    #[serde(default)]
    pub global_temporary: bool,
    pub column_store: Option<bool>,
    #[serde(default)]
    pub row_store: bool,
    pub description: Option<String>,
    #[serde(default)]
    pub if_not_exist: bool,
    pub table_properties: Option<String>,
    pub partition_spec: Option<String>,
    pub under_super_table: Option<String>,
    #[serde(rename = "table_tablespace_name")]
    pub tablespace_name: Option<String>,
    /// The `auxiliary*` fields only count when this is set.
    #[serde(default)]
    pub auxiliary: bool,
    /// Identifier of the entity the auxiliary table stores data for.
    pub auxiliary_base_table: Option<String>,
    #[serde(default)]
    pub auxiliary_base_column: Vec<RawKeyReference>,
    pub auxiliary_append: Option<String>,
    #[serde(default, deserialize_with = "number_only")]
    pub auxiliary_part: Option<i64>,
    #[serde(default)]
    pub chk_constr: Vec<RawCheckConstraint>,
    #[serde(default, rename = "Indxs")]
    pub indexes: Vec<RawIndex>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCheckConstraint {
    pub chk_constr_name: Option<String>,
    pub constr_expression: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIndex {
    pub indx_name: Option<String>,
    pub indx_type: Option<String>,
    pub is_activated: Option<bool>,
    #[serde(default)]
    pub indx_key: Vec<RawKeyReference>,
    #[serde(default)]
    pub indx_include_key: Vec<RawKeyReference>,
    pub indx_compress: Option<String>,
    pub indx_null_keys: Option<String>,
    pub indx_tablespace: Option<String>,
    pub indx_description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawView {
    pub name: Option<String>,
    #[serde(default)]
    pub keys: Vec<RawViewKey>,
    pub entity_level: Option<RawViewDetails>,
    pub is_activated: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawViewKey {
    pub name: Option<String>,
    pub alias: Option<String>,
    /// The source table; a key without one is a literal expression.
    pub entity_name: Option<String>,
    pub db_name: Option<String>,
    pub is_activated: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawViewDetails {
    #[serde(default, rename = "or_replace")]
    pub or_replace: bool,
    pub select_statement: Option<String>,
    pub description: Option<String>,
    pub view_properties: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRelationship {
    pub name: Option<String>,
    pub child_collection: Option<String>,
    #[serde(default)]
    pub child_field: Vec<RawFieldReference>,
    pub parent_collection: Option<String>,
    #[serde(default)]
    pub parent_field: Vec<RawFieldReference>,
    pub child_db_name: Option<String>,
    pub parent_db_name: Option<String>,
    #[serde(default)]
    pub custom_properties: RawRelationshipProperties,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawFieldReference {
    Name(String),
    #[serde(rename_all = "camelCase")]
    Field {
        name: String,
        is_activated: Option<bool>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRelationshipProperties {
    pub relationship_on_delete: Option<String>,
    pub relationship_on_update: Option<String>,
}

/// Keeps JSON numbers, integral or not, and treats anything else as absent.
fn number_only<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    })
}

/// Reads `properties` as a list, keeping the order the columns were modeled in.
fn ordered_properties<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<(String, RawProperty)>>, D::Error> {
    struct PropertiesVisitor;

    impl<'de> Visitor<'de> for PropertiesVisitor {
        type Value = Option<Vec<(String, RawProperty)>>;

        fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
            formatter.write_str("a map of property name to property")
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_map(self)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut properties = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, property)) = map.next_entry::<String, RawProperty>()? {
                properties.push((name, property));
            }
            Ok(Some(properties))
        }
    }

    deserializer.deserialize_option(PropertiesVisitor)
}
