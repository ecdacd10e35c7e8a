use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DbVersionRow {
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SchemaNameRow {
    pub schema_name: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SchemaPropertiesRow {
    pub schema_name: String,
    pub schema_owner: Option<String>,
    #[serde(default, deserialize_with = "hana_flag")]
    pub has_privileges: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TableNameRow {
    pub schema_name: String,
    pub table_name: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TablePropertiesRow {
    pub table_type: Option<String>,
    #[serde(default, deserialize_with = "hana_flag")]
    pub is_column_table: bool,
    #[serde(default, deserialize_with = "hana_flag")]
    pub is_temporary: bool,
    /// `GLOBAL` or `LOCAL` for temporary tables.
    pub temporary_table_type: Option<String>,
    pub comments: Option<String>,
    pub partition_spec: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TableColumnRow {
    pub column_name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub position: Option<i64>,
    pub data_type_name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub length: Option<i64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub scale: Option<i64>,
    #[serde(default = "flag_true", deserialize_with = "hana_flag")]
    pub is_nullable: bool,
    pub default_value: Option<String>,
    pub comments: Option<String>,
    /// `ALWAYS AS IDENTITY`, `BY DEFAULT AS IDENTITY` or `ALWAYS AS (<expression>)`.
    pub generation_type: Option<String>,
}

/// One column of a primary or unique key constraint.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct KeyConstraintRow {
    pub constraint_name: String,
    pub column_name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub position: Option<i64>,
}

/// One column pair of a foreign key.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ForeignKeyRow {
    pub constraint_name: String,
    pub column_name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub position: Option<i64>,
    pub referenced_schema_name: String,
    pub referenced_table_name: String,
    pub referenced_column_name: String,
    pub update_rule: Option<String>,
    pub delete_rule: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CheckConstraintRow {
    pub constraint_name: String,
    pub check_condition: String,
}

/// One column of an index.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct IndexColumnRow {
    pub index_name: String,
    pub index_type: Option<String>,
    pub column_name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub position: Option<i64>,
    #[serde(default = "flag_true", deserialize_with = "hana_flag")]
    pub ascending_order: bool,
}

#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ViewDefinitionRow {
    pub view_name: String,
    pub definition: Option<String>,
    pub comments: Option<String>,
}

fn flag_true() -> bool {
    true
}

/// The catalog reports flags as `'TRUE'`/`'FALSE'` strings. Real booleans are accepted too.
fn hana_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(flag)) => flag.trim().eq_ignore_ascii_case("TRUE"),
        _ => false,
    })
}

/// Numbers may come back as strings depending on the driver.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
