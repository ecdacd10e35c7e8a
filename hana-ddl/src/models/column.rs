use itertools::Itertools;

use crate::activation::Activatable;
use crate::models::data_type::{ColumnType, HanaDataType};
use crate::models::key_constraint::{InlineKey, KeyOptions};
use crate::quoting::{quote_value_string, Quotable};
use crate::template::ColumnDefinitionTemplate;

/// Whether identity values are always generated or only when none is given.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IdentityGeneration {
    Always,
    ByDefault,
}

impl IdentityGeneration {
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.split_whitespace().join(" ").to_uppercase();
        match normalized.as_str() {
            "ALWAYS" => Some(IdentityGeneration::Always),
            "BY DEFAULT" => Some(IdentityGeneration::ByDefault),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            IdentityGeneration::Always => "ALWAYS",
            IdentityGeneration::ByDefault => "BY DEFAULT",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IdentitySpec {
    pub generated: IdentityGeneration,
    pub start: Option<i64>,
    pub increment: Option<i64>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    /// `CYCLE` or `NO CYCLE`, emitted verbatim.
    pub cycle: Option<String>,
}

impl IdentitySpec {
    pub fn new(generated: IdentityGeneration) -> Self {
        IdentitySpec {
            generated,
            start: None,
            increment: None,
            min_value: None,
            max_value: None,
            cycle: None,
        }
    }

    fn get_options(&self) -> String {
        // Zero means "not set" for every sequence option.
        let non_zero = |v: Option<i64>| v.filter(|v| *v != 0);

        [
            non_zero(self.start).map(|v| format!("START WITH {v}")),
            non_zero(self.increment).map(|v| format!("INCREMENT BY {v}")),
            self.cycle.as_deref().map(str::trim).filter(|c| !c.is_empty()).map(str::to_string),
            non_zero(self.min_value).map(|v| format!("MINVALUE {v}")),
            non_zero(self.max_value).map(|v| format!("MAXVALUE {v}")),
        ]
        .into_iter()
        .flatten()
        .join(" ")
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DefaultValue {
    /// Quoted as a string literal for string typed columns, emitted as is otherwise.
    Text(String),
    Number(String),
}

/// Where a column's value comes from when an insert doesn't supply one.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub enum ColumnValueSource {
    #[default]
    None,
    Default(DefaultValue),
    Identity(IdentitySpec),
    /// A generation expression, e.g. `ALWAYS AS (A + B)`.
    Generated(String),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HanaColumn {
    pub name: String,
    pub column_type: ColumnType,
    pub is_nullable: bool,
    pub value_source: ColumnValueSource,
    pub inline_key: InlineKey,
    pub comment: Option<String>,
    pub is_activated: bool,
}

impl HanaColumn {
    pub fn new(name: &str, data_type: HanaDataType) -> Self {
        HanaColumn {
            name: name.to_string(),
            column_type: ColumnType::new(data_type),
            is_nullable: true,
            value_source: ColumnValueSource::None,
            inline_key: InlineKey::None,
            comment: None,
            is_activated: true,
        }
    }

    /// The column as it appears inside `CREATE TABLE`, without activation handling.
    pub fn get_definition(&self) -> String {
        ColumnDefinitionTemplate {
            name: self.name.quote().into(),
            data_type: format!(" {}", self.column_type.resolve()).into(),
            default: self.get_value_clause().into(),
            constraints: self.get_constraints_clause().into(),
        }
        .render()
    }

    fn get_value_clause(&self) -> String {
        match &self.value_source {
            ColumnValueSource::None => String::new(),
            ColumnValueSource::Identity(identity) if self.column_type.data_type.supports_identity() => {
                let options = identity.get_options();
                if options.is_empty() {
                    format!(" GENERATED {} AS IDENTITY", identity.generated.keyword())
                } else {
                    format!(" GENERATED {} AS IDENTITY ({options})", identity.generated.keyword())
                }
            }
            ColumnValueSource::Identity(_) => String::new(),
            ColumnValueSource::Generated(expression) => format!(" GENERATED {}", expression.trim()),
            ColumnValueSource::Default(DefaultValue::Text(text)) if self.column_type.data_type.is_string() => {
                format!(" DEFAULT {}", quote_value_string(text))
            }
            ColumnValueSource::Default(DefaultValue::Text(value) | DefaultValue::Number(value)) => {
                format!(" DEFAULT {value}")
            }
        }
    }

    fn get_constraints_clause(&self) -> String {
        let mut sql = String::new();

        let is_primary_key = matches!(self.inline_key, InlineKey::PrimaryKey(_));
        if !self.is_nullable || is_primary_key {
            sql.push_str(" NOT NULL");
        }

        let options: Option<&KeyOptions> = match &self.inline_key {
            InlineKey::None => None,
            InlineKey::PrimaryKey(options) => {
                sql.push_str(" PRIMARY KEY");
                Some(options)
            }
            InlineKey::Unique(options) => {
                sql.push_str(" UNIQUE");
                Some(options)
            }
        };

        if let Some(options) = options {
            sql.push_str(&options.get_options_string());
        }

        sql
    }

    /// Comment text for `COMMENT ON COLUMN`, when there is any.
    pub fn get_comment(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.trim().is_empty())
    }
}

impl Activatable for HanaColumn {
    fn is_activated(&self) -> bool {
        self.is_activated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_primary_key_is_not_null() {
        let column = HanaColumn {
            inline_key: InlineKey::PrimaryKey(KeyOptions::default()),
            ..HanaColumn::new("ID", HanaDataType::Integer)
        };
        assert_eq!(column.get_definition(), "\"ID\" INTEGER NOT NULL PRIMARY KEY");
    }

    #[test]
    fn nullable_column_with_length() {
        let mut column = HanaColumn::new("NAME", HanaDataType::Nvarchar);
        column.column_type.length = Some(50);
        assert_eq!(column.get_definition(), "\"NAME\" NVARCHAR(50)");
    }

    #[test]
    fn string_defaults_are_quoted() {
        let mut column = HanaColumn::new("STATUS", HanaDataType::Varchar);
        column.column_type.length = Some(10);
        column.is_nullable = false;
        column.value_source = ColumnValueSource::Default(DefaultValue::Text("it's new".to_string()));
        assert_eq!(column.get_definition(), "\"STATUS\" VARCHAR(10) DEFAULT 'it''s new' NOT NULL");
    }

    #[test]
    fn numeric_zero_default() {
        let mut column = HanaColumn::new("QTY", HanaDataType::Integer);
        column.value_source = ColumnValueSource::Default(DefaultValue::Number("0".to_string()));
        assert_eq!(column.get_definition(), "\"QTY\" INTEGER DEFAULT 0");

        let mut column = HanaColumn::new("CREATED", HanaDataType::Timestamp);
        column.value_source = ColumnValueSource::Default(DefaultValue::Text("CURRENT_TIMESTAMP".to_string()));
        assert_eq!(column.get_definition(), "\"CREATED\" TIMESTAMP DEFAULT CURRENT_TIMESTAMP");
    }

    #[test]
    fn identity_only_for_integer_types() {
        let identity = IdentitySpec {
            start: Some(1),
            increment: Some(1),
            max_value: Some(1000),
            min_value: Some(0),
            cycle: Some("NO CYCLE".to_string()),
            ..IdentitySpec::new(IdentityGeneration::ByDefault)
        };

        let mut column = HanaColumn::new("ID", HanaDataType::BigInt);
        column.value_source = ColumnValueSource::Identity(identity.clone());
        assert_eq!(
            column.get_definition(),
            "\"ID\" BIGINT GENERATED BY DEFAULT AS IDENTITY (START WITH 1 INCREMENT BY 1 NO CYCLE MAXVALUE 1000)"
        );

        let mut column = HanaColumn::new("CODE", HanaDataType::Nvarchar);
        column.value_source = ColumnValueSource::Identity(identity);
        assert_eq!(column.get_definition(), "\"CODE\" NVARCHAR");

        let mut column = HanaColumn::new("ID", HanaDataType::Integer);
        column.value_source = ColumnValueSource::Identity(IdentitySpec::new(IdentityGeneration::Always));
        assert_eq!(column.get_definition(), "\"ID\" INTEGER GENERATED ALWAYS AS IDENTITY");
    }

    #[test]
    fn unique_with_options() {
        let column = HanaColumn {
            inline_key: InlineKey::Unique(KeyOptions {
                rely: Some("RELY".to_string()),
                ..Default::default()
            }),
            ..HanaColumn::new("EMAIL", HanaDataType::Nvarchar)
        };
        assert_eq!(column.get_definition(), "\"EMAIL\" NVARCHAR UNIQUE RELY");
    }

    #[test]
    fn identity_generation_parsing() {
        assert_eq!(IdentityGeneration::parse("always"), Some(IdentityGeneration::Always));
        assert_eq!(IdentityGeneration::parse(" By   Default "), Some(IdentityGeneration::ByDefault));
        assert_eq!(IdentityGeneration::parse(""), None);
    }
}
