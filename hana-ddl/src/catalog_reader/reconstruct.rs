//! Rebuilds DDL from catalog rows through the same models and renderers the model script uses.

use itertools::Itertools;
use serde::Deserialize;

use crate::catalog_reader::rows::{
    CheckConstraintRow, ForeignKeyRow, IndexColumnRow, KeyConstraintRow, TableColumnRow, TablePropertiesRow,
    ViewDefinitionRow,
};
use crate::helpers::non_blank;
use crate::models::{
    CheckConstraint, ColumnType, ColumnValueSource, DefaultValue, HanaColumn, HanaDataType, HanaForeignKey,
    HanaIndex, HanaTable, HanaView, IdentityGeneration, IdentitySpec, IndexKey, KeyColumn, KeyConstraint, KeyType,
    SortDirection, StorageMode, TableOptions, TemporaryMode,
};
use crate::quoting::qualified_name;

/// Everything the catalog says about one table.
#[derive(Debug, Clone, Eq, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableCatalog {
    pub schema_name: String,
    pub table_name: String,
    pub properties: Option<TablePropertiesRow>,
    pub columns: Vec<TableColumnRow>,
    pub primary_key: Vec<KeyConstraintRow>,
    pub unique_constraints: Vec<KeyConstraintRow>,
    pub foreign_keys: Vec<ForeignKeyRow>,
    pub check_constraints: Vec<CheckConstraintRow>,
    pub indexes: Vec<IndexColumnRow>,
}

impl TableCatalog {
    pub fn to_table(&self) -> HanaTable {
        let properties = self.properties.clone().unwrap_or_default();
        let is_row_table = self.properties.as_ref().is_some_and(|p| !p.is_column_table);

        let mut table = HanaTable {
            schema_name: Some(self.schema_name.clone()),
            columns: self.columns.iter().map(to_column).collect(),
            storage_mode: if is_row_table {
                StorageMode::Row
            } else {
                StorageMode::Column
            },
            temporary_mode: get_temporary_mode(&properties),
            options: TableOptions {
                partition_spec: non_blank(properties.partition_spec.as_deref()).map(str::to_string),
                ..Default::default()
            },
            comment: non_blank(properties.comments.as_deref()).map(str::to_string),
            check_constraints: self
                .check_constraints
                .iter()
                .map(|c| CheckConstraint::new(Some(&c.constraint_name), &c.check_condition))
                .collect(),
            indexes: to_indexes(&self.indexes),
            ..HanaTable::new(&self.table_name)
        };

        table.key_constraints = to_key_constraints(KeyType::PrimaryKey, &self.primary_key)
            .into_iter()
            .chain(to_key_constraints(KeyType::Unique, &self.unique_constraints))
            .collect();

        for key in table.key_constraints.iter().filter(|k| k.key_type == KeyType::PrimaryKey) {
            for key_column in &key.columns {
                if let Some(column) = table.columns.iter_mut().find(|c| c.name == key_column.name) {
                    column.is_nullable = false;
                }
            }
        }

        table
    }

    /// Foreign keys grouped by constraint name, columns in position order.
    pub fn to_foreign_keys(&self) -> Vec<HanaForeignKey> {
        self.foreign_keys
            .iter()
            .sorted_by(|a, b| a.constraint_name.cmp(&b.constraint_name).then(a.position.cmp(&b.position)))
            .chunk_by(|row| row.constraint_name.clone())
            .into_iter()
            .filter_map(|(name, rows)| {
                let rows: Vec<&ForeignKeyRow> = rows.collect();
                let first = rows.first()?;

                Some(HanaForeignKey {
                    name: Some(name),
                    child_schema: Some(self.schema_name.clone()),
                    child_columns: rows.iter().map(|r| KeyColumn::new(&r.column_name)).collect(),
                    parent_schema: Some(first.referenced_schema_name.clone()),
                    parent_columns: rows.iter().map(|r| KeyColumn::new(&r.referenced_column_name)).collect(),
                    on_delete: first.delete_rule.clone(),
                    on_update: first.update_rule.clone(),
                    ..HanaForeignKey::new(&self.table_name, &first.referenced_table_name)
                })
            })
            .collect()
    }

    /// The table with its comments, its foreign keys as `ALTER TABLE` statements, then its indexes.
    pub fn get_ddl(&self) -> String {
        let table = self.to_table();

        let mut statements = vec![table.get_create_statement()];
        statements.extend(self.to_foreign_keys().iter().map(HanaForeignKey::get_alter_statement));
        statements.extend(table.get_index_statements());

        statements.join("\n\n")
    }
}

/// What the catalog says about one view.
#[derive(Debug, Clone, Eq, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewCatalog {
    pub schema_name: String,
    pub view_name: String,
    pub definition: Option<ViewDefinitionRow>,
}

impl ViewCatalog {
    /// `None` when the catalog holds no definition for the view.
    pub fn to_view(&self) -> Option<HanaView> {
        let definition = self.definition.as_ref()?;
        let select = non_blank(definition.definition.as_deref())?;

        Some(HanaView {
            schema_name: Some(self.schema_name.clone()),
            select_statement: Some(select.to_string()),
            comment: non_blank(definition.comments.as_deref()).map(str::to_string),
            ..HanaView::new(&self.view_name)
        })
    }

    pub fn get_ddl(&self) -> String {
        match self.to_view() {
            Some(view) => view.get_create_statement(),
            None => format!(
                "-- Could not retrieve definition for view {}",
                qualified_name(Some(&self.schema_name), &self.view_name)
            ),
        }
    }
}

/// Catalog data captured for a set of tables and views.
#[derive(Debug, Clone, Eq, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSnapshot {
    pub tables: Vec<TableCatalog>,
    pub views: Vec<ViewCatalog>,
}

impl CatalogSnapshot {
    /// Tables first, then views, each in snapshot order.
    pub fn get_script(&self) -> String {
        self.tables
            .iter()
            .map(TableCatalog::get_ddl)
            .chain(self.views.iter().map(ViewCatalog::get_ddl))
            .join("\n\n")
    }
}

fn get_temporary_mode(properties: &TablePropertiesRow) -> TemporaryMode {
    if !properties.is_temporary {
        return TemporaryMode::None;
    }

    match non_blank(properties.temporary_table_type.as_deref()) {
        Some(kind) if kind.eq_ignore_ascii_case("LOCAL") => TemporaryMode::Local,
        _ => TemporaryMode::Global,
    }
}

fn to_column(row: &TableColumnRow) -> HanaColumn {
    let data_type = HanaDataType::from_name(&row.data_type_name);

    let mut column_type = ColumnType::new(data_type.clone());
    if data_type == HanaDataType::RealVector {
        column_type.dimension = row.length;
    } else if data_type.supports_length() {
        column_type.length = row.length;
    } else if data_type.supports_precision_and_scale() && row.scale.is_some() {
        // A NULL scale marks a floating point decimal, which takes no precision.
        column_type.precision = row.length;
        column_type.scale = row.scale.filter(|s| *s > 0);
    }

    HanaColumn {
        column_type,
        is_nullable: row.is_nullable,
        value_source: get_value_source(row, &data_type),
        comment: non_blank(row.comments.as_deref()).map(str::to_string),
        ..HanaColumn::new(&row.column_name, data_type)
    }
}

fn get_value_source(row: &TableColumnRow, data_type: &HanaDataType) -> ColumnValueSource {
    if let Some(generation) = non_blank(row.generation_type.as_deref()) {
        let upper = generation.to_uppercase();
        if let Some(generated) = upper.strip_suffix("AS IDENTITY").and_then(IdentityGeneration::parse) {
            return ColumnValueSource::Identity(IdentitySpec::new(generated));
        }
        return ColumnValueSource::Generated(generation.to_string());
    }

    match row.default_value.as_deref() {
        Some(value) if data_type.is_string() => ColumnValueSource::Default(DefaultValue::Text(value.to_string())),
        Some(value) if !value.trim().is_empty() => ColumnValueSource::Default(DefaultValue::Number(value.to_string())),
        _ => ColumnValueSource::None,
    }
}

/// Key rows grouped by constraint name, keeping the order the constraints first appear in.
fn to_key_constraints(key_type: KeyType, rows: &[KeyConstraintRow]) -> Vec<KeyConstraint> {
    rows.iter()
        .map(|row| row.constraint_name.as_str())
        .unique()
        .map(|name| {
            let columns = rows
                .iter()
                .filter(|row| row.constraint_name == name)
                .sorted_by_key(|row| row.position)
                .map(|row| KeyColumn::new(&row.column_name))
                .collect();

            KeyConstraint {
                constraint_name: Some(name.to_string()),
                ..KeyConstraint::new(key_type, columns)
            }
        })
        .collect()
}

fn to_indexes(rows: &[IndexColumnRow]) -> Vec<HanaIndex> {
    rows.iter()
        .chunk_by(|row| row.index_name.clone())
        .into_iter()
        .map(|(name, rows)| {
            let rows: Vec<&IndexColumnRow> = rows.sorted_by_key(|row| row.position).collect();

            HanaIndex {
                index_type: rows.first().and_then(|r| get_index_type(r.index_type.as_deref())),
                keys: rows
                    .iter()
                    .map(|row| IndexKey {
                        direction: (!row.ascending_order).then_some(SortDirection::Desc),
                        ..IndexKey::new(&row.column_name)
                    })
                    .collect(),
                ..HanaIndex::new(&name)
            }
        })
        .collect()
}

/// The catalog's index types that can be written back in `CREATE <type> INDEX`.
fn get_index_type(catalog_type: Option<&str>) -> Option<String> {
    let catalog_type = non_blank(catalog_type)?.to_uppercase();

    if catalog_type.contains("UNIQUE") {
        return Some("UNIQUE".to_string());
    }

    match catalog_type.as_str() {
        "BTREE" | "CPBTREE" | "INVERTED HASH" | "INVERTED INDIVIDUAL" => Some(catalog_type),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use serde_json::json;

    fn orders_catalog() -> TableCatalog {
        serde_json::from_value(json!({
            "schemaName": "SALES",
            "tableName": "ORDERS",
            "properties": { "IS_COLUMN_TABLE": "TRUE", "IS_TEMPORARY": "FALSE", "COMMENTS": "All orders" },
            "columns": [
                { "COLUMN_NAME": "ID", "POSITION": 1, "DATA_TYPE_NAME": "BIGINT", "LENGTH": 19, "IS_NULLABLE": "FALSE",
                  "GENERATION_TYPE": "BY DEFAULT AS IDENTITY" },
                { "COLUMN_NAME": "CUSTOMER_ID", "POSITION": 2, "DATA_TYPE_NAME": "INTEGER", "LENGTH": 10, "IS_NULLABLE": "TRUE" },
                { "COLUMN_NAME": "TOTAL", "POSITION": 3, "DATA_TYPE_NAME": "DECIMAL", "LENGTH": 10, "SCALE": 2,
                  "IS_NULLABLE": "TRUE", "DEFAULT_VALUE": "0" },
                { "COLUMN_NAME": "STATUS", "POSITION": 4, "DATA_TYPE_NAME": "NVARCHAR", "LENGTH": 20,
                  "IS_NULLABLE": "TRUE", "DEFAULT_VALUE": "NEW", "COMMENTS": "Customer's status" }
            ],
            "primaryKey": [{ "CONSTRAINT_NAME": "PK_ORDERS", "COLUMN_NAME": "ID", "POSITION": 1 }],
            "uniqueConstraints": [],
            "foreignKeys": [
                { "CONSTRAINT_NAME": "FK_CUSTOMER", "COLUMN_NAME": "CUSTOMER_ID", "POSITION": 1,
                  "REFERENCED_SCHEMA_NAME": "SALES", "REFERENCED_TABLE_NAME": "CUSTOMERS", "REFERENCED_COLUMN_NAME": "ID",
                  "UPDATE_RULE": "RESTRICT", "DELETE_RULE": "CASCADE" }
            ],
            "checkConstraints": [{ "CONSTRAINT_NAME": "CK_TOTAL", "CHECK_CONDITION": "TOTAL >= 0" }],
            "indexes": [
                { "INDEX_NAME": "IX_STATUS", "INDEX_TYPE": "CPBTREE", "COLUMN_NAME": "STATUS", "POSITION": 1, "ASCENDING_ORDER": "FALSE" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn table_is_rebuilt() {
        similar_asserts::assert_eq!(
            orders_catalog().get_ddl(),
            indoc! {r#"
                CREATE COLUMN TABLE "SALES"."ORDERS"
                (
                	"ID" BIGINT GENERATED BY DEFAULT AS IDENTITY NOT NULL,
                	"CUSTOMER_ID" INTEGER,
                	"TOTAL" DECIMAL(10,2) DEFAULT 0,
                	"STATUS" NVARCHAR(20) DEFAULT 'NEW',
                	CONSTRAINT "PK_ORDERS" PRIMARY KEY ("ID"),
                	CONSTRAINT "CK_TOTAL" CHECK (TOTAL >= 0)
                );
                COMMENT ON TABLE "SALES"."ORDERS" IS 'All orders';
                COMMENT ON COLUMN "SALES"."ORDERS"."STATUS" IS 'Customer''s status';

                ALTER TABLE "SALES"."ORDERS" ADD CONSTRAINT "FK_CUSTOMER" FOREIGN KEY ("CUSTOMER_ID") REFERENCES "SALES"."CUSTOMERS" ("ID") ON DELETE CASCADE;

                CREATE CPBTREE INDEX "IX_STATUS" ON "SALES"."ORDERS" ("STATUS" DESC);"#}
        );
    }

    #[test]
    fn decimal_without_scale_stays_floating_point() {
        let column = |scale: serde_json::Value| -> TableColumnRow {
            serde_json::from_value(json!({
                "COLUMN_NAME": "AMOUNT", "DATA_TYPE_NAME": "DECIMAL", "LENGTH": 34, "SCALE": scale
            }))
            .unwrap()
        };

        assert_eq!(to_column(&column(json!(null))).get_definition(), "\"AMOUNT\" DECIMAL");
        assert_eq!(to_column(&column(json!(4))).get_definition(), "\"AMOUNT\" DECIMAL(34,4)");
        assert_eq!(to_column(&column(json!(0))).get_definition(), "\"AMOUNT\" DECIMAL(34)");
    }

    #[test]
    fn composite_keys_are_grouped_by_name() {
        let rows = vec![
            KeyConstraintRow {
                constraint_name: "UQ_B".to_string(),
                column_name: "B2".to_string(),
                position: Some(2),
            },
            KeyConstraintRow {
                constraint_name: "UQ_A".to_string(),
                column_name: "A".to_string(),
                position: Some(1),
            },
            KeyConstraintRow {
                constraint_name: "UQ_B".to_string(),
                column_name: "B1".to_string(),
                position: Some(1),
            },
        ];

        let keys = to_key_constraints(KeyType::Unique, &rows);

        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].constraint_name.as_deref(), Some("UQ_B"));
        assert_eq!(keys[0].columns, vec![KeyColumn::new("B1"), KeyColumn::new("B2")]);
        assert_eq!(keys[1].columns, vec![KeyColumn::new("A")]);
    }

    #[test]
    fn temporary_tables() {
        let mut catalog = orders_catalog();
        catalog.properties = Some(TablePropertiesRow {
            is_temporary: true,
            temporary_table_type: Some("LOCAL".to_string()),
            ..Default::default()
        });
        assert_eq!(catalog.to_table().temporary_mode, TemporaryMode::Local);

        catalog.properties = Some(TablePropertiesRow {
            is_temporary: true,
            ..Default::default()
        });
        assert_eq!(catalog.to_table().temporary_mode, TemporaryMode::Global);
    }

    #[test]
    fn view_with_definition() {
        let view = ViewCatalog {
            schema_name: "SALES".to_string(),
            view_name: "V_OPEN".to_string(),
            definition: Some(ViewDefinitionRow {
                view_name: "V_OPEN".to_string(),
                definition: Some("SELECT * FROM \"SALES\".\"ORDERS\" WHERE \"STATUS\" = 'OPEN'".to_string()),
                comments: Some("Open orders".to_string()),
            }),
        };

        assert_eq!(
            view.get_ddl(),
            "CREATE VIEW \"SALES\".\"V_OPEN\"\n\tAS SELECT * FROM \"SALES\".\"ORDERS\" WHERE \"STATUS\" = 'OPEN';\nCOMMENT ON VIEW \"SALES\".\"V_OPEN\" IS 'Open orders';"
        );
    }

    #[test]
    fn view_without_definition() {
        let view = ViewCatalog {
            schema_name: "S".to_string(),
            view_name: "V".to_string(),
            definition: None,
        };

        assert_eq!(view.get_ddl(), "-- Could not retrieve definition for view \"S\".\"V\"");
    }

    #[test]
    fn snapshot_script_lists_tables_then_views() {
        let snapshot = CatalogSnapshot {
            tables: vec![TableCatalog {
                schema_name: "S".to_string(),
                table_name: "T".to_string(),
                columns: vec![TableColumnRow {
                    column_name: "A".to_string(),
                    position: Some(1),
                    data_type_name: "INTEGER".to_string(),
                    length: Some(10),
                    scale: None,
                    is_nullable: true,
                    default_value: None,
                    comments: None,
                    generation_type: None,
                }],
                ..Default::default()
            }],
            views: vec![ViewCatalog {
                schema_name: "S".to_string(),
                view_name: "V".to_string(),
                definition: None,
            }],
        };

        assert_eq!(
            snapshot.get_script(),
            "CREATE COLUMN TABLE \"S\".\"T\"\n(\n\t\"A\" INTEGER\n);\n\n-- Could not retrieve definition for view \"S\".\"V\""
        );
    }
}
