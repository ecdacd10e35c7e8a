//! Query text for the `SYS` catalog views.

use itertools::Itertools;

/// Schemas owned by the system, hidden unless system collections are requested.
pub const SYSTEM_SCHEMAS: [&str; 23] = [
    "SYS",
    "SYSTEM",
    "_SYS_AFL",
    "_SYS_BI",
    "_SYS_BIC",
    "_SYS_EPM",
    "_SYS_PLAN_STABILITY",
    "_SYS_REPO",
    "_SYS_RT",
    "_SYS_SECURITY",
    "_SYS_SQL_ANALYZER",
    "_SYS_STATISTICS",
    "_SYS_TASK",
    "_SYS_TELEMETRY",
    "_SYS_XS",
    "_SYS_DI",
    "_SYS_DI_CLOUD",
    "_SYS_AUDIT",
    "SAP_XS_LM",
    "SAP_HANA_ADMIN",
    "UIS",
    "SAP_PA_APL",
    "DWC_GLOBAL",
];

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CollectionKind {
    Table,
    View,
}

/// Collapses every whitespace run to one space.
pub fn clean_up_query(query: &str) -> String {
    query.split_whitespace().join(" ")
}

/// Escapes a name for use inside a single quoted literal.
fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

pub fn get_non_system_schema_condition(column: &str) -> String {
    SYSTEM_SCHEMAS
        .iter()
        .map(|schema| format!("{column} != '{schema}'"))
        .chain([
            format!("{column} NOT LIKE '_SYS%'"),
            format!("{column} NOT LIKE 'SAP_%'"),
        ])
        .join(" AND ")
}

pub fn get_db_version_query() -> String {
    "SELECT VERSION FROM SYS.M_DATABASE".to_string()
}

pub fn get_schemas_query(include_system_collection: bool) -> String {
    let mut query = String::from("SELECT SCHEMA_NAME FROM SYS.SCHEMAS WHERE HAS_PRIVILEGES = 'TRUE'");

    if !include_system_collection {
        query.push_str(" AND ");
        query.push_str(&get_non_system_schema_condition("SCHEMA_NAME"));
    }

    query.push_str(" ORDER BY SCHEMA_NAME");
    clean_up_query(&query)
}

pub fn get_schema_query(schema_name: &str) -> String {
    format!(
        "SELECT SCHEMA_NAME, SCHEMA_OWNER, HAS_PRIVILEGES FROM SYS.SCHEMAS WHERE SCHEMA_NAME = '{}'",
        escape(schema_name)
    )
}

/// Names of tables or views per schema, as `SCHEMA_NAME`/`TABLE_NAME` rows.
pub fn get_table_names_query(kind: CollectionKind, include_system_collection: bool) -> String {
    let mut query = match kind {
        CollectionKind::Table => String::from(
            r#"
            SELECT SCHEMA_NAME, TABLE_NAME
            FROM SYS.TABLES
            WHERE IS_USER_DEFINED_TYPE = 'FALSE'
            "#,
        ),
        CollectionKind::View => String::from(
            r#"
            SELECT SCHEMA_NAME, VIEW_NAME AS TABLE_NAME
            FROM SYS.VIEWS
            WHERE 1 = 1
            "#,
        ),
    };

    if !include_system_collection {
        query.push_str(" AND ");
        query.push_str(&get_non_system_schema_condition("SCHEMA_NAME"));
    }

    query.push_str(" ORDER BY SCHEMA_NAME, TABLE_NAME");
    clean_up_query(&query)
}

pub fn get_table_properties_query(schema_name: &str, table_name: &str) -> String {
    clean_up_query(&format!(
        r#"
        SELECT
            TABLE_TYPE,
            IS_COLUMN_TABLE,
            IS_TEMPORARY,
            TEMPORARY_TABLE_TYPE,
            COMMENTS,
            IS_PARTITIONED,
            PARTITION_SPEC
        FROM SYS.TABLES
        WHERE SCHEMA_NAME = '{}'
        AND TABLE_NAME = '{}'
        "#,
        escape(schema_name),
        escape(table_name)
    ))
}

pub fn get_table_columns_query(schema_name: &str, table_name: &str) -> String {
    clean_up_query(&format!(
        r#"
        SELECT
            COLUMN_NAME,
            POSITION,
            DATA_TYPE_NAME,
            LENGTH,
            SCALE,
            IS_NULLABLE,
            DEFAULT_VALUE,
            COMMENTS,
            GENERATION_TYPE
        FROM SYS.TABLE_COLUMNS
        WHERE SCHEMA_NAME = '{}'
        AND TABLE_NAME = '{}'
        ORDER BY POSITION
        "#,
        escape(schema_name),
        escape(table_name)
    ))
}

pub fn get_table_primary_key_query(schema_name: &str, table_name: &str) -> String {
    clean_up_query(&format!(
        r#"
        SELECT
            c.CONSTRAINT_NAME,
            c.COLUMN_NAME,
            c.POSITION
        FROM SYS.CONSTRAINTS c
        WHERE c.SCHEMA_NAME = '{}'
        AND c.TABLE_NAME = '{}'
        AND c.IS_PRIMARY_KEY = 'TRUE'
        ORDER BY c.POSITION
        "#,
        escape(schema_name),
        escape(table_name)
    ))
}

pub fn get_table_unique_constraints_query(schema_name: &str, table_name: &str) -> String {
    clean_up_query(&format!(
        r#"
        SELECT
            c.CONSTRAINT_NAME,
            c.COLUMN_NAME,
            c.POSITION
        FROM SYS.CONSTRAINTS c
        WHERE c.SCHEMA_NAME = '{}'
        AND c.TABLE_NAME = '{}'
        AND c.IS_UNIQUE_KEY = 'TRUE'
        AND c.IS_PRIMARY_KEY = 'FALSE'
        ORDER BY c.CONSTRAINT_NAME, c.POSITION
        "#,
        escape(schema_name),
        escape(table_name)
    ))
}

pub fn get_table_foreign_keys_query(schema_name: &str, table_name: &str) -> String {
    clean_up_query(&format!(
        r#"
        SELECT
            fk.CONSTRAINT_NAME,
            fk.COLUMN_NAME,
            fk.POSITION,
            fk.REFERENCED_SCHEMA_NAME,
            fk.REFERENCED_TABLE_NAME,
            fk.REFERENCED_COLUMN_NAME,
            fk.UPDATE_RULE,
            fk.DELETE_RULE
        FROM SYS.REFERENTIAL_CONSTRAINTS fk
        WHERE fk.SCHEMA_NAME = '{}'
        AND fk.TABLE_NAME = '{}'
        ORDER BY fk.CONSTRAINT_NAME, fk.POSITION
        "#,
        escape(schema_name),
        escape(table_name)
    ))
}

pub fn get_table_check_constraints_query(schema_name: &str, table_name: &str) -> String {
    clean_up_query(&format!(
        r#"
        SELECT
            CONSTRAINT_NAME,
            CHECK_CONDITION
        FROM SYS.CHECK_CONSTRAINTS
        WHERE SCHEMA_NAME = '{}'
        AND TABLE_NAME = '{}'
        "#,
        escape(schema_name),
        escape(table_name)
    ))
}

pub fn get_table_indexes_query(schema_name: &str, table_name: &str) -> String {
    clean_up_query(&format!(
        r#"
        SELECT
            i.INDEX_NAME,
            i.INDEX_TYPE,
            ic.COLUMN_NAME,
            ic.POSITION,
            ic.ASCENDING_ORDER
        FROM SYS.INDEXES i
        INNER JOIN SYS.INDEX_COLUMNS ic
            ON i.SCHEMA_NAME = ic.SCHEMA_NAME
            AND i.TABLE_NAME = ic.TABLE_NAME
            AND i.INDEX_NAME = ic.INDEX_NAME
        WHERE i.SCHEMA_NAME = '{}'
        AND i.TABLE_NAME = '{}'
        AND i.CONSTRAINT IS NULL
        ORDER BY i.INDEX_NAME, ic.POSITION
        "#,
        escape(schema_name),
        escape(table_name)
    ))
}

pub fn get_view_definition_query(schema_name: &str, view_name: &str) -> String {
    clean_up_query(&format!(
        r#"
        SELECT
            VIEW_NAME,
            DEFINITION,
            COMMENTS
        FROM SYS.VIEWS
        WHERE SCHEMA_NAME = '{}'
        AND VIEW_NAME = '{}'
        "#,
        escape(schema_name),
        escape(view_name)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(clean_up_query("\n\tSELECT  A\n  FROM\tB \n"), "SELECT A FROM B");
    }

    #[test]
    fn names_are_escaped() {
        assert_eq!(
            get_view_definition_query("S", "O'NEIL"),
            "SELECT VIEW_NAME, DEFINITION, COMMENTS FROM SYS.VIEWS WHERE SCHEMA_NAME = 'S' AND VIEW_NAME = 'O''NEIL'"
        );
    }

    #[test]
    fn system_schemas_are_excluded_unless_requested() {
        let query = get_schemas_query(false);
        assert!(query.starts_with("SELECT SCHEMA_NAME FROM SYS.SCHEMAS WHERE HAS_PRIVILEGES = 'TRUE' AND SCHEMA_NAME != 'SYS'"));
        assert!(query.ends_with("SCHEMA_NAME NOT LIKE '_SYS%' AND SCHEMA_NAME NOT LIKE 'SAP_%' ORDER BY SCHEMA_NAME"));

        assert_eq!(
            get_schemas_query(true),
            "SELECT SCHEMA_NAME FROM SYS.SCHEMAS WHERE HAS_PRIVILEGES = 'TRUE' ORDER BY SCHEMA_NAME"
        );
    }

    #[test]
    fn table_names_by_kind() {
        assert_eq!(
            get_table_names_query(CollectionKind::View, true),
            "SELECT SCHEMA_NAME, VIEW_NAME AS TABLE_NAME FROM SYS.VIEWS WHERE 1 = 1 ORDER BY SCHEMA_NAME, TABLE_NAME"
        );
    }
}
