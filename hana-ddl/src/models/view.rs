use itertools::Itertools;
use tracing::warn;

use crate::activation::{comment_if_deactivated, partition, Activatable, CommentPlacement};
use crate::helpers::{indent_with_tab, non_blank};
use crate::models::comment::{get_comment_statement, CommentObjectType};
use crate::quoting::{qualified_name, Quotable};
use crate::template::{CreateViewTemplate, ViewSelectTemplate};

/// One projected item of a view.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ViewKey {
    /// Emitted verbatim.
    Expression { expression: String, alias: Option<String> },
    /// A column of a source table. The table becomes part of the derived `FROM` list.
    Column {
        schema_name: Option<String>,
        table_name: String,
        name: String,
        alias: Option<String>,
        is_activated: bool,
    },
}

impl ViewKey {
    pub fn column(schema_name: Option<&str>, table_name: &str, name: &str) -> Self {
        ViewKey::Column {
            schema_name: schema_name.map(str::to_string),
            table_name: table_name.to_string(),
            name: name.to_string(),
            alias: None,
            is_activated: true,
        }
    }

    fn source_table(&self) -> Option<String> {
        match self {
            ViewKey::Expression { .. } => None,
            ViewKey::Column {
                schema_name,
                table_name,
                ..
            } => Some(qualified_name(schema_name.as_deref(), table_name)),
        }
    }

    fn get_projection(&self) -> String {
        let (mut sql, alias) = match self {
            ViewKey::Expression { expression, alias } => (expression.trim().to_string(), alias),
            ViewKey::Column { name, alias, .. } => {
                let table = self.source_table().unwrap_or_default();
                (format!("{}.{}", table, name.quote()), alias)
            }
        };

        if let Some(alias) = non_blank(alias.as_deref()) {
            sql.push_str(" AS ");
            sql.push_str(&alias.quote());
        }

        sql
    }
}

impl Activatable for ViewKey {
    fn is_activated(&self) -> bool {
        match self {
            ViewKey::Expression { .. } => true,
            ViewKey::Column { is_activated, .. } => *is_activated,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct HanaView {
    pub name: String,
    pub schema_name: Option<String>,
    pub keys: Vec<ViewKey>,
    /// Replaces the select derived from `keys` when present.
    pub select_statement: Option<String>,
    pub or_replace: bool,
    pub view_properties: Option<String>,
    pub comment: Option<String>,
    pub is_activated: bool,
}

impl HanaView {
    pub fn new(name: &str) -> Self {
        HanaView {
            name: name.to_string(),
            is_activated: true,
            ..Default::default()
        }
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(self.schema_name.as_deref(), &self.name)
    }

    /// Source tables of the column keys, deduplicated in first-seen order.
    pub fn get_source_tables(&self) -> Vec<String> {
        self.keys.iter().filter_map(ViewKey::source_table).unique().collect()
    }

    pub fn get_create_statement(&self) -> String {
        let view_name = self.qualified_name();

        let (select_statement, has_query) = match non_blank(self.select_statement.as_deref()) {
            Some(select) => (indent_with_tab(select.trim_end_matches(';').trim_end()), true),
            None => {
                let tables = self.get_source_tables();
                if tables.is_empty() {
                    warn!(view = %view_name, "View has no select statement and no source table; it is emitted commented out");
                }
                (self.get_derived_select(&tables), !tables.is_empty())
            }
        };

        let view_properties =
            non_blank(self.view_properties.as_deref()).map(|p| format!("\n\t{}", indent_with_tab(p)));

        let mut sql = CreateViewTemplate {
            or_replace: self.or_replace.then_some(" OR REPLACE").into(),
            name: view_name.as_str().into(),
            view_properties: view_properties.into(),
            select_statement: select_statement.into(),
        }
        .render();

        if let Some(comment) = get_comment_statement(CommentObjectType::View, &view_name, self.comment.as_deref()) {
            sql.push('\n');
            sql.push_str(&comment);
        }

        let is_activated = self.is_activated && has_query && self.has_active_projection();
        comment_if_deactivated(&sql, is_activated, CommentPlacement::Standalone)
    }

    /// A view deriving its select from keys needs at least one active key.
    fn has_active_projection(&self) -> bool {
        non_blank(self.select_statement.as_deref()).is_some()
            || self.keys.is_empty()
            || self.keys.iter().any(|k| k.is_activated())
    }

    fn get_derived_select(&self, tables: &[String]) -> String {
        // Inside an inactive view keys are listed plainly, the whole statement gets commented.
        let lists_plainly = !self.is_activated || !self.has_active_projection();
        let parts = partition(self.keys.iter(), |k| lists_plainly || k.is_activated()).map(ViewKey::get_projection);

        let mut keys = String::from("\n\t\t");
        keys.push_str(&parts.active_items.join(",\n\t\t"));
        for inactive in &parts.inactive_items {
            keys.push_str("\n\t\t");
            keys.push_str(&comment_if_deactivated(inactive, false, CommentPlacement::Standalone));
        }

        ViewSelectTemplate {
            keys: keys.into(),
            table_name: tables.join(", ").into(),
        }
        .render()
    }
}

impl Activatable for HanaView {
    fn is_activated(&self) -> bool {
        self.is_activated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn customer_view() -> HanaView {
        HanaView {
            schema_name: Some("S".to_string()),
            keys: vec![
                ViewKey::column(Some("S"), "CUSTOMERS", "ID"),
                ViewKey::Column {
                    schema_name: Some("S".to_string()),
                    table_name: "CUSTOMERS".to_string(),
                    name: "NAME".to_string(),
                    alias: Some("CUSTOMER_NAME".to_string()),
                    is_activated: true,
                },
                ViewKey::column(Some("S"), "ORDERS", "TOTAL"),
            ],
            ..HanaView::new("V_CUSTOMERS")
        }
    }

    #[test]
    fn derived_select() {
        similar_asserts::assert_eq!(
            customer_view().get_create_statement(),
            indoc! {r#"
                CREATE VIEW "S"."V_CUSTOMERS"
                	AS SELECT
                		"S"."CUSTOMERS"."ID",
                		"S"."CUSTOMERS"."NAME" AS "CUSTOMER_NAME",
                		"S"."ORDERS"."TOTAL"
                	FROM "S"."CUSTOMERS", "S"."ORDERS";"#}
        );
    }

    #[test]
    fn inactive_key_is_a_trailing_comment_line() {
        let mut view = customer_view();
        if let ViewKey::Column { is_activated, .. } = &mut view.keys[1] {
            *is_activated = false;
        }

        similar_asserts::assert_eq!(
            view.get_create_statement(),
            indoc! {r#"
                CREATE VIEW "S"."V_CUSTOMERS"
                	AS SELECT
                		"S"."CUSTOMERS"."ID",
                		"S"."ORDERS"."TOTAL"
                		-- "S"."CUSTOMERS"."NAME" AS "CUSTOMER_NAME"
                	FROM "S"."CUSTOMERS", "S"."ORDERS";"#}
        );
    }

    #[test]
    fn explicit_select_wins() {
        let view = HanaView {
            or_replace: true,
            select_statement: Some("SELECT \"ID\"\nFROM \"S\".\"CUSTOMERS\"\nWHERE \"ACTIVE\" = TRUE;".to_string()),
            comment: Some("Active customers".to_string()),
            ..customer_view()
        };

        similar_asserts::assert_eq!(
            view.get_create_statement(),
            indoc! {r#"
                CREATE OR REPLACE VIEW "S"."V_CUSTOMERS"
                	AS SELECT "ID"
                	FROM "S"."CUSTOMERS"
                	WHERE "ACTIVE" = TRUE;
                COMMENT ON VIEW "S"."V_CUSTOMERS" IS 'Active customers';"#}
        );
    }

    #[test]
    fn source_tables_are_deduplicated_in_order() {
        assert_eq!(
            customer_view().get_source_tables(),
            vec!["\"S\".\"CUSTOMERS\"".to_string(), "\"S\".\"ORDERS\"".to_string()]
        );
    }

    #[test]
    fn view_without_source_is_commented_out() {
        let view = HanaView {
            keys: vec![ViewKey::Expression {
                expression: "1".to_string(),
                alias: Some("ONE".to_string()),
            }],
            ..HanaView::new("V")
        };

        let sql = view.get_create_statement();
        assert!(sql.starts_with("/*\nCREATE VIEW \"V\""));
        assert!(sql.contains("1 AS \"ONE\""));
    }

    #[test]
    fn view_with_only_inactive_keys_is_inactive() {
        let mut view = customer_view();
        for key in &mut view.keys {
            if let ViewKey::Column { is_activated, .. } = key {
                *is_activated = false;
            }
        }

        let sql = view.get_create_statement();
        assert!(sql.starts_with("/*\n"));
        assert_eq!(sql.matches("/*").count(), 1);
        assert!(!sql.contains("--"));
    }
}
