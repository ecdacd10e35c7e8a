use crate::activation::{all_deactivated, comment_if_deactivated, partition, Activatable, CommentPlacement};
use crate::helpers::non_blank;
use crate::models::key_constraint::KeyColumn;
use crate::quoting::{qualified_name, Quotable};
use crate::template::{CreateForeignKeyTemplate, ForeignKeyConstraintTemplate};

/// A relationship between a child table and the parent table it references.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct HanaForeignKey {
    pub name: Option<String>,
    pub child_schema: Option<String>,
    pub child_table: String,
    pub child_columns: Vec<KeyColumn>,
    pub parent_schema: Option<String>,
    pub parent_table: String,
    pub parent_columns: Vec<KeyColumn>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
    pub parent_activated: bool,
    pub child_activated: bool,
}

impl HanaForeignKey {
    pub fn new(child_table: &str, parent_table: &str) -> Self {
        HanaForeignKey {
            child_table: child_table.to_string(),
            parent_table: parent_table.to_string(),
            parent_activated: true,
            child_activated: true,
            ..Default::default()
        }
    }

    /// `ALTER TABLE <child> ADD [CONSTRAINT "name"] FOREIGN KEY (...) REFERENCES <parent> (...)`.
    pub fn get_alter_statement(&self) -> String {
        let is_activated = self.is_activated();

        CreateForeignKeyTemplate {
            foreign_table: qualified_name(self.child_schema.as_deref(), &self.child_table).into(),
            name: self.get_constraint_name().into(),
            foreign_key: get_key_names(&self.child_columns, is_activated).into(),
            primary_table: qualified_name(self.parent_schema.as_deref(), &self.parent_table).into(),
            primary_key: get_key_names(&self.parent_columns, is_activated).into(),
            on_delete: self.get_referential_actions().into(),
        }
        .render()
    }

    /// The clause form used inside `CREATE TABLE`.
    pub fn get_constraint_clause(&self) -> String {
        let is_activated = self.is_activated();

        ForeignKeyConstraintTemplate {
            name: self.get_constraint_name().into(),
            foreign_key: get_key_names(&self.child_columns, is_activated).into(),
            primary_table: qualified_name(self.parent_schema.as_deref(), &self.parent_table).into(),
            primary_key: get_key_names(&self.parent_columns, is_activated).into(),
            on_delete: self.get_referential_actions().into(),
        }
        .render()
    }

    fn get_constraint_name(&self) -> Option<String> {
        non_blank(self.name.as_deref()).map(|name| format!("CONSTRAINT {} ", name.quote()))
    }

    fn get_referential_actions(&self) -> String {
        let mut sql = String::new();
        if let Some(rule) = non_default_rule(self.on_delete.as_deref()) {
            sql.push_str(" ON DELETE ");
            sql.push_str(rule);
        }
        if let Some(rule) = non_default_rule(self.on_update.as_deref()) {
            sql.push_str(" ON UPDATE ");
            sql.push_str(rule);
        }
        sql
    }
}

impl Activatable for HanaForeignKey {
    fn is_activated(&self) -> bool {
        !all_deactivated(&self.parent_columns)
            && !all_deactivated(&self.child_columns)
            && self.parent_activated
            && self.child_activated
    }
}

/// `RESTRICT` is what HANA does without a rule, so it is left out.
fn non_default_rule(rule: Option<&str>) -> Option<&str> {
    non_blank(rule).filter(|r| !r.eq_ignore_ascii_case("RESTRICT"))
}

/// An active key lists its active columns and comments out the rest.
/// An inactive key lists every column plainly, as the whole statement gets commented.
fn get_key_names(columns: &[KeyColumn], is_activated: bool) -> String {
    if !is_activated {
        return columns.iter().map(|c| c.name.trim().quote()).collect::<Vec<_>>().join(", ");
    }

    let parts = partition(columns.iter(), |c| c.is_activated).map(|c| c.name.trim().quote());
    let mut names = parts.active_items.join(", ");
    if !parts.inactive_items.is_empty() {
        names.push(' ');
        names.push_str(&comment_if_deactivated(
            &parts.inactive_items.join(", "),
            false,
            CommentPlacement::PartOfLine,
        ));
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders_to_customers() -> HanaForeignKey {
        HanaForeignKey {
            name: Some("FK_ORDER_CUSTOMER".to_string()),
            child_schema: Some("SALES".to_string()),
            child_columns: vec![KeyColumn::new("CUSTOMER_ID")],
            parent_schema: Some("SALES".to_string()),
            parent_columns: vec![KeyColumn::new("ID")],
            on_delete: Some("CASCADE".to_string()),
            ..HanaForeignKey::new("ORDERS", "CUSTOMERS")
        }
    }

    #[test]
    fn alter_statement() {
        let fk = orders_to_customers();
        assert!(fk.is_activated());
        assert_eq!(
            fk.get_alter_statement(),
            "ALTER TABLE \"SALES\".\"ORDERS\" ADD CONSTRAINT \"FK_ORDER_CUSTOMER\" FOREIGN KEY (\"CUSTOMER_ID\") REFERENCES \"SALES\".\"CUSTOMERS\" (\"ID\") ON DELETE CASCADE;"
        );
    }

    #[test]
    fn constraint_clause_without_name_or_schema() {
        let fk = HanaForeignKey {
            child_columns: vec![KeyColumn::new("A")],
            parent_columns: vec![KeyColumn::new("B")],
            on_update: Some("restrict".to_string()),
            ..HanaForeignKey::new("C", "P")
        };
        assert_eq!(fk.get_constraint_clause(), "FOREIGN KEY (\"A\") REFERENCES \"P\" (\"B\")");
    }

    #[test]
    fn partially_inactive_columns_are_commented_inline() {
        let fk = HanaForeignKey {
            child_columns: vec![KeyColumn::new("A"), KeyColumn::inactive("B")],
            parent_columns: vec![KeyColumn::new("X"), KeyColumn::inactive("Y")],
            ..HanaForeignKey::new("C", "P")
        };
        assert!(fk.is_activated());
        assert_eq!(
            fk.get_constraint_clause(),
            "FOREIGN KEY (\"A\" /* \"B\" */) REFERENCES \"P\" (\"X\" /* \"Y\" */)"
        );
    }

    #[test]
    fn inactive_parent_table_lists_all_names_plainly() {
        let fk = HanaForeignKey {
            parent_activated: false,
            child_columns: vec![KeyColumn::new("A"), KeyColumn::inactive("B")],
            parent_columns: vec![KeyColumn::new("X"), KeyColumn::new("Y")],
            ..HanaForeignKey::new("C", "P")
        };
        assert!(!fk.is_activated());

        let statement = fk.get_alter_statement();
        assert_eq!(
            statement,
            "ALTER TABLE \"C\" ADD FOREIGN KEY (\"A\", \"B\") REFERENCES \"P\" (\"X\", \"Y\");"
        );
        assert!(!statement.contains("/*"));
    }

    #[test]
    fn all_child_columns_inactive_deactivates_the_key() {
        let fk = HanaForeignKey {
            child_columns: vec![KeyColumn::inactive("A")],
            parent_columns: vec![KeyColumn::new("X")],
            ..HanaForeignKey::new("C", "P")
        };
        assert!(!fk.is_activated());
    }
}
