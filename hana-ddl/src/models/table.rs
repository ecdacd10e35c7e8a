use crate::activation::{comment_if_deactivated, partition, Activatable, CommentPlacement};
use crate::helpers::{basic_value, indent_with_tab, non_blank, options_by_configs};
use crate::models::check_constraint::CheckConstraint;
use crate::models::column::HanaColumn;
use crate::models::comment::{get_comment_statement, CommentObjectType};
use crate::models::foreign_key::HanaForeignKey;
use crate::models::index::HanaIndex;
use crate::models::key_constraint::KeyConstraint;
use crate::quoting::{qualified_name, Quotable};
use crate::template::CreateTableTemplate;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum StorageMode {
    #[default]
    Column,
    Row,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum TemporaryMode {
    #[default]
    None,
    Local,
    Global,
}

/// Clauses after the table body, rendered in field order when present.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct TableOptions {
    /// Turns the table into `CREATE TABLE ... AS (<select>)`; the column list is then omitted.
    pub select_statement: Option<String>,
    /// `UNDER "<super table>" INHERIT SELECT PRIVILEGES`.
    pub under_super_table: Option<String>,
    pub table_properties: Option<String>,
    pub tablespace: Option<String>,
    /// Qualified name of the table an auxiliary table `STORES` data for.
    pub auxiliary_base_table: Option<String>,
    pub auxiliary_append: Option<String>,
    pub auxiliary_base_column: Option<String>,
    pub auxiliary_part: Option<i64>,
    pub partition_spec: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct HanaTable {
    pub name: String,
    pub schema_name: Option<String>,
    pub columns: Vec<HanaColumn>,
    pub key_constraints: Vec<KeyConstraint>,
    /// Foreign keys rendered inside the table body.
    pub foreign_keys: Vec<HanaForeignKey>,
    pub check_constraints: Vec<CheckConstraint>,
    pub indexes: Vec<HanaIndex>,
    pub storage_mode: StorageMode,
    pub temporary_mode: TemporaryMode,
    pub options: TableOptions,
    pub comment: Option<String>,
    pub if_not_exists: bool,
    pub is_activated: bool,
}

impl HanaTable {
    pub fn new(name: &str) -> Self {
        HanaTable {
            name: name.to_string(),
            is_activated: true,
            ..Default::default()
        }
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(self.schema_name.as_deref(), &self.name)
    }

    /// The `CREATE TABLE` statement followed by its `COMMENT ON` statements.
    /// An inactive table is commented out as a whole.
    pub fn get_create_statement(&self) -> String {
        let mut sql = CreateTableTemplate {
            table_type: self.get_table_type().into(),
            if_not_exists: self.if_not_exists.then_some(" IF NOT EXISTS").into(),
            name: self.qualified_name().into(),
            table_props: self.get_table_props().into(),
            table_options: self.get_table_options().into(),
        }
        .render();

        for comment in self.get_comment_statements() {
            sql.push('\n');
            sql.push_str(&comment);
        }

        comment_if_deactivated(&sql, self.is_activated, CommentPlacement::Standalone)
    }

    /// One statement per index, commented out when the index or this table is inactive.
    pub fn get_index_statements(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|index| {
                let mut sql = index.get_create_statement(self.schema_name.as_deref(), &self.name);

                let index_name = non_blank(index.name.as_deref())
                    .map(|name| qualified_name(self.schema_name.as_deref(), name));
                if let Some(comment) = index_name.and_then(|name| {
                    get_comment_statement(CommentObjectType::Index, &name, index.comment.as_deref())
                }) {
                    sql.push('\n');
                    sql.push_str(&comment);
                }

                comment_if_deactivated(
                    &sql,
                    self.is_activated && index.is_activated(),
                    CommentPlacement::Standalone,
                )
            })
            .collect()
    }

    fn get_table_type(&self) -> String {
        match (self.temporary_mode, self.storage_mode) {
            (TemporaryMode::Global, _) => " GLOBAL TEMPORARY".to_string(),
            (TemporaryMode::Local, _) => " LOCAL TEMPORARY".to_string(),
            (TemporaryMode::None, StorageMode::Row) => " ROW".to_string(),
            (TemporaryMode::None, StorageMode::Column) => " COLUMN".to_string(),
        }
    }

    /// The parenthesized body: columns, keys, checks and foreign keys.
    ///
    /// Active items are joined with commas. Inside an active table, inactive columns
    /// follow as `--` lines and inactive constraints as one trailing block comment,
    /// so the active list stays valid. Inside an inactive table everything is plain,
    /// since the whole statement gets commented once.
    fn get_table_props(&self) -> String {
        if non_blank(self.options.select_statement.as_deref()).is_some() {
            return String::new();
        }

        let is_parent_activated = self.is_activated;
        let visible = |is_activated: bool| !is_parent_activated || is_activated;

        let columns = partition(self.columns.iter(), |c| visible(c.is_activated()))
            .map(HanaColumn::get_definition);
        let keys = partition(self.key_constraints.iter(), |k| visible(k.is_activated()))
            .map(|k| k.get_constraint_clause(is_parent_activated));
        let foreign_keys = partition(self.foreign_keys.iter(), |fk| visible(fk.is_activated()))
            .map(HanaForeignKey::get_constraint_clause);

        let active_items: Vec<String> = columns
            .active_items
            .into_iter()
            .chain(keys.active_items)
            .chain(self.check_constraints.iter().map(CheckConstraint::get_constraint_clause))
            .chain(foreign_keys.active_items)
            .collect();

        let mut body = active_items.join(",\n\t");

        for column in &columns.inactive_items {
            if !body.is_empty() {
                body.push_str("\n\t");
            }
            body.push_str(&comment_if_deactivated(column, false, CommentPlacement::Standalone));
        }

        let inactive_constraints: Vec<String> = keys
            .inactive_items
            .into_iter()
            .chain(foreign_keys.inactive_items)
            .collect();
        if !inactive_constraints.is_empty() {
            if !body.is_empty() {
                body.push_str("\n\t");
            }
            body.push_str(&comment_if_deactivated(
                &inactive_constraints.join(",\n\t"),
                false,
                CommentPlacement::PartOfLine,
            ));
        }

        if body.is_empty() {
            return String::new();
        }

        format!("\n(\n\t{body}\n)")
    }

    fn get_table_options(&self) -> String {
        let select = non_blank(self.options.select_statement.as_deref()).map(|select| {
            let select = select.trim_end_matches(';').trim_end();
            format!("AS (\n\t{}\n)", indent_with_tab(select))
        });

        let options = &self.options;
        let quoted = |name: &Option<String>| non_blank(name.as_deref()).map(|n| n.quote());

        options_by_configs([
            select,
            basic_value(
                "UNDER",
                quoted(&options.under_super_table).as_deref(),
                "INHERIT SELECT PRIVILEGES",
            ),
            basic_value("", options.table_properties.as_deref(), ""),
            basic_value("IN", options.tablespace.as_deref(), ""),
            basic_value("STORES", options.auxiliary_base_table.as_deref(), ""),
            basic_value(
                "APPEND",
                options.auxiliary_append.as_deref().map(str::to_uppercase).as_deref(),
                "",
            ),
            basic_value("COLUMN", quoted(&options.auxiliary_base_column).as_deref(), ""),
            basic_value("PART", options.auxiliary_part.map(|p| p.to_string()).as_deref(), ""),
            basic_value("", options.partition_spec.as_deref(), ""),
        ])
    }

    fn get_comment_statements(&self) -> Vec<String> {
        let table_name = self.qualified_name();
        let mut statements: Vec<String> =
            get_comment_statement(CommentObjectType::Table, &table_name, self.comment.as_deref())
                .into_iter()
                .collect();

        for column in &self.columns {
            let column_name = format!("{}.{}", table_name, column.name.quote());
            if let Some(comment) = get_comment_statement(CommentObjectType::Column, &column_name, column.get_comment()) {
                // Inside an inactive table the whole block gets commented instead.
                let is_activated = column.is_activated || !self.is_activated;
                statements.push(comment_if_deactivated(&comment, is_activated, CommentPlacement::Standalone));
            }
        }

        statements
    }
}

impl Activatable for HanaTable {
    fn is_activated(&self) -> bool {
        self.is_activated
    }
}
