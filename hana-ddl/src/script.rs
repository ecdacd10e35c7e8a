use std::iter::Peekable;
use std::str::Chars;

use tracing::{debug, instrument};

use crate::activation::{comment_if_deactivated, Activatable, CommentPlacement};
use crate::model_reader::{read_model, read_view, HanaModel};
use crate::models::HanaForeignKey;
use crate::Result;

/// Where foreign keys between tables end up in the script.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum ForeignKeyPlacement {
    /// One `ALTER TABLE ... ADD FOREIGN KEY` statement per relationship, after all tables and views.
    #[default]
    AlterStatements,
    /// As a constraint clause inside the child table's `CREATE TABLE`.
    Inline,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScriptOptions {
    pub foreign_key_placement: ForeignKeyPlacement,
    /// Emit `CREATE INDEX` statements after each table.
    pub include_indexes: bool,
    /// Put between two statements of the script.
    pub statement_separator: String,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            foreign_key_placement: ForeignKeyPlacement::AlterStatements,
            include_indexes: true,
            statement_separator: "\n\n".to_string(),
        }
    }
}

/// The whole script for a model: schema, tables with their indexes, views, then relationships.
#[instrument(skip_all)]
pub fn generate_script(model: &HanaModel, options: &ScriptOptions) -> String {
    let mut statements = Vec::new();

    if let Some(schema) = &model.schema {
        statements.push(schema.get_create_statement());
    }

    let inline_foreign_keys = options.foreign_key_placement == ForeignKeyPlacement::Inline;
    let mut placed = vec![false; model.relationships.len()];

    for table in &model.tables {
        debug!(table = %table.name, "Generating table");

        if inline_foreign_keys {
            let mut table = table.clone();
            for (relationship, placed) in model.relationships.iter().zip(placed.iter_mut()) {
                if relationship.child_table == table.name && relationship.child_schema == table.schema_name {
                    table.foreign_keys.push(relationship.clone());
                    *placed = true;
                }
            }
            statements.push(table.get_create_statement());
        } else {
            statements.push(table.get_create_statement());
        }

        if options.include_indexes {
            statements.extend(table.get_index_statements());
        }
    }

    for view in &model.views {
        debug!(view = %view.name, "Generating view");
        statements.push(view.get_create_statement());
    }

    // Relationships whose child table isn't part of the model still need their own statement.
    for (relationship, _) in model.relationships.iter().zip(&placed).filter(|(_, placed)| !**placed) {
        statements.push(get_relationship_statement(relationship));
    }

    statements.join(&options.statement_separator)
}

fn get_relationship_statement(relationship: &HanaForeignKey) -> String {
    comment_if_deactivated(
        &relationship.get_alter_statement(),
        relationship.is_activated(),
        CommentPlacement::Standalone,
    )
}

pub fn generate_script_from_json(json: &str, options: &ScriptOptions) -> Result<String> {
    let model = read_model(json)?;
    Ok(generate_script(&model, options))
}

/// A single view as a standalone fragment. An unnamed view yields an empty script.
pub fn generate_view_script(json: &str, schema_name: Option<&str>) -> Result<String> {
    Ok(read_view(json, schema_name)?
        .map(|view| view.get_create_statement())
        .unwrap_or_default())
}

/// Only the `CREATE SCHEMA` statement of the model's container, empty when it has no name.
pub fn generate_container_script(json: &str) -> Result<String> {
    let model = read_model(json)?;
    Ok(model.schema.map(|schema| schema.get_create_statement()).unwrap_or_default())
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
enum ScanState {
    #[default]
    Code,
    Quoted(char),
    LineComment,
    BlockComment,
}

/// Splits a script into individually executable statements, without their terminating `;`.
///
/// Semicolons inside quoted strings, quoted identifiers and comments don't end a statement.
/// Quotes are escaped by doubling them. Comments leading a statement are dropped, and so are
/// fragments holding nothing but comments, so inactive statements never reach the database.
pub fn split_statements(script: &str) -> Vec<String> {
    let mut splitter = StatementSplitter::default();
    let mut chars = script.chars().peekable();

    while let Some(c) = chars.next() {
        splitter.feed(c, &mut chars);
    }
    splitter.finish_statement();

    splitter.statements
}

#[derive(Default)]
struct StatementSplitter {
    statements: Vec<String>,
    current: String,
    has_code: bool,
    state: ScanState,
}

impl StatementSplitter {
    fn feed(&mut self, c: char, rest: &mut Peekable<Chars>) {
        match self.state {
            ScanState::Code => match c {
                ';' => self.finish_statement(),
                '\'' | '"' => {
                    self.push_code(c);
                    self.state = ScanState::Quoted(c);
                }
                '-' if rest.peek() == Some(&'-') => {
                    self.current.push(c);
                    self.take_next(rest);
                    self.state = ScanState::LineComment;
                }
                '/' if rest.peek() == Some(&'*') => {
                    self.current.push(c);
                    self.take_next(rest);
                    self.state = ScanState::BlockComment;
                }
                c if c.is_whitespace() => self.current.push(c),
                c => self.push_code(c),
            },
            ScanState::Quoted(quote) => {
                self.current.push(c);
                if c == quote {
                    if rest.peek() == Some(&quote) {
                        self.take_next(rest);
                    } else {
                        self.state = ScanState::Code;
                    }
                }
            }
            ScanState::LineComment => {
                self.current.push(c);
                if c == '\n' {
                    self.end_comment();
                }
            }
            ScanState::BlockComment => {
                self.current.push(c);
                if c == '*' && rest.peek() == Some(&'/') {
                    self.take_next(rest);
                    self.end_comment();
                }
            }
        }
    }

    /// Comments before the first token of a statement are not part of it.
    fn end_comment(&mut self) {
        if !self.has_code {
            self.current.clear();
        }
        self.state = ScanState::Code;
    }

    fn push_code(&mut self, c: char) {
        self.has_code = true;
        self.current.push(c);
    }

    fn take_next(&mut self, rest: &mut Peekable<Chars>) {
        if let Some(next) = rest.next() {
            self.current.push(next);
        }
    }

    fn finish_statement(&mut self) {
        let statement = self.current.trim();
        if self.has_code && !statement.is_empty() {
            self.statements.push(statement.to_string());
        }
        self.current.clear();
        self.has_code = false;
    }
}
