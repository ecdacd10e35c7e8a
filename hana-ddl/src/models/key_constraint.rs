use crate::activation::{all_deactivated, comment_if_deactivated, partition, Activatable, CommentPlacement};
use crate::helpers::non_blank;
use crate::quoting::Quotable;
use crate::template::KeyConstraintTemplate;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum KeyType {
    #[default]
    PrimaryKey,
    Unique,
}

impl KeyType {
    pub fn keyword(&self) -> &'static str {
        match self {
            KeyType::PrimaryKey => "PRIMARY KEY",
            KeyType::Unique => "UNIQUE",
        }
    }
}

/// Clauses that may follow a primary or unique key, rendered in this field order.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct KeyOptions {
    pub defer_clause: Option<String>,
    pub rely: Option<String>,
    pub index_clause: Option<String>,
    pub validate: Option<String>,
    pub exception_clause: Option<String>,
}

impl KeyOptions {
    /// Each present option prefixed with a space.
    pub fn get_options_string(&self) -> String {
        [
            &self.defer_clause,
            &self.rely,
            &self.index_clause,
            &self.validate,
            &self.exception_clause,
        ]
        .into_iter()
        .filter_map(|o| non_blank(o.as_deref()))
        .map(|o| format!(" {o}"))
        .collect()
    }
}

/// A column referenced from a key, with its activation state at resolution time.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct KeyColumn {
    pub name: String,
    pub is_activated: bool,
}

impl KeyColumn {
    pub fn new(name: &str) -> Self {
        KeyColumn {
            name: name.to_string(),
            is_activated: true,
        }
    }

    pub fn inactive(name: &str) -> Self {
        KeyColumn {
            name: name.to_string(),
            is_activated: false,
        }
    }
}

impl Activatable for KeyColumn {
    fn is_activated(&self) -> bool {
        self.is_activated
    }
}

/// Renders a key column list as ` ("A", "B")`.
///
/// Inside an active parent, inactive columns of a partially active list are
/// appended in a trailing `/* */` comment. Otherwise every column is listed plainly.
pub(crate) fn get_columns_list(columns: &[KeyColumn], is_parent_activated: bool) -> String {
    let quoted = |c: &KeyColumn| c.name.quote();

    if all_deactivated(columns) || !is_parent_activated {
        let names: Vec<String> = columns.iter().map(quoted).collect();
        return format!(" ({})", names.join(", "));
    }

    let parts = partition(columns.iter(), |c| c.is_activated).map(quoted);
    let mut list = parts.active_items.join(", ");
    if !parts.inactive_items.is_empty() {
        list.push(' ');
        list.push_str(&comment_if_deactivated(
            &parts.inactive_items.join(", "),
            false,
            CommentPlacement::PartOfLine,
        ));
    }
    format!(" ({list})")
}

/// A primary or unique key rendered as its own clause in `CREATE TABLE`.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct KeyConstraint {
    pub key_type: KeyType,
    pub constraint_name: Option<String>,
    pub columns: Vec<KeyColumn>,
    pub options: KeyOptions,
}

impl KeyConstraint {
    pub fn new(key_type: KeyType, columns: Vec<KeyColumn>) -> Self {
        KeyConstraint {
            key_type,
            columns,
            ..Default::default()
        }
    }

    pub fn get_constraint_clause(&self, is_parent_activated: bool) -> String {
        let constraint_name = non_blank(self.constraint_name.as_deref())
            .map(|name| format!("CONSTRAINT {} ", name.quote()));

        KeyConstraintTemplate {
            constraint_name: constraint_name.into(),
            key_type: self.key_type.keyword().into(),
            columns: get_columns_list(&self.columns, is_parent_activated).into(),
            options: self.options.get_options_string().into(),
        }
        .render()
    }
}

impl Activatable for KeyConstraint {
    /// A key is only inactive once every one of its columns is.
    fn is_activated(&self) -> bool {
        !all_deactivated(&self.columns)
    }
}

/// The key a column declares on itself, as a trailing column modifier.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub enum InlineKey {
    #[default]
    None,
    PrimaryKey(KeyOptions),
    Unique(KeyOptions),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_composite_key() {
        let key = KeyConstraint {
            constraint_name: Some("PK_T".to_string()),
            ..KeyConstraint::new(KeyType::PrimaryKey, vec![KeyColumn::new("A"), KeyColumn::new("B")])
        };
        assert_eq!(key.get_constraint_clause(true), "CONSTRAINT \"PK_T\" PRIMARY KEY (\"A\", \"B\")");
        assert!(key.is_activated());
    }

    #[test]
    fn partially_inactive_key_comments_the_inactive_columns() {
        let key = KeyConstraint::new(KeyType::Unique, vec![KeyColumn::new("A"), KeyColumn::inactive("B")]);
        assert!(key.is_activated());
        assert_eq!(key.get_constraint_clause(true), "UNIQUE (\"A\" /* \"B\" */)");
        assert_eq!(key.get_constraint_clause(false), "UNIQUE (\"A\", \"B\")");
    }

    #[test]
    fn fully_inactive_key_lists_plainly() {
        let key = KeyConstraint::new(KeyType::Unique, vec![KeyColumn::inactive("A"), KeyColumn::inactive("B")]);
        assert!(!key.is_activated());
        assert_eq!(key.get_constraint_clause(true), "UNIQUE (\"A\", \"B\")");
    }

    #[test]
    fn options_follow_the_columns_in_fixed_order() {
        let key = KeyConstraint {
            options: KeyOptions {
                validate: Some("VALIDATE".to_string()),
                defer_clause: Some("INITIALLY DEFERRED".to_string()),
                rely: Some("  ".to_string()),
                ..Default::default()
            },
            ..KeyConstraint::new(KeyType::PrimaryKey, vec![KeyColumn::new("ID")])
        };
        assert_eq!(
            key.get_constraint_clause(true),
            "PRIMARY KEY (\"ID\") INITIALLY DEFERRED VALIDATE"
        );
    }
}
