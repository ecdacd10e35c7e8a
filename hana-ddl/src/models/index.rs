use itertools::Itertools;

use crate::activation::{all_deactivated, comment_if_deactivated, partition, Activatable, CommentPlacement};
use crate::helpers::{basic_value, non_blank, options_by_configs};
use crate::quoting::{qualified_name, Quotable};
use crate::template::CreateIndexTemplate;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Asc),
            "desc" | "descending" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IndexKey {
    pub name: String,
    pub direction: Option<SortDirection>,
    pub is_activated: bool,
}

impl IndexKey {
    pub fn new(name: &str) -> Self {
        IndexKey {
            name: name.to_string(),
            direction: None,
            is_activated: true,
        }
    }

    fn get_definition(&self) -> String {
        match self.direction {
            Some(direction) => format!("{} {}", self.name.quote(), direction.keyword()),
            None => self.name.quote(),
        }
    }
}

impl Activatable for IndexKey {
    fn is_activated(&self) -> bool {
        self.is_activated
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct HanaIndex {
    pub name: Option<String>,
    /// `UNIQUE`, `BTREE`, `CPBTREE`, ... emitted before `INDEX`.
    pub index_type: Option<String>,
    pub keys: Vec<IndexKey>,
    /// Only rendered for unique indexes.
    pub include_keys: Vec<IndexKey>,
    pub compress: Option<String>,
    pub null_keys: Option<String>,
    pub tablespace: Option<String>,
    pub comment: Option<String>,
    pub is_activated: bool,
}

impl HanaIndex {
    pub fn new(name: &str) -> Self {
        HanaIndex {
            name: Some(name.to_string()),
            is_activated: true,
            ..Default::default()
        }
    }

    pub fn is_unique(&self) -> bool {
        non_blank(self.index_type.as_deref()).is_some_and(|t| t.eq_ignore_ascii_case("UNIQUE"))
    }

    pub fn get_create_statement(&self, schema_name: Option<&str>, table_name: &str) -> String {
        let is_activated = self.is_activated();
        let index_type = non_blank(self.index_type.as_deref()).map(|t| format!(" {}", t.to_uppercase()));
        let index_name = non_blank(self.name.as_deref()).map(|n| format!(" {}", n.quote()));

        let include = if self.is_unique() && !(is_activated && all_deactivated(&self.include_keys)) {
            get_index_keys(&self.include_keys, is_activated).and_then(|keys| basic_value("INCLUDE", Some(keys.as_str()), ""))
        } else {
            None
        };

        let options = options_by_configs([
            get_index_keys(&self.keys, is_activated),
            include,
            basic_value("COMPRESS", self.compress.as_deref().map(str::to_uppercase).as_deref(), ""),
            basic_value("", self.null_keys.as_deref().map(str::to_uppercase).as_deref(), "NULL KEYS"),
            basic_value("IN", self.tablespace.as_deref(), ""),
        ]);

        CreateIndexTemplate {
            index_type: index_type.into(),
            index_name: index_name.into(),
            table_name: qualified_name(schema_name, table_name).into(),
            index_options: options.into(),
        }
        .render()
    }
}

/// An index whose key columns are all inactive is inactive too.
impl Activatable for HanaIndex {
    fn is_activated(&self) -> bool {
        self.is_activated && !all_deactivated(&self.keys)
    }
}

/// Inside an active index, inactive keys are commented out after the active ones.
fn get_index_keys(keys: &[IndexKey], is_activated: bool) -> Option<String> {
    if keys.is_empty() {
        return None;
    }

    if !is_activated {
        return Some(format!("({})", keys.iter().map(IndexKey::get_definition).join(", ")));
    }

    let parts = partition(keys.iter(), |k| k.is_activated).map(IndexKey::get_definition);
    let mut names = parts.active_items.join(", ");
    if !parts.inactive_items.is_empty() {
        if !names.is_empty() {
            names.push(' ');
        }
        names.push_str(&comment_if_deactivated(
            &parts.inactive_items.join(", "),
            false,
            CommentPlacement::PartOfLine,
        ));
    }

    Some(format!("({names})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_index_with_include_and_options() {
        let index = HanaIndex {
            index_type: Some("unique".to_string()),
            keys: vec![IndexKey {
                direction: Some(SortDirection::Asc),
                ..IndexKey::new("A")
            }],
            include_keys: vec![IndexKey::new("B")],
            null_keys: Some("all".to_string()),
            tablespace: Some("TS1".to_string()),
            ..HanaIndex::new("IX_T_A")
        };

        assert_eq!(
            index.get_create_statement(Some("S"), "T"),
            "CREATE UNIQUE INDEX \"IX_T_A\" ON \"S\".\"T\" (\"A\" ASC)\n\tINCLUDE (\"B\")\n\tALL NULL KEYS\n\tIN TS1;"
        );
    }

    #[test]
    fn include_is_ignored_for_non_unique_indexes() {
        let index = HanaIndex {
            index_type: Some("cpbtree".to_string()),
            keys: vec![IndexKey::new("A"), IndexKey::new("B")],
            include_keys: vec![IndexKey::new("C")],
            compress: Some("prefixed".to_string()),
            ..HanaIndex::new("IX")
        };

        assert_eq!(
            index.get_create_statement(None, "T"),
            "CREATE CPBTREE INDEX \"IX\" ON \"T\" (\"A\", \"B\")\n\tCOMPRESS PREFIXED;"
        );
    }

    #[test]
    fn minimal_index() {
        let index = HanaIndex {
            name: None,
            is_activated: true,
            ..Default::default()
        };
        assert_eq!(index.get_create_statement(None, "T"), "CREATE INDEX ON \"T\";");
    }

    #[test]
    fn inactive_keys_are_commented_inside_an_active_index() {
        let index = HanaIndex {
            keys: vec![
                IndexKey::new("A"),
                IndexKey {
                    direction: Some(SortDirection::Desc),
                    is_activated: false,
                    ..IndexKey::new("B")
                },
            ],
            ..HanaIndex::new("IX")
        };

        assert!(index.is_activated());
        assert_eq!(
            index.get_create_statement(None, "T"),
            "CREATE INDEX \"IX\" ON \"T\" (\"A\" /* \"B\" DESC */);"
        );
    }

    #[test]
    fn include_with_only_inactive_keys_is_left_out() {
        let index = HanaIndex {
            index_type: Some("unique".to_string()),
            keys: vec![IndexKey::new("A")],
            include_keys: vec![IndexKey {
                is_activated: false,
                ..IndexKey::new("B")
            }],
            ..HanaIndex::new("IX")
        };

        assert_eq!(index.get_create_statement(None, "T"), "CREATE UNIQUE INDEX \"IX\" ON \"T\" (\"A\");");
    }

    #[test]
    fn index_on_inactive_columns_only_is_inactive() {
        let index = HanaIndex {
            keys: vec![IndexKey {
                is_activated: false,
                ..IndexKey::new("CODE")
            }],
            ..HanaIndex::new("IX")
        };

        assert!(!index.is_activated());
        assert_eq!(index.get_create_statement(None, "T"), "CREATE INDEX \"IX\" ON \"T\" (\"CODE\");");
    }
}
