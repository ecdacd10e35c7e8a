//! `${name}` placeholder substitution.
//!
//! Templates are filled in a single pass: text produced by a substitution is never
//! scanned again, so data values containing `${...}` are emitted literally.
//! Every statement shape this crate emits is declared with [`define_template!`],
//! which gives each template a record type naming exactly the keys it expects.

use std::borrow::Cow;
use std::collections::HashMap;

/// A value that can be placed into a template.
///
/// `Absent` renders as the empty string. `Integer(0)` renders as `"0"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Renderable {
    #[default]
    Absent,
    Text(String),
    Integer(i64),
}

impl Renderable {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Renderable::Absent => Cow::Borrowed(""),
            Renderable::Text(s) => Cow::Borrowed(s.as_str()),
            Renderable::Integer(i) => Cow::Owned(i.to_string()),
        }
    }
}

impl From<String> for Renderable {
    fn from(value: String) -> Self {
        Renderable::Text(value)
    }
}

impl From<&str> for Renderable {
    fn from(value: &str) -> Self {
        Renderable::Text(value.to_string())
    }
}

impl From<i64> for Renderable {
    fn from(value: i64) -> Self {
        Renderable::Integer(value)
    }
}

impl<T: Into<Renderable>> From<Option<T>> for Renderable {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Fills the placeholders of `template` from a key/value map. Missing keys render empty.
pub fn assemble(template: &str, values: &HashMap<&str, Renderable>) -> String {
    substitute(template, |key| values.get(key).map(Renderable::as_text))
}

/// Lists the placeholder names of a template in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        names.push(&after[..end]);
        rest = &after[end + 1..];
    }
    names
}

pub(crate) fn substitute<'v>(
    template: &str,
    mut lookup: impl FnMut(&str) -> Option<Cow<'v, str>>,
) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };

        output.push_str(&rest[..start]);
        if let Some(value) = lookup(&after[..end]) {
            output.push_str(&value);
        }
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    output
}

/// Declares a template together with the record of keys it is filled from.
macro_rules! define_template {
    ($(#[$meta:meta])* $name:ident = $template:literal { $($field:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone)]
        pub(crate) struct $name {
            $(pub $field: $crate::template::Renderable,)*
        }

        impl $name {
            pub const TEMPLATE: &'static str = $template;

            #[allow(dead_code)]
            pub const KEYS: &'static [&'static str] = &[$(stringify!($field)),*];

            pub fn render(&self) -> String {
                $crate::template::substitute(Self::TEMPLATE, |key| {
                    $(
                        if key == stringify!($field) {
                            return Some(self.$field.as_text());
                        }
                    )*
                    None
                })
            }
        }
    };
}

define_template!(CreateSchemaTemplate = "CREATE SCHEMA ${schema_name};" { schema_name });

define_template!(
    CreateTableTemplate = "CREATE${table_type} TABLE${if_not_exists} ${name}${table_props}${table_options};" {
        table_type,
        if_not_exists,
        name,
        table_props,
        table_options,
    }
);

define_template!(CommentTemplate = "COMMENT ON ${object_type} ${object_name} IS ${comment};" {
    object_type,
    object_name,
    comment,
});

define_template!(ColumnDefinitionTemplate = "${name}${data_type}${default}${constraints}" {
    name,
    data_type,
    default,
    constraints,
});

define_template!(
    CreateForeignKeyTemplate = "ALTER TABLE ${foreign_table} ADD ${name}FOREIGN KEY (${foreign_key}) REFERENCES ${primary_table} (${primary_key})${on_delete};" {
        foreign_table,
        name,
        foreign_key,
        primary_table,
        primary_key,
        on_delete,
    }
);

define_template!(
    ForeignKeyConstraintTemplate = "${name}FOREIGN KEY (${foreign_key}) REFERENCES ${primary_table} (${primary_key})${on_delete}" {
        name,
        foreign_key,
        primary_table,
        primary_key,
        on_delete,
    }
);

define_template!(CheckConstraintTemplate = "${name}CHECK (${expression})" { name, expression });

define_template!(KeyConstraintTemplate = "${constraint_name}${key_type}${columns}${options}" {
    constraint_name,
    key_type,
    columns,
    options,
});

define_template!(
    CreateViewTemplate = "CREATE${or_replace} VIEW ${name}${view_properties}\n\tAS ${select_statement};" {
        or_replace,
        name,
        view_properties,
        select_statement,
    }
);

define_template!(ViewSelectTemplate = "SELECT${keys}\n\tFROM ${table_name}" { keys, table_name });

define_template!(
    CreateIndexTemplate = "CREATE${index_type} INDEX${index_name} ON ${table_name}${index_options};" {
        index_type,
        index_name,
        table_name,
        index_options,
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn fills_placeholders() {
        let values = HashMap::from([("a", Renderable::from("x")), ("b", Renderable::from(0i64))]);
        assert_eq!(assemble("${a}-${b}-${c}", &values), "x-0-");
    }

    #[test]
    fn absent_values_render_empty() {
        let values = HashMap::from([("a", Renderable::Absent), ("b", Renderable::from(None::<String>))]);
        assert_eq!(assemble("[${a}][${b}]", &values), "[][]");
    }

    #[test]
    fn substitution_is_single_pass() {
        let values = HashMap::from([("a", Renderable::from("${b}")), ("b", Renderable::from("nope"))]);
        assert_eq!(assemble("${a}", &values), "${b}");
    }

    #[test]
    fn unterminated_placeholder_is_kept() {
        let values = HashMap::from([("a", Renderable::from("x"))]);
        assert_eq!(assemble("${a} ${b", &values), "x ${b");
    }

    #[test]
    fn typed_template_renders() {
        let rendered = CheckConstraintTemplate {
            name: "CONSTRAINT \"C\" ".into(),
            expression: "\"A\" > 0".into(),
        }
        .render();
        assert_eq!(rendered, "CONSTRAINT \"C\" CHECK (\"A\" > 0)");
    }

    #[test]
    fn every_template_declares_exactly_its_placeholders() {
        fn check(template: &str, keys: &[&str]) {
            let in_template: BTreeSet<&str> = placeholders(template).into_iter().collect();
            let declared: BTreeSet<&str> = keys.iter().copied().collect();
            assert_eq!(in_template, declared, "template: {template}");
        }

        check(CreateSchemaTemplate::TEMPLATE, CreateSchemaTemplate::KEYS);
        check(CreateTableTemplate::TEMPLATE, CreateTableTemplate::KEYS);
        check(CommentTemplate::TEMPLATE, CommentTemplate::KEYS);
        check(ColumnDefinitionTemplate::TEMPLATE, ColumnDefinitionTemplate::KEYS);
        check(CreateForeignKeyTemplate::TEMPLATE, CreateForeignKeyTemplate::KEYS);
        check(ForeignKeyConstraintTemplate::TEMPLATE, ForeignKeyConstraintTemplate::KEYS);
        check(CheckConstraintTemplate::TEMPLATE, CheckConstraintTemplate::KEYS);
        check(KeyConstraintTemplate::TEMPLATE, KeyConstraintTemplate::KEYS);
        check(CreateViewTemplate::TEMPLATE, CreateViewTemplate::KEYS);
        check(ViewSelectTemplate::TEMPLATE, ViewSelectTemplate::KEYS);
        check(CreateIndexTemplate::TEMPLATE, CreateIndexTemplate::KEYS);
    }
}
