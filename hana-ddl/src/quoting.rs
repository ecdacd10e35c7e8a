//! Identifier and literal quoting for SAP HANA.
//!
//! HANA folds unquoted identifiers to upper case, so every identifier this crate
//! emits is double-quoted to keep the modeled spelling.

/// Wraps an identifier in double quotes, doubling any embedded double quote.
pub fn quote_identifier(identifier: impl AsRef<str>) -> String {
    let escaped = identifier.as_ref().replace('"', r#""""#);
    format!("\"{escaped}\"")
}

/// Produces `"schema"."name"` when a non-blank schema is known, otherwise just `"name"`.
pub fn qualified_name(schema: Option<&str>, name: &str) -> String {
    match schema.filter(|s| !s.trim().is_empty()) {
        Some(schema) => format!("{}.{}", quote_identifier(schema), quote_identifier(name)),
        None => quote_identifier(name),
    }
}

/// Wraps a string literal in single quotes, doubling embedded single quotes.
pub fn quote_value_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// A trait for types that can be quoted as a HANA identifier.
pub(crate) trait Quotable {
    fn quote(&self) -> String;
}

impl<S> Quotable for S
where
    S: AsRef<str>,
{
    fn quote(&self) -> String {
        quote_identifier(self)
    }
}
