pub(crate) trait StringExt {
    fn push_join(&mut self, separator: &str, items: impl IntoIterator<Item = impl AsRef<str>>);
}

impl StringExt for String {
    fn push_join(&mut self, separator: &str, items: impl IntoIterator<Item = impl AsRef<str>>) {
        for (idx, v) in items.into_iter().enumerate() {
            if idx > 0 {
                self.push_str(separator);
            }
            self.push_str(v.as_ref());
        }
    }
}

/// Treats `None`, empty and whitespace-only strings alike.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Prefixes every line of `text` with a tab, then trims the whole block,
/// so the first line lines up with whatever precedes it in a template.
pub(crate) fn indent_with_tab(text: &str) -> String {
    text.lines()
        .map(|line| format!("\t{line}"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Joins `[prefix, value, postfix]`, skipping empty parts. Returns `None` when there is no value.
pub(crate) fn basic_value(prefix: &str, value: Option<&str>, postfix: &str) -> Option<String> {
    let value = non_blank(value)?;

    let mut out = String::new();
    out.push_join(
        " ",
        [prefix.trim(), value, postfix.trim()]
            .into_iter()
            .filter(|p| !p.is_empty()),
    );
    Some(out)
}

/// Joins option clauses with a newline and tab, adding a leading space when anything is present.
pub(crate) fn options_by_configs(values: impl IntoIterator<Item = Option<String>>) -> String {
    let values: Vec<String> = values.into_iter().flatten().collect();
    if values.is_empty() {
        return String::new();
    }

    let mut out = String::from(" ");
    out.push_join("\n\t", values);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_value_skips_missing_parts() {
        assert_eq!(basic_value("COMPRESS", Some(" prefix "), ""), Some("COMPRESS prefix".to_string()));
        assert_eq!(basic_value("", Some("ALL"), "NULL KEYS"), Some("ALL NULL KEYS".to_string()));
        assert_eq!(basic_value("IN", Some("   "), ""), None);
        assert_eq!(basic_value("IN", None, ""), None);
    }

    #[test]
    fn options_are_joined_on_new_lines() {
        assert_eq!(options_by_configs([None, None]), "");
        assert_eq!(
            options_by_configs([Some("A".to_string()), None, Some("B".to_string())]),
            " A\n\tB"
        );
    }

    #[test]
    fn indentation_is_normalized() {
        assert_eq!(indent_with_tab("SELECT *\nFROM t"), "SELECT *\n\tFROM t");
    }
}
