use std::fmt::{Debug, Display};
use std::ops::Deref;

/// Generated DDL wrapped so that test assertions compare it without caring about
/// indentation or line breaks. The original text is kept for diff output.
#[repr(transparent)]
#[derive(Default, Eq, Clone)]
pub struct WhitespaceIgnorantString(String);

impl Deref for WhitespaceIgnorantString {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<String> for WhitespaceIgnorantString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WhitespaceIgnorantString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Debug for WhitespaceIgnorantString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

impl Display for WhitespaceIgnorantString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl PartialEq<Self> for WhitespaceIgnorantString {
    fn eq(&self, other: &Self) -> bool {
        self.0.split_whitespace().collect::<String>() == other.0.split_whitespace().collect::<String>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_and_newlines_are_ignored() {
        let s1 = WhitespaceIgnorantString::from("CREATE COLUMN TABLE \"T\"\n(\n\t\"A\" INTEGER\n);");
        let s2 = WhitespaceIgnorantString::from("CREATE COLUMN TABLE \"T\" ( \"A\" INTEGER );");
        assert_eq!(s1, s2);
        assert_eq!(s1.to_string(), "CREATE COLUMN TABLE \"T\"\n(\n\t\"A\" INTEGER\n);");
    }

    #[test]
    fn different_tokens_are_not_equal() {
        let s1 = WhitespaceIgnorantString::from("\"A\" INTEGER");
        let s2 = WhitespaceIgnorantString::from("\"A\" BIGINT");
        assert_ne!(s1, s2);
    }
}
