//! Rendering of deactivated model parts as SQL comments.
//!
//! Every renderable unit carries an activation flag. Inactive units are still
//! emitted, but commented out in a way that keeps the surrounding statement valid.

/// Marker for a single-line comment in HANA SQL.
pub const INLINE_COMMENT: &str = "--";

/// Resolves an optional activation flag. Absent means active.
pub fn is_active(flag: Option<bool>) -> bool {
    flag.unwrap_or(true)
}

/// Anything that carries an activation flag.
pub trait Activatable {
    fn is_activated(&self) -> bool;
}

/// Where a possibly commented fragment ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPlacement {
    /// The fragment is a statement or a line of its own.
    Standalone,
    /// The fragment is embedded inside a line that must stay valid.
    PartOfLine,
}

/// Returns `statement` unchanged when active, otherwise commented out.
///
/// Text that is already a comment is never wrapped a second time.
pub fn comment_if_deactivated(statement: &str, is_activated: bool, placement: CommentPlacement) -> String {
    if is_activated || is_commented(statement) {
        return statement.to_string();
    }

    match placement {
        CommentPlacement::PartOfLine => format!("/* {statement} */"),
        CommentPlacement::Standalone if statement.contains('\n') => format!("/*\n{statement} */"),
        CommentPlacement::Standalone => format!("{INLINE_COMMENT} {statement}"),
    }
}

/// Whether the text as a whole is already a single comment.
pub fn is_commented(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    if trimmed.len() >= 4 && trimmed.starts_with("/*") && trimmed.ends_with("*/") {
        // A single block comment, not `/* a */ b /* c */`.
        return trimmed[2..].find("*/") == Some(trimmed.len() - 4);
    }

    trimmed.lines().all(|line| line.trim_start().starts_with(INLINE_COMMENT))
}

/// Active and inactive items, each in original relative order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitioned<T> {
    pub active_items: Vec<T>,
    pub inactive_items: Vec<T>,
}

impl<T> Default for Partitioned<T> {
    fn default() -> Self {
        Self {
            active_items: Vec::new(),
            inactive_items: Vec::new(),
        }
    }
}

impl<T> Partitioned<T> {
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Partitioned<U> {
        Partitioned {
            active_items: self.active_items.into_iter().map(&mut f).collect(),
            inactive_items: self.inactive_items.into_iter().map(f).collect(),
        }
    }
}

/// Stable split of `items` by `is_active_of`.
pub fn partition<T>(items: impl IntoIterator<Item = T>, is_active_of: impl Fn(&T) -> bool) -> Partitioned<T> {
    let (active_items, inactive_items) = items.into_iter().partition(|item| is_active_of(item));
    Partitioned {
        active_items,
        inactive_items,
    }
}

/// True only for a non-empty list where every item is inactive.
pub fn all_deactivated<T: Activatable>(items: &[T]) -> bool {
    !items.is_empty() && items.iter().all(|i| !i.is_activated())
}
