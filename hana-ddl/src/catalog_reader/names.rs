//! Views share one collection list with tables and are told apart by a ` (v)` suffix.

const VIEW_SIGN: &str = " (v)";

pub fn set_view_sign(name: &str) -> String {
    format!("{name}{VIEW_SIGN}")
}

pub fn is_view_name(name: &str) -> bool {
    strip_view_sign(name).is_some()
}

/// The name without its view suffix. Names without one are returned as they are.
pub fn get_view_name(name: &str) -> &str {
    strip_view_sign(name).unwrap_or(name)
}

fn strip_view_sign(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(VIEW_SIGN.len())?;
    if !name.is_char_boundary(split) {
        return None;
    }

    let (base, suffix) = name.split_at(split);
    suffix.eq_ignore_ascii_case(VIEW_SIGN).then_some(base)
}
