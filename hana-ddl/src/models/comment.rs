use crate::quoting::quote_value_string;
use crate::template::CommentTemplate;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CommentObjectType {
    Table,
    View,
    Column,
    Index,
}

impl CommentObjectType {
    fn keyword(&self) -> &'static str {
        match self {
            CommentObjectType::Table => "TABLE",
            CommentObjectType::View => "VIEW",
            CommentObjectType::Column => "COLUMN",
            CommentObjectType::Index => "INDEX",
        }
    }
}

/// `COMMENT ON <type> <name> IS '<text>';`, or `None` for a blank comment.
pub fn get_comment_statement(object_type: CommentObjectType, object_name: &str, comment: Option<&str>) -> Option<String> {
    let comment = comment.filter(|c| !c.trim().is_empty())?;

    Some(
        CommentTemplate {
            object_type: object_type.keyword().into(),
            object_name: object_name.trim().into(),
            comment: quote_value_string(comment).into(),
        }
        .render(),
    )
}
