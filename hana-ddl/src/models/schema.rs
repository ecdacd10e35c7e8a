use crate::activation::{comment_if_deactivated, CommentPlacement};
use crate::quoting::Quotable;
use crate::template::CreateSchemaTemplate;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HanaSchema {
    pub name: String,
    pub is_activated: bool,
}

impl HanaSchema {
    pub fn new(name: &str) -> Self {
        HanaSchema {
            name: name.to_string(),
            is_activated: true,
        }
    }

    pub fn get_create_statement(&self) -> String {
        let statement = CreateSchemaTemplate {
            schema_name: self.name.quote().into(),
        }
        .render();

        comment_if_deactivated(&statement, self.is_activated, CommentPlacement::Standalone)
    }
}
