use crate::helpers::non_blank;
use crate::quoting::Quotable;
use crate::template::CheckConstraintTemplate;

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct CheckConstraint {
    pub name: Option<String>,
    pub expression: String,
}

impl CheckConstraint {
    pub fn new(name: Option<&str>, expression: &str) -> Self {
        CheckConstraint {
            name: name.map(str::to_string),
            expression: expression.to_string(),
        }
    }

    pub fn get_constraint_clause(&self) -> String {
        let name = non_blank(self.name.as_deref()).map(|name| format!("CONSTRAINT {} ", name.quote()));

        CheckConstraintTemplate {
            name: name.into(),
            expression: strip_outer_parentheses(self.expression.trim()).into(),
        }
        .render()
    }
}

/// Removes one pair of parentheses when the first `(` closes at the final `)`.
fn strip_outer_parentheses(expression: &str) -> &str {
    let Some(inner) = expression.strip_prefix('(').and_then(|e| e.strip_suffix(')')) else {
        return expression;
    };

    let mut depth = 0i32;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    // The opening parenthesis closes before the end.
                    return expression;
                }
            }
            _ => {}
        }
    }

    inner
}
