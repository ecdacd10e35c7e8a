mod check_constraint;
mod column;
mod comment;
mod data_type;
mod foreign_key;
mod index;
mod key_constraint;
mod schema;
mod table;
mod view;

pub use check_constraint::*;
pub use column::*;
pub use comment::*;
pub use data_type::*;
pub use foreign_key::*;
pub use index::*;
pub use key_constraint::*;
pub use schema::*;
pub use table::*;
pub use view::*;
