#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod whitespace_ignorant_string;

mod activation;
mod apply;
mod catalog_reader;
mod connection;
mod error;
mod helpers;
mod model_reader;
mod models;
mod quoting;
mod script;
mod template;

pub use activation::*;
pub use apply::*;
pub use catalog_reader::*;
pub use connection::*;
pub use error::*;
pub use model_reader::{read_model, read_view, HanaModel};
pub use models::*;
pub use quoting::{qualified_name, quote_identifier, quote_value_string};
pub use script::*;
pub use template::{assemble, placeholders, Renderable};
