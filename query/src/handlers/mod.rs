pub mod query_handler;

pub use query_handler::{health, process_query};
