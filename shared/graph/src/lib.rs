pub mod executor;
pub mod neo4j_client;

pub use executor::{GraphExecutor, ParamValue, Params};
pub use neo4j_client::Neo4jClient;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Failed to materialize row: {0}")]
    Row(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
