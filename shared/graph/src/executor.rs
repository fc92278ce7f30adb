use crate::GraphResult;
use async_trait::async_trait;

/// A parameter bound to a Cypher query.
///
/// The pipeline only ever binds a handful of shapes: the query embedding,
/// scalar filters, and text values. Keeping this enum narrow keeps mock
/// executors trivial to write.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Vector(Vec<f64>),
}

/// Ordered parameter map for a single query execution.
pub type Params = Vec<(String, ParamValue)>;

/// Capability to run a Cypher query and materialize every returned record.
///
/// Each call is an isolated execution against the store: implementations must
/// not share mutable session state across calls.
#[async_trait]
pub trait GraphExecutor: Send + Sync {
    async fn run(&self, cypher: &str, params: Params) -> GraphResult<Vec<serde_json::Value>>;
}
