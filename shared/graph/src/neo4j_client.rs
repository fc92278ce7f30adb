use crate::executor::{GraphExecutor, ParamValue, Params};
use crate::{GraphError, GraphResult};
use async_trait::async_trait;
use donorgraph_config::Neo4jSettings;
use neo4rs::{query, ConfigBuilder, Graph, Query};
use std::sync::Arc;

/// Neo4j client compatible with both local Neo4j and Neo4j AuraDB.
pub struct Neo4jClient {
    graph: Arc<Graph>,
    uri: String,
}

impl Neo4jClient {
    /// Connect and verify the connection with a round-trip query.
    ///
    /// Supports `bolt://localhost:7687` as well as AuraDB URIs
    /// (`neo4j+s://...`, `neo4j+ssc://...`).
    pub async fn connect(settings: &Neo4jSettings) -> GraphResult<Self> {
        tracing::info!("🔷 Connecting to Neo4j at: {}", settings.uri);

        let config = ConfigBuilder::default()
            .uri(&settings.uri)
            .user(&settings.user)
            .password(&settings.password)
            .db("neo4j")
            .fetch_size(500)
            .max_connections(10)
            .build()
            .map_err(|e| GraphError::Connection(format!("Failed to build Neo4j config: {}", e)))?;

        let graph = Graph::connect(config)
            .await
            .map_err(|e| GraphError::Connection(format!("Failed to connect to Neo4j: {}", e)))?;

        let mut result = graph
            .execute(query("RETURN 1 as test"))
            .await
            .map_err(|e| GraphError::Connection(format!("Connection test failed: {}", e)))?;

        if result
            .next()
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?
            .is_some()
        {
            tracing::info!("✅ Neo4j connection established");
        }

        Ok(Self {
            graph: Arc::new(graph),
            uri: settings.uri.clone(),
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Access the underlying pooled graph for service-specific queries.
    pub fn graph(&self) -> Arc<Graph> {
        Arc::clone(&self.graph)
    }

    fn bind(mut q: Query, params: Params) -> Query {
        for (key, value) in params {
            q = match value {
                ParamValue::Text(s) => q.param(&key, s),
                ParamValue::Integer(i) => q.param(&key, i),
                ParamValue::Float(f) => q.param(&key, f),
                ParamValue::Bool(b) => q.param(&key, b),
                ParamValue::Vector(v) => q.param(&key, v),
            };
        }
        q
    }
}

#[async_trait]
impl GraphExecutor for Neo4jClient {
    /// Run a Cypher query with bound parameters and materialize every record
    /// into a JSON map keyed by the query's return columns.
    ///
    /// Connections are checked out of the driver pool per execution and
    /// returned when the row stream is dropped, on every exit path.
    async fn run(&self, cypher: &str, params: Params) -> GraphResult<Vec<serde_json::Value>> {
        let q = Self::bind(query(cypher), params);

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| GraphError::Query(e.to_string()))?;

        let mut rows = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| GraphError::Query(e.to_string()))?
        {
            let value: serde_json::Value =
                row.to().map_err(|e| GraphError::Row(e.to_string()))?;
            rows.push(value);
        }

        Ok(rows)
    }
}
