use crate::errors::{QueryError, QueryResult};
use lazy_static::lazy_static;
use regex::Regex;

/// Function identifiers the model still emits from older GDS releases,
/// mapped to their current names.
const DEPRECATED_FUNCTIONS: &[(&str, &str)] = &[
    ("gds.alpha.similarity.cosine", "gds.similarity.cosine"),
    ("gds.alpha.pageRank", "gds.pageRank"),
];

/// Replace deprecated function names with their current equivalents.
///
/// Idempotent: no replacement target contains a deprecated name, so applying
/// twice yields the same text as applying once.
pub fn sanitize(cypher: &str) -> String {
    DEPRECATED_FUNCTIONS
        .iter()
        .fold(cypher.to_string(), |text, (old, new)| text.replace(old, new))
}

lazy_static! {
    static ref READ_START: Regex =
        Regex::new(r"(?i)^\s*(MATCH|OPTIONAL\s+MATCH|WITH|RETURN|UNWIND|CALL|SHOW)\b").unwrap();
    static ref WRITE_CLAUSE: Regex = Regex::new(
        r"(?i)\b(CREATE|MERGE|DELETE|DETACH|SET|REMOVE|DROP|FOREACH)\b|(?i)\bLOAD\s+CSV\b"
    )
    .unwrap();
    static ref WRITE_PROCEDURE: Regex = Regex::new(r"(?i)\.(write|mutate)\s*\(").unwrap();
}

/// Reject synthesized queries that are not plain read queries.
///
/// The model is told to generate read-only Cypher, but its output is
/// untrusted: anything carrying a write clause or a write/mutate procedure
/// call must never reach the store.
pub fn ensure_read_only(cypher: &str) -> QueryResult<()> {
    if !READ_START.is_match(cypher) {
        return Err(QueryError::RejectedQuery(format!(
            "query does not start with a read clause: {}",
            first_line(cypher)
        )));
    }

    if let Some(found) = WRITE_CLAUSE.find(cypher) {
        return Err(QueryError::RejectedQuery(format!(
            "write clause '{}' is not allowed",
            found.as_str()
        )));
    }

    if WRITE_PROCEDURE.is_match(cypher) {
        return Err(QueryError::RejectedQuery(
            "write/mutate procedure calls are not allowed".to_string(),
        ));
    }

    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
