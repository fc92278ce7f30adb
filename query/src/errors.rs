use actix_web::{error::ResponseError, http::StatusCode, web, HttpResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Classification failed: {0}")]
    Classification(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Query synthesis failed: {0}")]
    Synthesis(String),

    #[error("Query execution failed: {0}")]
    Execution(String),

    #[error("Synthesized query rejected: {0}")]
    RejectedQuery(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ResponseError for QueryError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            QueryError::Unauthorized => StatusCode::UNAUTHORIZED,
            QueryError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            QueryError::RejectedQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Json extractor config routing body deserialization failures through
/// `QueryError`, so malformed payloads get the same `{"error": ...}` shape
/// as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| QueryError::InvalidRequest(err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use donorgraph_models::UserRequest;

    async fn echo(_payload: web::Json<UserRequest>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_malformed_body_yields_json_error() {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .route("/query", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/query")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"query": "projects about"#)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request"));
    }

    #[actix_web::test]
    async fn test_well_formed_body_passes_through() {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .route("/query", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/query")
            .set_json(UserRequest {
                query: "5 random projects".to_string(),
                output_format: "{id, title}".to_string(),
            })
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
