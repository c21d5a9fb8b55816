//! Request validation
//!
//! Extractors that validate the three request inputs (body, path
//! parameters, query parameters) against a declarative schema
//! (`validator` derive). A rejection short-circuits the route before the
//! handler runs; every violated field is reported, not just the first.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// A single violated field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct FieldViolation {
    pub path: Vec<String>,
    pub message: String,
}

fn collect_violations(errors: &validator::ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors
                .iter()
                .map(|error| FieldViolation {
                    path: vec![field.to_string()],
                    message: error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string),
                })
                .collect::<Vec<_>>()
        })
        .collect();
    // field_errors() iterates a map; sort for a stable violation order
    violations.sort();
    violations
}

/// Fold every violation into one `BadRequest` whose message embeds the
/// serialized violation list.
fn validation_failure(label: &str, errors: &validator::ValidationErrors) -> AppError {
    let violations = collect_violations(errors);
    let serialized =
        serde_json::to_string(&violations).unwrap_or_else(|_| "[]".to_string());
    AppError::BadRequest(format!("{label}: {serialized}"))
}

/// A JSON extractor that also validates the request body
///
/// Use this instead of `Json<T>` when the body carries `validator`
/// constraints.
///
/// # Example
///
/// ```ignore
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct CreateNote {
///     #[validate(length(min = 1, max = 200))]
///     title: String,
/// }
///
/// async fn handler(ValidatedJson(note): ValidatedJson<CreateNote>) {
///     // note is validated
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|err| AppError::BadRequest(format!("Invalid JSON: {err}")))?;

        value
            .validate()
            .map_err(|errors| validation_failure("Validation error", &errors))?;

        Ok(Self(value))
    }
}

/// Path parameter extractor with validation
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|err| AppError::BadRequest(format!("Invalid path parameters: {err}")))?;

        value
            .validate()
            .map_err(|errors| validation_failure("Validation error (params)", &errors))?;

        Ok(Self(value))
    }
}

/// Query parameter extractor with validation
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|err| AppError::BadRequest(format!("Invalid query parameters: {err}")))?;

        value
            .validate()
            .map_err(|errors| validation_failure("Validation error (query)", &errors))?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::StatusCode, routing::get, routing::post};
    use serde::Deserialize;
    use serde_json::Value;
    use tower::ServiceExt;
    use validator::Validate;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct TestBody {
        #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
        message: String,
        #[validate(range(min = 0, max = 10, message = "must be between 0 and 10"))]
        #[serde(default)]
        count: u32,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct TestQuery {
        #[validate(range(min = 1, max = 50, message = "must be between 1 and 50"))]
        limit: u32,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct TestParams {
        #[validate(length(min = 3, message = "must be at least 3 characters"))]
        id: String,
    }

    async fn body_handler(ValidatedJson(body): ValidatedJson<TestBody>) -> String {
        body.message
    }

    async fn query_handler(ValidatedQuery(query): ValidatedQuery<TestQuery>) -> String {
        query.limit.to_string()
    }

    async fn params_handler(ValidatedPath(params): ValidatedPath<TestParams>) -> String {
        params.id
    }

    fn test_app() -> Router {
        Router::new()
            .route("/body", post(body_handler))
            .route("/query", get(query_handler))
            .route("/params/{id}", get(params_handler))
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let response = test_app()
            .oneshot(post_json("/body", r#"{"message": "hello"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_body_is_rejected_with_the_envelope() {
        let response = test_app()
            .oneshot(post_json("/body", r#"{"message": ""}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().starts_with("Validation error:"));
    }

    #[tokio::test]
    async fn every_violation_is_reported() {
        let response = test_app()
            .oneshot(post_json("/body", r#"{"message": "", "count": 99}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        let message = body["message"].as_str().unwrap();

        let serialized = message
            .strip_prefix("Validation error: ")
            .expect("message should embed the violation list");
        let violations: Vec<Value> = serde_json::from_str(serialized).unwrap();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0]["path"][0], "count");
        assert_eq!(violations[1]["path"][0], "message");
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let response = test_app()
            .oneshot(post_json("/body", r#"{"message": not json}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_query_passes() {
        let response = test_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/query?limit=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn out_of_range_query_is_rejected() {
        let response = test_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/query?limit=999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Validation error (query):")
        );
    }

    #[tokio::test]
    async fn undecodable_query_is_rejected() {
        let response = test_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/query?limit=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_path_params_pass() {
        let response = test_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/params/abcdef")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_path_params_are_rejected() {
        let response = test_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/params/ab")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Validation error (params):")
        );
    }

    #[test]
    fn violations_serialize_path_as_a_list() {
        let violation = FieldViolation {
            path: vec!["message".to_string()],
            message: "required".to_string(),
        };
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["path"], serde_json::json!(["message"]));
        assert_eq!(json["message"], "required");
    }
}
