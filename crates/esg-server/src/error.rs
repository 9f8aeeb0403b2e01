use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use esg_core::EsgError;
use serde_json::json;

/// Maps the error taxonomy onto HTTP: validation failures are the client's
/// problem, everything else is ours.
#[derive(Debug)]
pub struct ApiError(pub EsgError);

impl From<EsgError> for ApiError {
    fn from(e: EsgError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            EsgError::Validation { field, message } => {
                tracing::info!(target: "esg_server", %field, %message, "rejected request");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": message, "field": field })),
                )
                    .into_response()
            }
            other => {
                tracing::error!(target: "esg_server", error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": other.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_bad_request() {
        let resp = ApiError(EsgError::validation("scope1_tco2e", "must be a number")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_is_server_error() {
        let resp = ApiError(EsgError::Storage("disk full".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
