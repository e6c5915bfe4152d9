use crate::api_types::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kinematics_core::KinematicsError;

/// Wraps [`KinematicsError`] with the HTTP status it maps to.
pub struct ApiError(StatusCode, String);

impl From<KinematicsError> for ApiError {
    fn from(err: KinematicsError) -> Self {
        let status = match &err {
            KinematicsError::Validation(_) => StatusCode::BAD_REQUEST,
            KinematicsError::Capability(_) => StatusCode::BAD_REQUEST,
            KinematicsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError(status, message) = self;
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
