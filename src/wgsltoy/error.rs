use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// Constant message for failed logins, shared so the response never hints
/// whether the username or the password was wrong.
pub const BAD_LOGIN_MESSAGE: &str = "Either 'username' or 'password' are incorrect.";

/// Closed error taxonomy for the whole service.
///
/// Handlers and the domain modules return these; the single `IntoResponse`
/// impl below is the only place they are translated into HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or policy-violating input.
    #[error("{0}")]
    Validation(String),

    /// Unknown username or wrong password.
    #[error("bad login")]
    BadLogin,

    /// Missing, malformed or invalid credentials, or a write attempted by a
    /// non-owner.
    #[error("unauthorized")]
    Unauthorized,

    /// Absent resource, or a private resource hidden from a non-owner.
    #[error("not found")]
    NotFound,

    /// A stored password record that does not parse or carries a foreign
    /// algorithm or version.
    #[error("malformed password hash record")]
    MalformedHashRecord,

    /// Password derivation failed. Fatal, not retryable.
    #[error("password hashing failed")]
    Hashing,

    /// Token could not be signed, the signing secret is unusable.
    #[error("token signing failed")]
    Signing,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.into())
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    error_class: &'static str,
    caused_by: String,
}

impl ErrorBody {
    fn new(error_class: &'static str, caused_by: impl Into<String>) -> Self {
        Self {
            error_class,
            caused_by: caused_by.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("VALIDATION_FAILURE", message),
            ),
            Self::BadLogin => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("BAD_LOGIN", BAD_LOGIN_MESSAGE),
            ),
            // Credential and token failures share one generic message, the
            // response must not work as an oracle for token or user probing.
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("UNAUTHORIZED", "Authorization is required!"),
            ),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("NOT_FOUND", "Resource not found!"),
            ),
            Self::MalformedHashRecord | Self::Hashing | Self::Signing => {
                error!("Credential infrastructure fault: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("UNKNOWN", "An unexpected error occurred!"),
                )
            }
            Self::Internal(err) => {
                error!("Internal error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("UNKNOWN", "An unexpected error occurred!"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = Error::Validation("Field 'name' is required!".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response = Error::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = Error::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_infrastructure_faults_stay_generic() {
        for err in [Error::MalformedHashRecord, Error::Hashing, Error::Signing] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
