//! HTTP error mapping.
//!
//! Every handler returns `ApiResult`. Domain errors keep their message;
//! storage and internal failures are logged and answered with a generic body.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use tracing::error;

use simshop_core::{ShopError, StorageError};

/// Application-level errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Shop(#[from] ShopError),

    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Background task failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),
}

#[derive(serde::Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl ApiError {
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Blocking(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Shop(err) => match err {
                ShopError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                ShopError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                ShopError::Storage(StorageError::Duplicate { .. }) => {
                    (StatusCode::BAD_REQUEST, "DUPLICATE_KEY")
                }
                ShopError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                ShopError::InvalidTransition { .. } => {
                    (StatusCode::CONFLICT, "INVALID_TRANSITION")
                }
                ShopError::Storage(StorageError::Reference { .. }) => {
                    (StatusCode::CONFLICT, "REFERENCE_CONFLICT")
                }
                ShopError::Unauthenticated => (StatusCode::UNAUTHORIZED, "AUTH_ERROR"),
                ShopError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Shop(ShopError::Storage(StorageError::Duplicate { field })) => {
                format!("Duplicate value for {field}")
            }
            ApiError::Shop(ShopError::Storage(StorageError::Reference { .. })) => {
                "Record is still referenced by other records".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code) = self.classify();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.public_message()
        };
        HttpResponse::build(status).json(ErrorResponse {
            error: message,
            code,
        })
    }
}

/// Result type alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (ShopError::not_found("order", "x"), StatusCode::NOT_FOUND),
            (ShopError::validation("bad"), StatusCode::BAD_REQUEST),
            (
                StorageError::Duplicate {
                    field: "users.email".into(),
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (ShopError::Conflict("stock".into()), StatusCode::CONFLICT),
            (
                StorageError::Reference {
                    message: "FOREIGN KEY constraint failed".into(),
                }
                .into(),
                StatusCode::CONFLICT,
            ),
            (ShopError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ShopError::Forbidden("admin".into()), StatusCode::FORBIDDEN),
            (
                StorageError::Sqlite {
                    message: "disk I/O error".into(),
                }
                .into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[actix_web::test]
    async fn internal_details_stay_out_of_the_body() {
        let err = ApiError::from(ShopError::from(StorageError::Sqlite {
            message: "disk I/O error".into(),
        }));
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert!(!json["error"].as_str().unwrap().contains("disk"));
    }
}
