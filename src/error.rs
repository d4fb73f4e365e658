use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("incorrect username or password")]
    InvalidCredentials,

    #[error("username {0:?} is already registered")]
    DuplicateUser(String),

    #[error("{0}")]
    Validation(String),

    #[error("not authenticated")]
    Unauthenticated,

    #[error("todo item {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("blocking task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Incorrect username or password".to_string())
            }
            Error::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Could not validate credentials".to_string())
            }
            Error::DuplicateUser(_) => {
                (StatusCode::BAD_REQUEST, "Username already registered".to_string())
            }
            Error::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message.clone()),
            Error::NotFound(id) => (StatusCode::NOT_FOUND, format!("Todo with ID: {} not found", id)),
            Error::Database(_) | Error::Hashing(_) | Error::Token(_) | Error::Blocking(_) => {
                tracing::error!(error = %self, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let kind = if status.is_server_error() { "error" } else { "fail" };
        let body = json!({ "status": kind, "message": message });
        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_carries_challenge() {
        let response = Error::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            Error::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::DuplicateUser("alice".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Validation("title is required".into())
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(Error::NotFound(7).into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Database(sqlx::Error::RowNotFound).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
