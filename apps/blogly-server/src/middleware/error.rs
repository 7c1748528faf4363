//! Error handling - HTML error pages.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};
use blogly_shared::ErrorResponse;
use std::fmt;

const ERROR_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{{ status }} {{ title }} - Blogly</title></head>
<body>
  <h1>{{ status }} {{ title }}</h1>
  {% if detail %}<p>{{ detail }}</p>{% endif %}
  <p><a href="/users">Back to users</a></p>
</body>
</html>
"#;

/// Application-level error type rendered as an HTML page.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(render_error_page(&error))
    }
}

fn render_error_page(error: &ErrorResponse) -> String {
    tera::Context::from_serialize(error)
        .and_then(|ctx| tera::Tera::one_off(ERROR_PAGE, &ctx, true))
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to render error page");
            format!("{} {}", error.status, error.title)
        })
}

impl From<blogly_core::error::DomainError> for AppError {
    fn from(err: blogly_core::error::DomainError) -> Self {
        match err {
            blogly_core::error::DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            blogly_core::error::DomainError::Repo(err) => err.into(),
        }
    }
}

impl From<blogly_core::error::RepoError> for AppError {
    fn from(err: blogly_core::error::RepoError) -> Self {
        match err {
            blogly_core::error::RepoError::NotFound => {
                AppError::NotFound("Resource not found".to_string())
            }
            blogly_core::error::RepoError::Constraint(msg) => {
                tracing::error!("Constraint violation: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            blogly_core::error::RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            blogly_core::error::RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<blogly_shared::dto::FormError> for AppError {
    fn from(err: blogly_shared::dto::FormError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        AppError::Internal(format!("template rendering failed: {err:?}"))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
