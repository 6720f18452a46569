use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failure taxonomy shared by every marketplace component.
///
/// Each variant is a stable kind: callers branch on the kind, the HTTP
/// boundary maps it to a status code, and no kind is ever retried
/// internally. A rejected operation leaves no partial writes behind.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("invalid email or password")]
    InvalidCredential,
    #[error("not permitted: {0}")]
    Unauthorized(&'static str),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("already applied to this job")]
    DuplicateApplication,
    #[error("application is no longer pending")]
    InvalidTransition,
    #[error("application deadline has passed")]
    DeadlinePassed,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl MarketplaceError {
    /// Stable machine-readable kind rendered alongside the human message.
    pub const fn kind(&self) -> &'static str {
        match self {
            MarketplaceError::InvalidCredential => "invalid_credential",
            MarketplaceError::Unauthorized(_) => "unauthorized",
            MarketplaceError::Validation(_) => "validation_error",
            MarketplaceError::NotFound { .. } => "not_found",
            MarketplaceError::DuplicateApplication => "duplicate_application",
            MarketplaceError::InvalidTransition => "invalid_transition",
            MarketplaceError::DeadlinePassed => "deadline_passed",
            MarketplaceError::Repository(_) => "repository_error",
        }
    }

    const fn status_code(&self) -> StatusCode {
        match self {
            MarketplaceError::InvalidCredential => StatusCode::UNAUTHORIZED,
            MarketplaceError::Unauthorized(_) => StatusCode::FORBIDDEN,
            MarketplaceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MarketplaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            MarketplaceError::DuplicateApplication
            | MarketplaceError::InvalidTransition
            | MarketplaceError::DeadlinePassed => StatusCode::CONFLICT,
            MarketplaceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (self.status_code(), body).into_response()
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
