pub mod challenge;
pub mod metrics;
pub mod status;

pub use challenge::{save_result_handler, solve_page_handler};
pub use metrics::metrics_handler;
pub use status::status_handler;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use geetest_relay_domain::model::{DiscordIdError, LinkError};
use geetest_relay_domain::storage::StorageError;

use crate::pages;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown game `{0}`. Supported games: genshin, honkai3rd, starrail.")]
    UnknownGame(String),
    #[error("The discord_id in the link is not a number. Please return to the bot and generate a new link.")]
    InvalidDiscordId(#[from] DiscordIdError),
    #[error("User does not exist in the database. Please register the user first.")]
    NotRegistered,
    #[error("Incorrect parameters. Please return to the bot and generate a new link.")]
    InvalidLink(#[from] LinkError),
    #[error("The requested page does not exist.")]
    RouteNotFound,
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnknownGame(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidDiscordId(_) => StatusCode::BAD_REQUEST,
            ApiError::NotRegistered => StatusCode::NOT_FOUND,
            ApiError::InvalidLink(_) => StatusCode::NOT_FOUND,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Every handled error reaches the browser as the rendered error page, not
    // a bare status line.
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/html; charset=utf-8")
            .body(pages::error_page(&self.to_string()))
    }
}

/// Default service for unmatched routes; keeps framework-level 404s on the
/// same error page as handler failures.
pub async fn fallback_handler() -> Result<HttpResponse, ApiError> {
    Err(ApiError::RouteNotFound)
}

/// `web::Json` error handler so malformed result bodies also render through
/// the error page instead of actix's bare 400.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    let response = HttpResponse::BadRequest()
        .content_type("text/html; charset=utf-8")
        .body(pages::error_page(&err.to_string()));
    actix_web::error::InternalError::from_response(err, response).into()
}
