//! HTTP routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use lockroom_shared::{ErrorBody, NewSessionResponse, TurnRequest, TurnResponse};

use crate::app::App;
use crate::use_cases::TurnError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/game", post(take_turn))
        .route("/api/game/new", get(new_session))
}

async fn health() -> &'static str {
    "OK"
}

async fn new_session(State(app): State<Arc<App>>) -> Result<Json<NewSessionResponse>, ApiError> {
    let outcome = app.turn.new_session()?;
    Ok(Json(NewSessionResponse {
        state: outcome.state,
        narrative: outcome.narrative,
        state_tag: outcome.state_tag,
    }))
}

async fn take_turn(
    State(app): State<Arc<App>>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let outcome = app
        .turn
        .execute(
            &request.user_input,
            request.state,
            request.state_tag.as_deref(),
        )
        .await?;
    Ok(Json(TurnResponse {
        state: outcome.state,
        narrative: outcome.narrative,
        state_tag: outcome.state_tag,
    }))
}

/// API-level errors.
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    UpstreamFailed(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (axum::http::StatusCode::UNAUTHORIZED, msg),
            ApiError::UpstreamFailed(msg) => (axum::http::StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(_) => (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_string(),
            ),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<TurnError> for ApiError {
    fn from(e: TurnError) -> Self {
        match e {
            TurnError::Validation(msg) => ApiError::BadRequest(msg),
            TurnError::Authentication(e) => ApiError::Unauthorized(e.to_string()),
            TurnError::Collaborator(e) => ApiError::UpstreamFailed(e.to_string()),
            TurnError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::integrity::AuthError;
    use crate::infrastructure::ports::LlmError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn status_of(error: TurnError) -> StatusCode {
        ApiError::from(error).into_response().status()
    }

    #[test]
    fn turn_errors_map_to_expected_status_codes() {
        assert_eq!(
            status_of(TurnError::Validation("empty input".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(TurnError::Authentication(AuthError::TagMismatch)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(TurnError::Collaborator(LlmError::RequestFailed(
                "down".to_string()
            ))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(TurnError::Internal("oops".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_hide_their_detail() {
        let response = ApiError::Internal("connection string".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
