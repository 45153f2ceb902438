//! HTTP API endpoints.
//!
//! Thin axum handlers over [`AppState`]; the browser front-end (team pages and
//! the admin dashboard) talks to these.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::protocol::*;
use crate::state::{AppState, ProgressError, StoreError};
use crate::types::*;

/// Errors returned by API handlers, rendered as `{ code, msg }`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{}", INVALID_INPUT_MESSAGE)]
    InvalidInput,

    #[error(transparent)]
    Progress(#[from] ProgressError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput => StatusCode::BAD_REQUEST,
            ApiError::Progress(e) => match e {
                ProgressError::UnknownTeam(_) | ProgressError::UnknownQuiz(_) => {
                    StatusCode::NOT_FOUND
                }
                ProgressError::IncorrectPassphrase => StatusCode::FORBIDDEN,
                ProgressError::NotNextQuiz(_)
                | ProgressError::QuizLocked(_)
                | ProgressError::AlreadyCompleted(_) => StatusCode::CONFLICT,
                ProgressError::InvalidAnswer { .. } => StatusCode::BAD_REQUEST,
            },
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput => "INVALID_INPUT",
            ApiError::Progress(e) => e.code(),
            ApiError::Store(_) => "STORE_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = ErrorResponse {
            code: self.code().to_string(),
            msg: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// All API routes, without static file serving or middleware
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/teams/validate", post(validate_team))
        .route("/api/teams/{team_id}", get(get_team))
        .route("/api/teams/{team_id}/progress", get(team_progress))
        .route(
            "/api/teams/{team_id}/unlock/{quiz_number}",
            post(unlock_quiz),
        )
        .route(
            "/api/teams/{team_id}/answers/{quiz_id}",
            post(submit_answer),
        )
        .route("/api/quizzes/{quiz_id}", get(get_quiz))
        .route("/api/admin/overview", get(admin_overview))
        .route("/api/admin/teams", get(admin_teams))
        .route("/api/admin/quiz-links", get(admin_quiz_links))
}

async fn healthz() -> &'static str {
    "ok"
}

/// POST /api/teams/validate
///
/// Surrounding whitespace is ignored, like the sign-in form always did.
pub async fn validate_team(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ValidateTeamRequest>,
) -> ApiResult<TeamValidation> {
    let result = state.validate_team(req.input.trim()).await?;
    if !result.valid {
        tracing::debug!("Rejected team identifier {:?}", req.input);
        return Err(ApiError::InvalidInput);
    }
    Ok(Json(result))
}

/// GET /api/teams/{team_id}
pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
) -> ApiResult<Team> {
    state
        .get_team_data(&team_id)
        .await
        .map(Json)
        .ok_or_else(|| ProgressError::UnknownTeam(team_id).into())
}

/// GET /api/teams/{team_id}/progress
pub async fn team_progress(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<TeamId>,
) -> ApiResult<TeamProgress> {
    Ok(Json(state.team_progress(&team_id).await?))
}

/// POST /api/teams/{team_id}/unlock/{quiz_number}
///
/// The passphrase is compared as sent; surrounding whitespace does not match.
pub async fn unlock_quiz(
    State(state): State<Arc<AppState>>,
    Path((team_id, quiz_number)): Path<(TeamId, QuizNumber)>,
    Json(req): Json<UnlockRequest>,
) -> ApiResult<UnlockResponse> {
    let status = state
        .attempt_unlock(&team_id, quiz_number, &req.passphrase)
        .await?;
    Ok(Json(UnlockResponse {
        quiz_number,
        status,
    }))
}

/// POST /api/teams/{team_id}/answers/{quiz_id}
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path((team_id, quiz_id)): Path<(TeamId, QuizId)>,
    Json(req): Json<AnswerRequest>,
) -> ApiResult<AnswerOutcome> {
    Ok(Json(
        state
            .submit_answer(&team_id, &quiz_id, req.answer_index)
            .await?,
    ))
}

/// GET /api/quizzes/{quiz_id}
pub async fn get_quiz(
    State(state): State<Arc<AppState>>,
    Path(quiz_id): Path<QuizId>,
) -> ApiResult<QuizView> {
    let quiz = state
        .catalog
        .get_quiz_by_id(&quiz_id)
        .ok_or_else(|| ProgressError::UnknownQuiz(quiz_id.clone()))?;
    Ok(Json(QuizView::new(quiz, state.catalog.len())))
}

/// GET /api/admin/overview
pub async fn admin_overview(State(state): State<Arc<AppState>>) -> Json<AdminOverview> {
    Json(state.admin_overview().await)
}

/// GET /api/admin/teams
pub async fn admin_teams(State(state): State<Arc<AppState>>) -> Json<Vec<Team>> {
    Json(state.get_all_teams().await)
}

/// GET /api/admin/quiz-links
pub async fn admin_quiz_links(State(state): State<Arc<AppState>>) -> Json<Vec<QuizLink>> {
    Json(state.catalog.get_all_quiz_links())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(ApiError::InvalidInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(ProgressError::IncorrectPassphrase).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(ProgressError::UnknownTeam("X".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ProgressError::QuizLocked(3)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::TeamIdExhausted(32)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_input_message() {
        let err = ApiError::InvalidInput;
        assert_eq!(err.code(), "INVALID_INPUT");
        assert!(err.to_string().contains("10-digit mobile number"));
    }
}
