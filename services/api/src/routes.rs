use crate::infra::{lock_engine, with_engine, AppState, SharedEngine};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use longevity_protocol::error::AppError;
use longevity_protocol::storage::KeyValueStore;
use longevity_protocol::workflows::diagnosis::{question_bank, DiagnosisOutcome, QuizQuestionView};
use longevity_protocol::workflows::protocol::{
    CheckInView, DayAccess, ProtocolDay, ProtocolSummary, TaskStatus,
};
use longevity_protocol::workflows::{DayOpening, ScoreReport};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
pub(crate) struct AnswersRequest {
    pub(crate) answers: Vec<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompleteQuizRequest {
    pub(crate) answers: Vec<u8>,
    #[serde(default)]
    pub(crate) completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompleteQuizResponse {
    pub(crate) outcome: DiagnosisOutcome,
    pub(crate) current_day: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct DayResponse {
    pub(crate) access: DayAccess,
    /// Absent until the diagnosis quiz is done.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) check_in: Option<CheckInView>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskUpdate {
    pub(crate) id: String,
    pub(crate) status: TaskStatus,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SaveDayRequest {
    #[serde(default)]
    pub(crate) tasks: Vec<TaskUpdate>,
    #[serde(default)]
    pub(crate) energy_rating: Option<u8>,
    #[serde(default)]
    pub(crate) mood_rating: Option<u8>,
    /// Move on to the next day after saving.
    #[serde(default, rename = "continue")]
    pub(crate) advance: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveDayResponse {
    pub(crate) day: ProtocolDay,
    pub(crate) current_day: u32,
}

pub(crate) fn protocol_router<S>(engine: SharedEngine<S>) -> Router
where
    S: KeyValueStore + 'static,
{
    Router::new()
        .route("/api/v1/diagnosis/questions", get(questions_endpoint))
        .route(
            "/api/v1/diagnosis/scores",
            axum::routing::post(score_endpoint::<S>),
        )
        .route("/api/v1/diagnosis", axum::routing::post(complete_endpoint::<S>))
        .route(
            "/api/v1/protocol/days/:day",
            get(open_day_endpoint::<S>).put(save_day_endpoint::<S>),
        )
        .route("/api/v1/protocol/summary", get(summary_endpoint::<S>))
        .with_state(engine)
}

pub(crate) fn with_protocol_routes<S>(engine: SharedEngine<S>) -> Router
where
    S: KeyValueStore + 'static,
{
    protocol_router(engine)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn questions_endpoint() -> Json<Vec<QuizQuestionView>> {
    Json(
        question_bank()
            .iter()
            .map(|question| question.to_view())
            .collect(),
    )
}

pub(crate) async fn score_endpoint<S>(
    State(engine): State<SharedEngine<S>>,
    Json(payload): Json<AnswersRequest>,
) -> Result<Json<ScoreReport>, AppError>
where
    S: KeyValueStore + 'static,
{
    let engine = lock_engine(&engine)?;
    Ok(Json(engine.score_only(&payload.answers)))
}

pub(crate) async fn complete_endpoint<S>(
    State(engine): State<SharedEngine<S>>,
    Json(payload): Json<CompleteQuizRequest>,
) -> Result<(StatusCode, Json<CompleteQuizResponse>), AppError>
where
    S: KeyValueStore + 'static,
{
    let CompleteQuizRequest {
        answers,
        completed_at,
    } = payload;

    let response = with_engine(engine, move |engine| {
        let outcome = engine.complete_quiz(answers, completed_at.unwrap_or_else(Utc::now))?;
        Ok(CompleteQuizResponse {
            outcome,
            current_day: engine.current_day(),
        })
    })
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

pub(crate) async fn open_day_endpoint<S>(
    State(engine): State<SharedEngine<S>>,
    Path(day): Path<u32>,
) -> Result<Json<DayResponse>, AppError>
where
    S: KeyValueStore + 'static,
{
    let engine = lock_engine(&engine)?;
    let opening = engine.open_day(day);

    Ok(Json(DayResponse {
        access: opening.access,
        check_in: opening.check_in.as_ref().map(|check_in| check_in.to_view()),
    }))
}

pub(crate) async fn save_day_endpoint<S>(
    State(engine): State<SharedEngine<S>>,
    Path(day): Path<u32>,
    Json(payload): Json<SaveDayRequest>,
) -> Result<Response, AppError>
where
    S: KeyValueStore + 'static,
{
    with_engine(engine, move |engine| {
        let DayOpening { access, check_in } = engine.open_day(day);
        let mut check_in = match check_in {
            Some(check_in) if !access.is_redirect() => check_in,
            _ => return Ok((StatusCode::CONFLICT, Json(access)).into_response()),
        };

        for update in &payload.tasks {
            check_in.set_status(&update.id, update.status)?;
        }
        if let Some(rating) = payload.energy_rating {
            check_in.set_energy(rating);
        }
        if let Some(rating) = payload.mood_rating {
            check_in.set_mood(rating);
        }

        let current_day = if payload.advance {
            engine.save_and_continue(&check_in)?
        } else {
            engine.save_day(&check_in)?;
            engine.current_day()
        };

        Ok(Json(SaveDayResponse {
            day: check_in.to_day(),
            current_day,
        })
        .into_response())
    })
    .await
}

pub(crate) async fn summary_endpoint<S>(
    State(engine): State<SharedEngine<S>>,
) -> Result<Json<ProtocolSummary>, AppError>
where
    S: KeyValueStore + 'static,
{
    let engine = lock_engine(&engine)?;
    Ok(Json(engine.summary()))
}
