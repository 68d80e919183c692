use super::{AppState, credential};
use crate::{errors::service_error::ServiceError, models::voting_session::VotingSession};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize)]
pub(crate) struct CreateSession {
    name: String,
}

#[derive(Deserialize)]
pub(crate) struct SingleVote {
    id: String,
    vote: bool,
}

#[derive(Deserialize)]
pub(crate) struct Vote {
    vote: bool,
}

fn parse<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| ServiceError::MalformedInput(rejection.body_text()))
}

pub(crate) async fn list_sessions(State(state): State<AppState>) -> Json<Vec<VotingSession>> {
    Json(state.sessions.list_sessions())
}

pub(crate) async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VotingSession>, ServiceError> {
    Ok(Json(state.sessions.get_session(&id).await?))
}

pub(crate) async fn create_session(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<CreateSession>, JsonRejection>,
) -> Result<Json<Value>, ServiceError> {
    let payload = parse(payload)?;
    let session = state
        .sessions
        .create_session(credential(&headers), payload.name)
        .await?;

    Ok(Json(json!({
        "message": "Session created",
        "sessionID": session.id,
        "session": session,
    })))
}

pub(crate) async fn cast_vote(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<SingleVote>, JsonRejection>,
) -> Result<Json<Value>, ServiceError> {
    let payload = parse(payload)?;
    vote(&state, &headers, &payload.id, payload.vote).await
}

pub(crate) async fn cast_vote_on(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Vote>, JsonRejection>,
) -> Result<Json<Value>, ServiceError> {
    let payload = parse(payload)?;
    vote(&state, &headers, &id, payload.vote).await
}

async fn vote(
    state: &AppState,
    headers: &HeaderMap,
    id: &str,
    choice: bool,
) -> Result<Json<Value>, ServiceError> {
    let session = state
        .sessions
        .cast_vote(credential(headers), id, choice)
        .await?;

    Ok(Json(json!({ "message": "vote cast", "session": session })))
}
