use super::AppState;
use crate::errors::service_error::ServiceError;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use log::info;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize)]
pub(crate) struct Login {
    username: String,
    password: String,
}

pub(crate) async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Login>, JsonRejection>,
) -> Result<Json<Value>, ServiceError> {
    let Json(payload) =
        payload.map_err(|rejection| ServiceError::MalformedInput(rejection.body_text()))?;

    let token = state
        .gateway
        .login(&payload.username, &payload.password)
        .await
        .or(Err(ServiceError::LoginFailed))?;

    info!("{} logged in", payload.username);
    Ok(Json(json!({ "token": token })))
}
