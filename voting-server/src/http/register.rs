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
pub(crate) struct CreateUser {
    username: String,
    password: String,
}

pub(crate) async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> Result<Json<Value>, ServiceError> {
    let Json(payload) =
        payload.map_err(|rejection| ServiceError::MalformedInput(rejection.body_text()))?;

    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ServiceError::MalformedInput(String::from(
            "Username and password are required",
        )));
    }

    let status = state
        .gateway
        .register(&payload.username, &payload.password)
        .await
        .or(Err(ServiceError::RegistrationFailed))?;

    info!("{} registered", payload.username);
    Ok(Json(
        json!({ "message": "Registration successful", "status": status }),
    ))
}
