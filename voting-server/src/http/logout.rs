use super::{AppState, credential};
use crate::errors::{authorization_error::AuthorizationError, service_error::ServiceError};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use log::info;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize)]
pub(crate) struct Logout {
    username: String,
}

pub(crate) async fn logout(
    headers: HeaderMap,
    State(state): State<AppState>,
    payload: Result<Json<Logout>, JsonRejection>,
) -> Result<Json<Value>, ServiceError> {
    let Json(payload) =
        payload.map_err(|rejection| ServiceError::MalformedInput(rejection.body_text()))?;

    let status = match state
        .gateway
        .log_out(&payload.username, credential(&headers))
        .await
    {
        Ok(status) => status,
        Err(error @ (AuthorizationError::MissingHeader | AuthorizationError::MalformedHeader)) => {
            return Err(error.into());
        }
        Err(_) => return Err(ServiceError::LogoutFailed),
    };

    info!("{} logged out", payload.username);
    Ok(Json(json!({ "token": status })))
}
