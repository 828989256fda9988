//! User account API endpoints.

use std::collections::HashMap;

use api_types::user::{BalanceResponse, CreateUser, Credentials, UserCreated, Welcome};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

pub async fn authenticate(
    State(state): State<ServerState>,
    Json(payload): Json<Credentials>,
) -> Result<Json<Welcome>, ServerError> {
    let ledger = state.ledger.read().await;
    ledger.authenticate(&payload.username, &payload.pin)?;

    Ok(Json(Welcome {
        message: format!("Welcome, {}!", payload.username),
    }))
}

pub async fn create_user(
    State(state): State<ServerState>,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserCreated>), ServerError> {
    let mut ledger = state.ledger.write().await;
    ledger.create_user(
        &payload.username,
        engine::Profile {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone: payload.phone,
            pin: payload.pin,
        },
    )?;

    Ok((
        StatusCode::CREATED,
        Json(UserCreated {
            message: "User created successfully".to_string(),
            username: payload.username,
        }),
    ))
}

pub async fn balance(
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<Json<BalanceResponse>, ServerError> {
    let balance_cents = state.ledger.read().await.balance(&username)?;

    Ok(Json(BalanceResponse {
        username,
        balance_cents,
    }))
}

/// All users and their current balances.
pub async fn users(State(state): State<ServerState>) -> Json<HashMap<String, i64>> {
    Json(state.ledger.read().await.balances())
}
