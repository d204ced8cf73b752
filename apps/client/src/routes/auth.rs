//! Identity provider boundary. Login binds an identity-bound backend
//! connection (enabling every cached query); logout tears it down and drops
//! all cached state.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cache::QueryState;
use crate::errors::AppError;
use crate::models::{Principal, UserProfile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub principal: Principal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub identity: Principal,
    pub profile: Option<UserProfile>,
    /// True on first login: the profile setup step has not run yet.
    pub needs_setup: bool,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if req.principal.as_str().trim().is_empty() {
        return Err(AppError::Validation("principal is required".to_string()));
    }

    let service = state.connector.connect(&req.principal);
    state.data.connect(req.principal.clone(), service);

    let profile = match state.data.caller_user_profile().await {
        QueryState::Ready(profile) => profile,
        QueryState::Failed(err) => return Err(AppError::Backend(err.message)),
        // The connection was just established, so the query cannot be
        // disabled; treat it as an absent profile anyway.
        QueryState::Pending => None,
    };

    let needs_setup = profile.is_none();
    Ok(Json(LoginResponse {
        identity: req.principal,
        profile,
        needs_setup,
    }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(State(state): State<AppState>) -> Json<Value> {
    state.data.disconnect();
    Json(json!({ "status": "loggedOut" }))
}
