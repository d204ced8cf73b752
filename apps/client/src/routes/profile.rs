//! Shared user profile page (the role-selection setup step) and the admin
//! role-assignment endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cache::QueryState;
use crate::errors::AppError;
use crate::models::{Principal, UserProfile, UserRole};
use crate::routes::Page;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePage {
    pub profile: Option<UserProfile>,
    pub needs_setup: bool,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(State(state): State<AppState>) -> Json<Page<ProfilePage>> {
    let profile = state.data.caller_user_profile().await;
    Json(Page::from_state(profile, |profile| ProfilePage {
        needs_setup: profile.is_none(),
        profile,
    }))
}

/// PUT /api/v1/profile — the setup step; saving decides the caller's role
/// once, every later access check reads it back.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<Value>, AppError> {
    state.data.save_caller_user_profile(&profile).await?;
    Ok(Json(json!({ "status": "saved" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub user: Principal,
    pub role: UserRole,
}

/// POST /api/v1/admin/roles
///
/// Admin-gated locally before the remote call; the backend enforces the same
/// check authoritatively.
pub async fn handle_assign_role(
    State(state): State<AppState>,
    Json(req): Json<AssignRoleRequest>,
) -> Result<Json<Value>, AppError> {
    match state.data.caller_user_role().await {
        QueryState::Ready(UserRole::Admin) => {}
        QueryState::Ready(_) => return Err(AppError::Forbidden),
        QueryState::Pending => return Err(AppError::ConnectionNotReady),
        QueryState::Failed(err) => return Err(AppError::Backend(err.message)),
    }
    state.data.assign_caller_user_role(&req.user, req.role).await?;
    Ok(Json(json!({ "status": "assigned" })))
}
