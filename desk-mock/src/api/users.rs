use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::client::{AuthResponse, LoginRequest, RegisterRequest};
use shared::models::{User, UserUpdate};

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let (user, generation) = {
        let store = state.store()?;
        (store.authenticate(&req.email, &req.password)?, store.token_generation())
    };
    let token = state.jwt.generate_token(&user, generation)?;
    tracing::info!(user_id = user.id, role = %user.role, "Login successful");
    Ok(Json(AuthResponse { user, token }))
}

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let (user, generation) = {
        let mut store = state.store()?;
        (store.register(req)?, store.token_generation())
    };
    let token = state.jwt.generate_token(&user, generation)?;
    tracing::info!(user_id = user.id, role = %user.role, "User registered");
    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// GET /api/users/{id}
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<User>> {
    Ok(Json(state.store()?.user(id)?))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    if caller.id != id && !caller.role.can_manage_tickets() {
        return Err(AppError::forbidden("Cannot update another user's profile"));
    }
    Ok(Json(state.store()?.update_user(id, req.first_name, req.last_name)?))
}

/// DELETE /api/users/{id}
pub async fn deactivate(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<&'static str> {
    if caller.id != id && !caller.role.can_manage_tickets() {
        return Err(AppError::forbidden("Cannot deactivate another user"));
    }
    state.store()?.deactivate_user(id)?;
    Ok("User deactivated successfully")
}

/// GET /api/users/agents
pub async fn agents(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.store()?.active_agents()))
}
