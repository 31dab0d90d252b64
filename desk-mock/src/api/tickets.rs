use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{PriorityUpdate, StatusUpdate, Ticket, TicketAssign, TicketCreate};

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/tickets
pub async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(req): Json<TicketCreate>,
) -> AppResult<(StatusCode, Json<Ticket>)> {
    if req.customer_id != caller.id {
        return Err(AppError::forbidden("Cannot open a ticket for another user"));
    }
    let ticket = state.store()?.create_ticket(req)?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /api/tickets
pub async fn list_all(State(state): State<AppState>) -> AppResult<Json<Vec<Ticket>>> {
    Ok(Json(state.store()?.all_tickets()?))
}

/// GET /api/tickets/unassigned
pub async fn list_unassigned(State(state): State<AppState>) -> AppResult<Json<Vec<Ticket>>> {
    Ok(Json(state.store()?.unassigned_tickets()?))
}

/// GET /api/tickets/customer/{id}
pub async fn list_by_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Ticket>>> {
    Ok(Json(state.store()?.tickets_by_customer(id)?))
}

/// GET /api/tickets/agent/{id}
pub async fn list_by_agent(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Ticket>>> {
    Ok(Json(state.store()?.tickets_by_agent(id)?))
}

/// GET /api/tickets/{id}
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Ticket>> {
    Ok(Json(state.store()?.ticket(id)?))
}

/// The acting user is always the caller; a body `userId` must match it.
fn acting_user(caller: &CurrentUser, user_id: Option<i64>) -> AppResult<i64> {
    match user_id {
        Some(id) if id != caller.id => Err(AppError::forbidden("Cannot act as another user")),
        _ => Ok(caller.id),
    }
}

/// PATCH /api/tickets/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<StatusUpdate>,
) -> AppResult<Json<Ticket>> {
    let user_id = acting_user(&caller, req.user_id)?;
    let ticket = state.store()?.update_status(id, req.status, user_id)?;
    tracing::info!(ticket_id = id, status = %req.status, user_id, "Status updated");
    Ok(Json(ticket))
}

/// PATCH /api/tickets/{id}/priority
pub async fn update_priority(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<PriorityUpdate>,
) -> AppResult<Json<Ticket>> {
    let user_id = acting_user(&caller, req.user_id)?;
    Ok(Json(state.store()?.update_priority(id, req.priority, user_id)?))
}

/// PATCH /api/tickets/{id}/assign
pub async fn assign(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<TicketAssign>,
) -> AppResult<Json<Ticket>> {
    if !caller.role.can_manage_tickets() {
        return Err(AppError::forbidden("Only agents can assign tickets"));
    }
    Ok(Json(state.store()?.assign(id, req.agent_id)?))
}

/// PATCH /api/tickets/{id}/unassign
pub async fn unassign(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Ticket>> {
    if !caller.role.can_manage_tickets() {
        return Err(AppError::forbidden("Only agents can assign tickets"));
    }
    Ok(Json(state.store()?.unassign(id)?))
}
