use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{Message, MessageCreate, MessageType};

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

fn post_message(
    state: &AppState,
    caller: CurrentUser,
    req: MessageCreate,
    message_type: MessageType,
) -> AppResult<(StatusCode, Json<Message>)> {
    if req.sender_id != caller.id {
        return Err(AppError::forbidden("Cannot post as another user"));
    }
    let message = state.store()?.add_message(req, message_type)?;
    tracing::debug!(ticket_id = message.ticket_id, kind = message_type.as_str(), "Message added");
    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /api/messages/reply
pub async fn add_reply(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(req): Json<MessageCreate>,
) -> AppResult<(StatusCode, Json<Message>)> {
    post_message(&state, caller, req, MessageType::Reply)
}

/// POST /api/messages/note
pub async fn add_note(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(req): Json<MessageCreate>,
) -> AppResult<(StatusCode, Json<Message>)> {
    post_message(&state, caller, req, MessageType::Note)
}

/// GET /api/messages/ticket/{id}
pub async fn list_by_ticket(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(state.store()?.ticket_messages(id, caller.role)?))
}

/// GET /api/messages/user/{id}
pub async fn list_by_user(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(state.store()?.user_messages(id, caller.role)?))
}

/// GET /api/messages/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Message>> {
    Ok(Json(state.store()?.message(id, caller.role)?))
}

/// DELETE /api/messages/{id}
pub async fn delete(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<&'static str> {
    if !caller.role.can_view_notes() {
        return Err(AppError::forbidden("Only agents can delete notes"));
    }
    state.store()?.delete_message(id)?;
    Ok("Message deleted successfully")
}
