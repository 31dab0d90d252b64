//! REST routes under `/api`

mod messages;
mod tickets;
mod users;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::require_auth;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", public_routes().merge(protected_routes(state.clone())))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users/login", post(users::login))
        .route("/users/register", post(users::register))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    let users = Router::new()
        .route("/users/agents", get(users::agents))
        .route(
            "/users/{id}",
            get(users::get_by_id)
                .put(users::update)
                .delete(users::deactivate),
        );

    let tickets = Router::new()
        .route("/tickets", get(tickets::list_all).post(tickets::create))
        .route("/tickets/unassigned", get(tickets::list_unassigned))
        .route("/tickets/customer/{id}", get(tickets::list_by_customer))
        .route("/tickets/agent/{id}", get(tickets::list_by_agent))
        .route("/tickets/{id}", get(tickets::get_by_id))
        .route("/tickets/{id}/status", patch(tickets::update_status))
        .route("/tickets/{id}/priority", patch(tickets::update_priority))
        .route("/tickets/{id}/assign", patch(tickets::assign))
        .route("/tickets/{id}/unassign", patch(tickets::unassign));

    let messages = Router::new()
        .route("/messages/reply", post(messages::add_reply))
        .route("/messages/note", post(messages::add_note))
        .route("/messages/ticket/{id}", get(messages::list_by_ticket))
        .route("/messages/user/{id}", get(messages::list_by_user))
        .route(
            "/messages/{id}",
            get(messages::get_by_id).delete(messages::delete),
        );

    users
        .merge(tickets)
        .merge(messages)
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
