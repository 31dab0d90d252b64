//! Terminal front end for the support desk
//!
//! Routes, view models and rendering. `main.rs` wires them to a real
//! terminal; the integration tests drive [`App`] directly.

pub mod app;
pub mod logging;
pub mod route;
pub mod ui;
pub mod views;

pub use app::{App, Outcome, SESSION_EXPIRED};
pub use route::Route;
pub use views::View;
