//! Web layer for the bus arrival bot.
//!
//! Receives chat webhooks, starts runs in the background, and exposes a
//! health check and an on-demand report for diagnostics.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
