//! Application layer containing business logic and shared state.

pub mod auth;
pub mod service;
pub mod state;

pub use auth::{AuthService, Claims};
pub use service::{AppService, ExternalClients};
pub use state::AppState;
