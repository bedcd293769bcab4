//! HTTP boundary for drill generation.

pub mod auth;
pub mod handler;
pub mod routes;
pub mod state;

pub use auth::{AuthVerifier, SharedVerifier, SupabaseAuthVerifier, extract_bearer};
pub use handler::{GenerateResponse, process_request};
pub use routes::{GENERATE_PATH, router, serve};
pub use state::{AppState, SharedState};
