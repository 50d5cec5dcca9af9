//! HTTP layer: routing, shared state, request/response types and handlers.

pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod types;

pub use routes::create_router;
pub use server::start_api_server;
pub use state::AppState;
