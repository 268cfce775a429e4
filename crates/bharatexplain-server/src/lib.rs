//! BharatExplain HTTP server: topic validation, autocomplete and explanations.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
