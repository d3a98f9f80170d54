//! HTTP host - health endpoints and the intercepting fallback

pub mod health;
pub mod proxy;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
