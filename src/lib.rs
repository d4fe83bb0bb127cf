//! Optional CORS settings and the adapter that turns them into a
//! cross-origin filter for axum services.

pub mod config;
pub mod error;
pub mod filter;
pub mod routes;
pub mod server;
pub mod state;
