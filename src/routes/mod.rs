mod cors;
mod health;
mod router;

pub use router::create_router;

pub(crate) use crate::state::AppState;
