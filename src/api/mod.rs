pub mod auth;
pub mod dto;
pub mod health;
pub mod routes;
pub mod tasks;

pub use routes::{admission_pipeline, create_router, AppState};
