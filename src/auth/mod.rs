use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub(crate) mod extractors;
pub mod google;
pub mod handlers;
pub mod hashing;
pub mod jwt;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
