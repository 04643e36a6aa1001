//! API endpoints.

mod categories;
pub mod content;
mod dashboard;
pub mod health;
pub mod leads;
mod public;
mod staff;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router, mounted under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(public::router())
        .merge(dashboard::router())
        .merge(staff::router())
        .merge(categories::router())
        .merge(content::routers())
        .merge(leads::routers())
}
