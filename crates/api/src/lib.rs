//! HTTP API layer for the institute backend.
//!
//! - **Endpoints**: public submissions and listings, the admin dashboard,
//!   role-scoped enquiry routers and the content back office
//! - **Extractors**: authentication, role gates, envelope-aware rejections
//! - **Middleware**: session resolution and shared state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::{health::router as health_router, router};
pub use middleware::{AppState, auth_middleware};
