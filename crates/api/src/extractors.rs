//! Request extractors.

use axum::{
    body::Body,
    extract::{FromRequest, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use institute_common::AppError;
use institute_db::entities::user::{self, UserRole};
use tracing::warn;

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// JSON body whose rejections render in the API envelope.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string whose rejections render in the API envelope.
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters whose rejections render in the API envelope.
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Roles allowed through a router.
#[derive(Debug, Clone, Copy)]
pub struct RoleGate {
    roles: &'static [UserRole],
}

impl RoleGate {
    /// Allow only the given roles.
    #[must_use]
    pub const fn new(roles: &'static [UserRole]) -> Self {
        Self { roles }
    }

    /// 401 without a user, 403 for a role outside the gate.
    pub fn check(&self, user: Option<&user::Model>) -> Result<(), AppError> {
        let user = user.ok_or(AppError::Unauthorized)?;
        if self.roles.contains(&user.role) {
            return Ok(());
        }

        warn!(
            user_id = %user.id,
            role = user.role.as_str(),
            "Rejected request from role outside the gate"
        );
        Err(AppError::Forbidden(format!(
            "Role {} may not access this resource",
            user.role.as_str()
        )))
    }
}

/// Middleware enforcing a [`RoleGate`] on every route of a router.
pub async fn require_role(
    State(gate): State<RoleGate>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    gate.check(req.extensions().get::<user::Model>())?;
    Ok(next.run(req).await)
}
