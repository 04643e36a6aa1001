//! Staff directory for the assignee picker.

use axum::{Router, extract::State, middleware::from_fn_with_state, routing::get};
use institute_common::AppResult;
use institute_core::StaffQuery;
use institute_db::entities::user::{self, UserRole};

use crate::{
    extractors::{ApiQuery, RoleGate, require_role},
    middleware::AppState,
    response::ApiResponse,
};

async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StaffQuery>,
) -> AppResult<ApiResponse<Vec<user::Model>>> {
    Ok(ApiResponse::ok(state.user_service.list_staff(&query).await?))
}

/// Staff picker, open to the roles that assign enquiries.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/staff", get(list))
        .route_layer(from_fn_with_state(
            RoleGate::new(&[UserRole::Admin, UserRole::Counselor]),
            require_role,
        ))
}
