//! Admin dashboard endpoint.

use axum::{Router, extract::State, middleware::from_fn_with_state, routing::get};
use chrono::{DateTime, Utc};
use institute_common::AppResult;
use institute_core::DashboardData;
use institute_db::entities::user::UserRole;
use serde::Deserialize;

use crate::{
    extractors::{ApiQuery, RoleGate, require_role},
    middleware::AppState,
    response::ApiResponse,
};

/// Snapshot query; `asOf` is RFC 3339.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub as_of: Option<DateTime<Utc>>,
}

async fn snapshot(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DashboardQuery>,
) -> AppResult<ApiResponse<DashboardData>> {
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    Ok(ApiResponse::ok(state.dashboard_service.snapshot(as_of).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(snapshot))
        .route_layer(from_fn_with_state(
            RoleGate::new(&[UserRole::Admin]),
            require_role,
        ))
}
