//! Course category management.

use axum::{
    Router,
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, put},
};
use institute_common::AppResult;
use institute_core::CategoryInput;
use institute_db::entities::{category, user::UserRole};

use crate::{
    extractors::{ApiJson, ApiPath, RoleGate, require_role},
    middleware::AppState,
    response::ApiResponse,
};

async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<category::Model>>> {
    Ok(ApiResponse::ok(state.category_service.list().await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> AppResult<ApiResponse<category::Model>> {
    Ok(ApiResponse::created(
        state.category_service.create(input).await?,
    ))
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> AppResult<ApiResponse<category::Model>> {
    Ok(ApiResponse::ok(
        state.category_service.update(&id, input).await?,
    ))
}

async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<()>> {
    state.category_service.delete(&id).await?;
    Ok(ApiResponse::empty())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/categories", get(list).post(create))
        .route("/admin/categories/{id}", put(update).delete(remove))
        .route_layer(from_fn_with_state(
            RoleGate::new(&[UserRole::Admin]),
            require_role,
        ))
}
