//! Content catalogue endpoints.

use axum::{
    Router,
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, put},
};
use institute_common::AppResult;
use institute_core::{
    BlogForm, ContentForm, ContentService, CourseForm, FacultyForm, FaqForm, PlacementForm,
    TestimonialForm,
};
use institute_db::{content::Visibility, entities::user::UserRole};
use sea_orm::{EntityTrait, IntoActiveModel};
use serde::Deserialize;

use crate::{
    extractors::{ApiJson, ApiPath, AuthUser, RoleGate, require_role},
    middleware::AppState,
    response::ApiResponse,
};

type Model<F> = <<F as ContentForm>::Entity as EntityTrait>::Model;

/// Content tables reachable over HTTP.
pub trait ContentApi: ContentForm {
    fn service(state: &AppState) -> &ContentService<Self>;
}

impl ContentApi for CourseForm {
    fn service(state: &AppState) -> &ContentService<Self> {
        &state.course_service
    }
}

impl ContentApi for BlogForm {
    fn service(state: &AppState) -> &ContentService<Self> {
        &state.blog_service
    }
}

impl ContentApi for TestimonialForm {
    fn service(state: &AppState) -> &ContentService<Self> {
        &state.testimonial_service
    }
}

impl ContentApi for PlacementForm {
    fn service(state: &AppState) -> &ContentService<Self> {
        &state.placement_service
    }
}

impl ContentApi for FaqForm {
    fn service(state: &AppState) -> &ContentService<Self> {
        &state.faq_service
    }
}

impl ContentApi for FacultyForm {
    fn service(state: &AppState) -> &ContentService<Self> {
        &state.faculty_service
    }
}

/// Create body: the form plus optional initial flags.
#[derive(Debug, Deserialize)]
#[serde(bound = "F: ContentForm")]
pub struct CreateRequest<F> {
    #[serde(flatten)]
    pub form: F,
    #[serde(flatten)]
    pub visibility: Visibility,
}

// ==================== Handlers ====================

async fn list<F: ContentApi>(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Model<F>>>> {
    Ok(ApiResponse::ok(F::service(&state).list().await?))
}

/// Public listing: only rows flagged public.
pub async fn list_public<F: ContentApi>(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<Model<F>>>> {
    Ok(ApiResponse::ok(F::service(&state).list_public().await?))
}

async fn show<F: ContentApi>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<Model<F>>> {
    Ok(ApiResponse::ok(F::service(&state).get(&id).await?))
}

async fn create<F: ContentApi>(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateRequest<F>>,
) -> AppResult<ApiResponse<Model<F>>>
where
    Model<F>: IntoActiveModel<F::ActiveModel>,
{
    let created = F::service(&state)
        .create(&user.id, req.form, req.visibility)
        .await?;
    Ok(ApiResponse::created(created))
}

async fn update<F: ContentApi>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(form): ApiJson<F>,
) -> AppResult<ApiResponse<Model<F>>> {
    Ok(ApiResponse::ok(F::service(&state).update(&id, form).await?))
}

async fn set_visibility<F: ContentApi>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(visibility): ApiJson<Visibility>,
) -> AppResult<ApiResponse<Model<F>>> {
    Ok(ApiResponse::ok(
        F::service(&state).set_visibility(&id, visibility).await?,
    ))
}

async fn remove<F: ContentApi>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<()>> {
    F::service(&state).delete(&id).await?;
    Ok(ApiResponse::empty())
}

// ==================== Router ====================

/// Back-office CRUD over the table of `F`, open to `roles`.
pub fn router<F: ContentApi>(roles: &'static [UserRole]) -> Router<AppState>
where
    Model<F>: IntoActiveModel<F::ActiveModel>,
{
    Router::new()
        .route("/", get(list::<F>).post(create::<F>))
        .route("/{id}", get(show::<F>).put(update::<F>).delete(remove::<F>))
        .route("/{id}/visibility", put(set_visibility::<F>))
        .route_layer(from_fn_with_state(RoleGate::new(roles), require_role))
}

const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];
const BLOG_EDITORS: &[UserRole] = &[UserRole::Admin, UserRole::ContentWriter];

/// Every back-office content router.
pub fn routers() -> Router<AppState> {
    Router::new()
        .nest("/admin/courses", router::<CourseForm>(ADMIN_ONLY))
        .nest("/admin/blogs", router::<BlogForm>(BLOG_EDITORS))
        .nest("/admin/testimonials", router::<TestimonialForm>(ADMIN_ONLY))
        .nest("/admin/placements", router::<PlacementForm>(ADMIN_ONLY))
        .nest("/admin/faqs", router::<FaqForm>(ADMIN_ONLY))
        .nest("/admin/faculties", router::<FacultyForm>(ADMIN_ONLY))
}
