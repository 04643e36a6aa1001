//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use institute_common::Config;
use institute_core::{
    BlogForm, CategoryService, ContentService, CourseForm, DashboardService, FacultyForm, FaqForm,
    LeadService, PlacementForm, SessionService, SubmissionService, TestimonialForm, UserService,
};
use institute_db::{
    entities::{EnterpriseEnquiry, Enquiry, FacultyEnquiry},
    repositories::{CategoryRepository, LeadRepository, SessionRepository, UserRepository},
};
use sea_orm::DatabaseConnection;

/// Cookie carrying the session token for browser clients.
pub const SESSION_COOKIE: &str = "session_token";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub session_service: SessionService,
    pub user_service: UserService,
    pub dashboard_service: DashboardService,
    pub submission_service: SubmissionService,
    pub enquiry_service: LeadService<Enquiry>,
    pub enterprise_enquiry_service: LeadService<EnterpriseEnquiry>,
    pub faculty_enquiry_service: LeadService<FacultyEnquiry>,
    pub category_service: CategoryService,
    pub course_service: ContentService<CourseForm>,
    pub blog_service: ContentService<BlogForm>,
    pub testimonial_service: ContentService<TestimonialForm>,
    pub placement_service: ContentService<PlacementForm>,
    pub faq_service: ContentService<FaqForm>,
    pub faculty_service: ContentService<FacultyForm>,
}

impl AppState {
    /// Wire every service onto one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: &Config) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));

        Self {
            session_service: SessionService::new(SessionRepository::new(Arc::clone(&db))),
            user_service: UserService::new(user_repo.clone()),
            dashboard_service: DashboardService::new(Arc::clone(&db), config.dashboard.clone()),
            submission_service: SubmissionService::new(Arc::clone(&db)),
            enquiry_service: LeadService::new(
                LeadRepository::new(Arc::clone(&db)),
                user_repo.clone(),
                config.leads.clone(),
            ),
            enterprise_enquiry_service: LeadService::new(
                LeadRepository::new(Arc::clone(&db)),
                user_repo.clone(),
                config.leads.clone(),
            ),
            faculty_enquiry_service: LeadService::new(
                LeadRepository::new(Arc::clone(&db)),
                user_repo,
                config.leads.clone(),
            ),
            category_service: CategoryService::new(CategoryRepository::new(Arc::clone(&db))),
            course_service: ContentService::new(Arc::clone(&db)),
            blog_service: ContentService::new(Arc::clone(&db)),
            testimonial_service: ContentService::new(Arc::clone(&db)),
            placement_service: ContentService::new(Arc::clone(&db)),
            faq_service: ContentService::new(Arc::clone(&db)),
            faculty_service: ContentService::new(Arc::clone(&db)),
            db,
        }
    }
}

/// Session token from `Authorization: Bearer` or the session cookie.
fn session_token(req: &Request<Body>) -> Option<String> {
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    CookieJar::from_headers(req.headers())
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Authentication middleware.
///
/// Attaches the session's user to the request extensions. Requests without
/// a live session continue as anonymous; routers decide whether that is
/// enough. A failed lookup ends the request with a server error rather
/// than passing it on as anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = session_token(&req) {
        match state.session_service.resolve(&token).await {
            Ok(Some(user)) => {
                req.extensions_mut().insert(user);
            }
            Ok(None) => {}
            Err(e) => return e.into_response(),
        }
    }

    next.run(req).await
}
