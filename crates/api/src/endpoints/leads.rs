//! Enquiry back-office endpoints.
//!
//! One generic router serves every enquiry table. A [`LeadPolicy`] decides
//! who may use it, which rows they see and whether the assign and delete
//! routes exist at all.

use axum::{
    Extension, Router,
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, put},
};
use institute_common::AppResult;
use institute_core::{
    AssignInput, LeadCounts, LeadListQuery, LeadService, Page, UpdateNotesInput,
    UpdateStatusInput,
};
use institute_db::{
    entities::{EnterpriseEnquiry, Enquiry, FacultyEnquiry, user::{self, UserRole}},
    lead::{LeadEntity, LeadScope},
};
use serde::Deserialize;

use crate::{
    extractors::{ApiJson, ApiPath, ApiQuery, AuthUser, RoleGate, require_role},
    middleware::AppState,
    response::ApiResponse,
};

/// Enquiry tables reachable over HTTP.
pub trait LeadApi: LeadEntity + Send + Sync + 'static {
    fn service(state: &AppState) -> &LeadService<Self>;
}

impl LeadApi for Enquiry {
    fn service(state: &AppState) -> &LeadService<Self> {
        &state.enquiry_service
    }
}

impl LeadApi for EnterpriseEnquiry {
    fn service(state: &AppState) -> &LeadService<Self> {
        &state.enterprise_enquiry_service
    }
}

impl LeadApi for FacultyEnquiry {
    fn service(state: &AppState) -> &LeadService<Self> {
        &state.faculty_enquiry_service
    }
}

/// Rows a router exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeRule {
    Everything,
    AssignedToCaller,
}

/// Access rules of one enquiry router.
#[derive(Debug, Clone, Copy)]
pub struct LeadPolicy {
    pub roles: &'static [UserRole],
    pub scope: ScopeRule,
    pub can_assign: bool,
    pub can_delete: bool,
}

impl LeadPolicy {
    fn scope_for(&self, user: &user::Model) -> LeadScope {
        match self.scope {
            ScopeRule::Everything => LeadScope::All,
            ScopeRule::AssignedToCaller => LeadScope::AssignedTo(user.id.clone()),
        }
    }
}

pub const ADMIN: LeadPolicy = LeadPolicy {
    roles: &[UserRole::Admin],
    scope: ScopeRule::Everything,
    can_assign: true,
    can_delete: true,
};

pub const COUNSELOR: LeadPolicy = LeadPolicy {
    roles: &[UserRole::Counselor],
    scope: ScopeRule::Everything,
    can_assign: true,
    can_delete: false,
};

pub const HR: LeadPolicy = LeadPolicy {
    roles: &[UserRole::Hr],
    scope: ScopeRule::AssignedToCaller,
    can_assign: false,
    can_delete: false,
};

pub const AGENT: LeadPolicy = LeadPolicy {
    roles: &[UserRole::Agent],
    scope: ScopeRule::AssignedToCaller,
    can_assign: false,
    can_delete: false,
};

/// Counts query.
#[derive(Debug, Default, Deserialize)]
pub struct CountsQuery {
    pub search: Option<String>,
}

// ==================== Handlers ====================

async fn list<K: LeadApi>(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Extension(policy): Extension<LeadPolicy>,
    ApiQuery(query): ApiQuery<LeadListQuery>,
) -> AppResult<ApiResponse<Page<K::Model>>> {
    let page = K::service(&state)
        .list(&policy.scope_for(&user), &query)
        .await?;
    Ok(ApiResponse::ok(page))
}

async fn counts<K: LeadApi>(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Extension(policy): Extension<LeadPolicy>,
    ApiQuery(query): ApiQuery<CountsQuery>,
) -> AppResult<ApiResponse<LeadCounts>> {
    let counts = K::service(&state)
        .counts(&policy.scope_for(&user), query.search)
        .await?;
    Ok(ApiResponse::ok(counts))
}

async fn show<K: LeadApi>(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Extension(policy): Extension<LeadPolicy>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<K::Model>> {
    let lead = K::service(&state)
        .get(&policy.scope_for(&user), &id)
        .await?;
    Ok(ApiResponse::ok(lead))
}

async fn update_status<K: LeadApi>(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Extension(policy): Extension<LeadPolicy>,
    ApiPath(id): ApiPath<String>,
    ApiJson(input): ApiJson<UpdateStatusInput>,
) -> AppResult<ApiResponse<K::Model>> {
    let lead = K::service(&state)
        .update_status(&policy.scope_for(&user), &id, input)
        .await?;
    Ok(ApiResponse::ok(lead))
}

async fn assign<K: LeadApi>(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Extension(policy): Extension<LeadPolicy>,
    ApiPath(id): ApiPath<String>,
    ApiJson(input): ApiJson<AssignInput>,
) -> AppResult<ApiResponse<K::Model>> {
    let lead = K::service(&state)
        .assign(&policy.scope_for(&user), &id, input)
        .await?;
    Ok(ApiResponse::ok(lead))
}

async fn update_notes<K: LeadApi>(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Extension(policy): Extension<LeadPolicy>,
    ApiPath(id): ApiPath<String>,
    ApiJson(input): ApiJson<UpdateNotesInput>,
) -> AppResult<ApiResponse<K::Model>> {
    let lead = K::service(&state)
        .update_notes(&policy.scope_for(&user), &id, input)
        .await?;
    Ok(ApiResponse::ok(lead))
}

async fn remove<K: LeadApi>(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<()>> {
    K::service(&state).delete(&user, &id).await?;
    Ok(ApiResponse::empty())
}

// ==================== Router ====================

/// Router over table `K` governed by `policy`.
pub fn router<K: LeadApi>(policy: LeadPolicy) -> Router<AppState> {
    let item = if policy.can_delete {
        get(show::<K>).delete(remove::<K>)
    } else {
        get(show::<K>)
    };

    let mut router = Router::new()
        .route("/", get(list::<K>))
        .route("/counts", get(counts::<K>))
        .route("/{id}", item)
        .route("/{id}/status", put(update_status::<K>))
        .route("/{id}/notes", put(update_notes::<K>));

    if policy.can_assign {
        router = router.route("/{id}/assign", put(assign::<K>));
    }

    router
        .route_layer(from_fn_with_state(RoleGate::new(policy.roles), require_role))
        .layer(Extension(policy))
}

/// Every enquiry router, keyed by mount point.
pub fn routers() -> Router<AppState> {
    Router::new()
        .nest("/admin/enquiries", router::<Enquiry>(ADMIN))
        .nest("/admin/enterprise-enquiries", router::<EnterpriseEnquiry>(ADMIN))
        .nest("/admin/faculty-enquiries", router::<FacultyEnquiry>(ADMIN))
        .nest("/counselor/enquiries", router::<Enquiry>(COUNSELOR))
        .nest(
            "/counselor/enterprise-enquiries",
            router::<EnterpriseEnquiry>(COUNSELOR),
        )
        .nest("/hr/faculty-enquiries", router::<FacultyEnquiry>(HR))
        .nest("/agent/enquiries", router::<Enquiry>(AGENT))
}
