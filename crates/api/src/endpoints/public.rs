//! Anonymous endpoints: form submissions and public listings.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use institute_common::AppResult;
use institute_core::{
    BlogForm, CourseForm, EnterpriseEnquiryInput, FacultyEnquiryInput, FacultyForm, FaqForm,
    PlacementForm, StudentEnquiryInput, SubmissionReceipt, TestimonialForm,
};
use institute_db::entities::category;

use crate::{
    endpoints::content::list_public,
    extractors::ApiJson,
    middleware::AppState,
    response::ApiResponse,
};

async fn submit_enquiry(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<StudentEnquiryInput>,
) -> AppResult<ApiResponse<SubmissionReceipt>> {
    let receipt = state.submission_service.submit_student(input).await?;
    Ok(ApiResponse::created(receipt))
}

async fn submit_enterprise_enquiry(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<EnterpriseEnquiryInput>,
) -> AppResult<ApiResponse<SubmissionReceipt>> {
    let receipt = state.submission_service.submit_enterprise(input).await?;
    Ok(ApiResponse::created(receipt))
}

async fn submit_faculty_enquiry(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<FacultyEnquiryInput>,
) -> AppResult<ApiResponse<SubmissionReceipt>> {
    let receipt = state.submission_service.submit_faculty(input).await?;
    Ok(ApiResponse::created(receipt))
}

async fn categories(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<category::Model>>> {
    Ok(ApiResponse::ok(state.category_service.list().await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/enquiry", post(submit_enquiry))
        .route("/enterprise-enquiry", post(submit_enterprise_enquiry))
        .route("/faculty-enquiry", post(submit_faculty_enquiry))
        .route("/courses", get(list_public::<CourseForm>))
        .route("/blogs", get(list_public::<BlogForm>))
        .route("/faqs", get(list_public::<FaqForm>))
        .route("/testimonials", get(list_public::<TestimonialForm>))
        .route("/placements", get(list_public::<PlacementForm>))
        .route("/faculties", get(list_public::<FacultyForm>))
        .route("/categories", get(categories))
}
