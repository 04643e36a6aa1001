//! Public lead-capture forms.

use std::sync::{Arc, LazyLock};

use chrono::{NaiveDate, Utc};
use institute_common::{AppError, AppResult, id::IdGenerator};
use institute_db::{
    entities::{
        Course, EnterpriseEnquiry, Enquiry, FacultyEnquiry, enquiry,
        enquiry::EnquiryStatus,
        enterprise_enquiry::{self, EnterpriseEnquiryStatus},
        faculty_enquiry::{self, FacultyEnquiryStatus},
    },
    lead::LeadStatus,
    repositories::{ContentRepository, LeadRepository},
};
use regex::Regex;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::{Validate, ValidationError};

/// Digits with an optional leading `+`, spaces and dashes allowed between.
#[allow(clippy::expect_used)]
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$").expect("phone pattern compiles")
});

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message("Invalid phone number".into()))
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("Must not be blank".into()))
    } else {
        Ok(())
    }
}

/// Student enquiry form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentEnquiryInput {
    #[validate(length(min = 1, max = 128), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
    pub course_id: Option<String>,
}

/// Corporate training enquiry form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseEnquiryInput {
    #[validate(length(min = 1, max = 256), custom(function = "validate_not_blank"))]
    pub company_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(max = 128))]
    pub duration: Option<String>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

/// Faculty application form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FacultyEnquiryInput {
    #[validate(length(min = 1, max = 128), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(url)]
    pub resume_url: Option<String>,
    pub available_date: Option<NaiveDate>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

/// What a submitter gets back. Staff-only fields are never echoed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: String,
    pub status: &'static str,
    pub created_at: chrono::DateTime<Utc>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Service accepting public form submissions.
#[derive(Clone)]
pub struct SubmissionService {
    enquiries: LeadRepository<Enquiry>,
    enterprise_enquiries: LeadRepository<EnterpriseEnquiry>,
    faculty_enquiries: LeadRepository<FacultyEnquiry>,
    courses: ContentRepository<Course>,
    id_gen: IdGenerator,
}

impl SubmissionService {
    /// Create a new submission service.
    #[must_use]
    pub fn new(db: Arc<sea_orm::DatabaseConnection>) -> Self {
        Self {
            enquiries: LeadRepository::new(Arc::clone(&db)),
            enterprise_enquiries: LeadRepository::new(Arc::clone(&db)),
            faculty_enquiries: LeadRepository::new(Arc::clone(&db)),
            courses: ContentRepository::new(db),
            id_gen: IdGenerator::new(),
        }
    }

    /// Record a student enquiry.
    pub async fn submit_student(&self, input: StudentEnquiryInput) -> AppResult<SubmissionReceipt> {
        input.validate()?;

        let course_id = trimmed(input.course_id);
        if let Some(course_id) = &course_id
            && self.courses.find_by_id(course_id).await?.is_none()
        {
            return Err(AppError::Validation(format!(
                "Course {course_id} does not exist"
            )));
        }

        let model = enquiry::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            email: Set(input.email.trim().to_string()),
            phone: Set(input.phone.trim().to_string()),
            message: Set(trimmed(input.message)),
            course_id: Set(course_id),
            agent_id: Set(None),
            status: Set(EnquiryStatus::New),
            note: Set(None),
            remark: Set(None),
            created_at: Set(Utc::now()),
        };

        let created = self.enquiries.insert(model).await?;
        info!(id = %created.id, course_id = ?created.course_id, "Student enquiry received");

        Ok(SubmissionReceipt {
            id: created.id,
            status: EnquiryStatus::New.as_str(),
            created_at: created.created_at,
        })
    }

    /// Record a corporate training enquiry.
    pub async fn submit_enterprise(
        &self,
        input: EnterpriseEnquiryInput,
    ) -> AppResult<SubmissionReceipt> {
        input.validate()?;

        let model = enterprise_enquiry::ActiveModel {
            id: Set(self.id_gen.generate()),
            company_name: Set(input.company_name.trim().to_string()),
            email: Set(input.email.trim().to_string()),
            phone: Set(input.phone.trim().to_string()),
            duration: Set(trimmed(input.duration)),
            message: Set(trimmed(input.message)),
            assigned_to_id: Set(None),
            status: Set(EnterpriseEnquiryStatus::New),
            note: Set(None),
            remark: Set(None),
            created_at: Set(Utc::now()),
        };

        let created = self.enterprise_enquiries.insert(model).await?;
        info!(id = %created.id, "Enterprise enquiry received");

        Ok(SubmissionReceipt {
            id: created.id,
            status: EnterpriseEnquiryStatus::New.as_str(),
            created_at: created.created_at,
        })
    }

    /// Record a faculty application.
    pub async fn submit_faculty(&self, input: FacultyEnquiryInput) -> AppResult<SubmissionReceipt> {
        input.validate()?;

        let model = faculty_enquiry::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            email: Set(input.email.trim().to_string()),
            phone: Set(input.phone.trim().to_string()),
            resume_url: Set(trimmed(input.resume_url)),
            available_date: Set(input.available_date),
            message: Set(trimmed(input.message)),
            assigned_to_id: Set(None),
            status: Set(FacultyEnquiryStatus::New),
            note: Set(None),
            remark: Set(None),
            created_at: Set(Utc::now()),
        };

        let created = self.faculty_enquiries.insert(model).await?;
        info!(id = %created.id, "Faculty application received");

        Ok(SubmissionReceipt {
            id: created.id,
            status: FacultyEnquiryStatus::New.as_str(),
            created_at: created.created_at,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use institute_db::entities::course::{self, Difficulty};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn student_input() -> StudentEnquiryInput {
        StudentEnquiryInput {
            name: "Asha Verma".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+91 98765-43210".to_string(),
            message: Some("  ".to_string()),
            course_id: None,
        }
    }

    fn stored_enquiry(course_id: Option<&str>) -> enquiry::Model {
        enquiry::Model {
            id: "enq1".to_string(),
            name: "Asha Verma".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+91 98765-43210".to_string(),
            message: None,
            course_id: course_id.map(str::to_string),
            agent_id: None,
            status: EnquiryStatus::New,
            note: None,
            remark: None,
            created_at: Utc::now(),
        }
    }

    fn create_test_course(id: &str) -> course::Model {
        course::Model {
            id: id.to_string(),
            title: "Full Stack".to_string(),
            description: None,
            fees: 10_000,
            discount: Some(1_000),
            category_id: None,
            difficulty: Difficulty::Beginner,
            image_url: None,
            is_public: true,
            is_featured: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_phone_pattern() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+91 98765-43210").is_ok());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("12").is_err());
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected_before_any_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = SubmissionService::new(Arc::new(db));

        let mut input = student_input();
        input.email = "not-an-email".to_string();

        let result = service.submit_student(input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_blank_required_fields_are_rejected_without_insert() {
        // No exec or query result queued: an INSERT would fail differently.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = SubmissionService::new(Arc::new(db));

        let mut input = student_input();
        input.name = "   ".to_string();
        assert!(matches!(
            service.submit_student(input).await,
            Err(AppError::Validation(_))
        ));

        let enterprise = EnterpriseEnquiryInput {
            company_name: " \t ".to_string(),
            email: "hr@acme.example".to_string(),
            phone: "9876543210".to_string(),
            duration: None,
            message: None,
        };
        assert!(matches!(
            service.submit_enterprise(enterprise).await,
            Err(AppError::Validation(_))
        ));

        let faculty = FacultyEnquiryInput {
            name: "  ".to_string(),
            email: "meera@example.com".to_string(),
            phone: "9123456780".to_string(),
            resume_url: None,
            available_date: None,
            message: None,
        };
        assert!(matches!(
            service.submit_faculty(faculty).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_course_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<course::Model>::new()])
            .into_connection();
        let service = SubmissionService::new(Arc::new(db));

        let mut input = student_input();
        input.course_id = Some("missing".to_string());

        match service.submit_student(input).await {
            Err(AppError::Validation(msg)) => assert!(msg.contains("missing")),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submission_receipt_hides_staff_fields() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_course("course1")]])
            .append_query_results([[stored_enquiry(Some("course1"))]])
            .into_connection();
        let service = SubmissionService::new(Arc::new(db));

        let mut input = student_input();
        input.course_id = Some("course1".to_string());

        let receipt = service.submit_student(input).await.unwrap();
        assert_eq!(receipt.id, "enq1");
        assert_eq!(receipt.status, "NEW");

        let json = serde_json::to_value(&receipt).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["createdAt", "id", "status"]);
    }

    #[tokio::test]
    async fn test_faculty_resume_must_be_url() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = SubmissionService::new(Arc::new(db));

        let input = FacultyEnquiryInput {
            name: "Meera Iyer".to_string(),
            email: "meera@example.com".to_string(),
            phone: "9123456780".to_string(),
            resume_url: Some("resume.pdf".to_string()),
            available_date: None,
            message: None,
        };

        assert!(matches!(
            service.submit_faculty(input).await,
            Err(AppError::Validation(_))
        ));
    }
}
