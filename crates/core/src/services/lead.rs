//! Enquiry lifecycle and assignment workflow.
//!
//! One service drives all three enquiry tables. Status changes are
//! unrestricted; assignment is a separate attribute that can change in any
//! status but only to an existing, non-banned user of a role the table
//! accepts.

use institute_common::{AppError, AppResult, config::LeadsConfig};
use institute_db::{
    entities::user::{self, UserRole},
    lead::{LeadEntity, LeadFilter, LeadScope, LeadStatus, SubStatus},
    repositories::{LeadRepository, UserRepository},
};
use serde::{Deserialize, Serialize, ser::SerializeMap};
use tracing::{info, warn};
use validator::Validate;

/// Longest accepted note or remark.
const MAX_NOTE_LENGTH: u64 = 5000;

/// Query string of a list request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadListQuery {
    pub status: Option<String>,
    pub sub_status: Option<String>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// Body of a status change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusInput {
    pub status: String,
}

/// Body of an assignment. A missing, null or blank assignee un-assigns.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignInput {
    #[serde(default, alias = "agentId", alias = "assignedToId")]
    pub assignee_id: Option<String>,
}

/// Body of a note edit. Absent fields are left untouched, blank ones cleared.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateNotesInput {
    #[validate(length(max = MAX_NOTE_LENGTH))]
    pub note: Option<String>,
    #[validate(length(max = MAX_NOTE_LENGTH))]
    pub remark: Option<String>,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

/// Tab badge counts: `TOTAL`, `NEW_UNASSIGNED`, `NEW_ASSIGNED`, then every
/// other status in funnel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadCounts {
    entries: Vec<(&'static str, u64)>,
}

impl LeadCounts {
    /// Count for a key such as `"NEW_ASSIGNED"` or `"CONTACTED"`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, count)| *count)
    }

    /// Keys in output order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}

impl Serialize for LeadCounts {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

/// Build the badge counts from per-status rows and the assigned `NEW` count.
fn build_counts<S: LeadStatus>(by_status: &[(S, i64)], new_assigned: u64) -> LeadCounts {
    let count_of = |status: S| {
        by_status
            .iter()
            .filter(|(s, _)| *s == status)
            .map(|(_, n)| u64::try_from(*n).unwrap_or(0))
            .sum::<u64>()
    };

    let total = S::ORDERED.iter().map(|s| count_of(*s)).sum();
    let new_total = count_of(S::NEW);
    let new_assigned = new_assigned.min(new_total);

    let mut entries = vec![
        ("TOTAL", total),
        ("NEW_UNASSIGNED", new_total - new_assigned),
        ("NEW_ASSIGNED", new_assigned),
    ];
    entries.extend(
        S::ORDERED
            .iter()
            .filter(|s| **s != S::NEW)
            .map(|s| (s.as_str(), count_of(*s))),
    );

    LeadCounts { entries }
}

/// Blank strings mean "no value".
fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Workflow over one enquiry table.
pub struct LeadService<K: LeadEntity> {
    lead_repo: LeadRepository<K>,
    user_repo: UserRepository,
    config: LeadsConfig,
}

impl<K: LeadEntity> Clone for LeadService<K> {
    fn clone(&self) -> Self {
        Self {
            lead_repo: self.lead_repo.clone(),
            user_repo: self.user_repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<K: LeadEntity> LeadService<K> {
    /// Create a new lead service.
    #[must_use]
    pub const fn new(
        lead_repo: LeadRepository<K>,
        user_repo: UserRepository,
        config: LeadsConfig,
    ) -> Self {
        Self {
            lead_repo,
            user_repo,
            config,
        }
    }

    /// Parse the filter part of a list query.
    ///
    /// `subStatus` only splits the `NEW` column, so it is rejected with any
    /// other status or without one.
    pub fn parse_filter(query: &LeadListQuery) -> AppResult<LeadFilter<K::Status>> {
        let status = match non_blank(query.status.clone()) {
            Some(raw) => Some(
                K::Status::parse(&raw)
                    .ok_or_else(|| AppError::Validation(format!("Unknown status: {raw}")))?,
            ),
            None => None,
        };

        let sub_status = match non_blank(query.sub_status.clone()) {
            Some(raw) => Some(
                SubStatus::parse(&raw)
                    .ok_or_else(|| AppError::Validation(format!("Unknown subStatus: {raw}")))?,
            ),
            None => None,
        };

        if sub_status.is_some() && status != Some(K::Status::NEW) {
            return Err(AppError::Validation(
                "subStatus is only valid together with status NEW".to_string(),
            ));
        }

        Ok(LeadFilter {
            status,
            sub_status,
            search: non_blank(query.search.clone()),
        })
    }

    /// Resolve the 1-based page number and clamped page size.
    fn page_window(&self, query: &LeadListQuery) -> (u64, u64) {
        let page = query.page.unwrap_or(1).max(1);
        let max = self.config.max_page_size.max(1);
        let page_size = query
            .page_size
            .unwrap_or(self.config.default_page_size)
            .clamp(1, max);
        (page, page_size)
    }

    /// Rows to skip before `page`. Offsets past the database's signed
    /// 64-bit range are rejected.
    fn page_offset(page: u64, page_size: u64) -> AppResult<u64> {
        (page - 1)
            .checked_mul(page_size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| AppError::Validation(format!("Page {page} is out of range")))
    }

    /// List leads visible in `scope`, newest first.
    pub async fn list(
        &self,
        scope: &LeadScope,
        query: &LeadListQuery,
    ) -> AppResult<Page<K::Model>> {
        let filter = Self::parse_filter(query)?;
        let (page, page_size) = self.page_window(query);
        let offset = Self::page_offset(page, page_size)?;

        let (items, total) = self
            .lead_repo
            .list(scope, &filter, offset, page_size)
            .await?;

        Ok(Page {
            items,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(page_size),
        })
    }

    /// Badge counts for every tab, honouring `scope` and `search`.
    pub async fn counts(&self, scope: &LeadScope, search: Option<String>) -> AppResult<LeadCounts> {
        let search = non_blank(search);
        let (by_status, new_assigned) = tokio::try_join!(
            self.lead_repo.count_by_status(scope, search.as_deref()),
            self.lead_repo.count_new_assigned(scope, search.as_deref()),
        )?;

        Ok(build_counts(&by_status, new_assigned))
    }

    /// Get one lead.
    pub async fn get(&self, scope: &LeadScope, id: &str) -> AppResult<K::Model> {
        self.lead_repo.get_in_scope(scope, id).await
    }

    /// Move a lead to any status.
    pub async fn update_status(
        &self,
        scope: &LeadScope,
        id: &str,
        input: UpdateStatusInput,
    ) -> AppResult<K::Model> {
        let status = K::Status::parse(&input.status)
            .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", input.status)))?;

        let updated = self.lead_repo.update_status(scope, id, status).await?;
        info!(kind = ?K::KIND, id = %id, status = status.as_str(), "Lead status updated");
        Ok(updated)
    }

    /// Check that `user` may take leads from this table.
    fn check_assignee(user: &user::Model) -> AppResult<()> {
        if user.banned {
            return Err(AppError::Validation(format!(
                "User {} is banned and cannot be assigned",
                user.id
            )));
        }
        if !K::accepts_assignee(user.role) {
            return Err(AppError::Validation(format!(
                "{} cannot be assigned to a user with role {}",
                K::LABEL,
                user.role.as_str()
            )));
        }
        Ok(())
    }

    /// Set or clear the assignee. A rejected assignee leaves the lead untouched.
    pub async fn assign(
        &self,
        scope: &LeadScope,
        id: &str,
        input: AssignInput,
    ) -> AppResult<K::Model> {
        self.lead_repo.get_in_scope(scope, id).await?;

        let assignee_id = non_blank(input.assignee_id);
        if let Some(assignee_id) = &assignee_id {
            let assignee = self.user_repo.find_by_id(assignee_id).await?.ok_or_else(|| {
                AppError::Validation(format!("Assignee {assignee_id} does not exist"))
            })?;
            Self::check_assignee(&assignee)?;
        }

        let updated = self
            .lead_repo
            .set_assignee(scope, id, assignee_id.clone())
            .await?;
        info!(kind = ?K::KIND, id = %id, assignee = ?assignee_id, "Lead assignment changed");
        Ok(updated)
    }

    /// Edit the staff note and remark.
    pub async fn update_notes(
        &self,
        scope: &LeadScope,
        id: &str,
        input: UpdateNotesInput,
    ) -> AppResult<K::Model> {
        input.validate()?;

        let note = input.note.map(|n| non_blank(Some(n)));
        let remark = input.remark.map(|r| non_blank(Some(r)));
        self.lead_repo.update_notes(scope, id, note, remark).await
    }

    /// Hard-delete a lead. Only admins may do this.
    pub async fn delete(&self, actor: &user::Model, id: &str) -> AppResult<()> {
        if actor.role != UserRole::Admin {
            warn!(kind = ?K::KIND, id = %id, user_id = %actor.id, "Non-admin tried to delete a lead");
            return Err(AppError::Forbidden(
                "Only admins can delete enquiries".to_string(),
            ));
        }

        self.lead_repo.delete(id).await?;
        info!(kind = ?K::KIND, id = %id, user_id = %actor.id, "Lead deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use institute_db::entities::{
        EnterpriseEnquiry, Enquiry, FacultyEnquiry, enquiry,
        enquiry::EnquiryStatus,
        enterprise_enquiry::EnterpriseEnquiryStatus,
        faculty_enquiry::{self, FacultyEnquiryStatus},
    };
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    fn service<K: LeadEntity>(db: DatabaseConnection) -> LeadService<K> {
        let db = Arc::new(db);
        LeadService::new(
            LeadRepository::new(Arc::clone(&db)),
            UserRepository::new(db),
            LeadsConfig::default(),
        )
    }

    fn create_test_user(id: &str, role: UserRole, banned: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: format!("User {id}"),
            email: format!("{id}@example.com"),
            role,
            banned,
            created_at: Utc::now(),
        }
    }

    fn create_test_faculty_enquiry(id: &str) -> faculty_enquiry::Model {
        faculty_enquiry::Model {
            id: id.to_string(),
            name: "Meera Iyer".to_string(),
            email: "meera@example.com".to_string(),
            phone: "9123456780".to_string(),
            resume_url: Some("https://cdn.example.com/resume.pdf".to_string()),
            available_date: None,
            message: None,
            assigned_to_id: None,
            status: FacultyEnquiryStatus::New,
            note: None,
            remark: None,
            created_at: Utc::now(),
        }
    }

    fn create_test_enquiry(id: &str) -> enquiry::Model {
        enquiry::Model {
            id: id.to_string(),
            name: "Asha Verma".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            message: None,
            course_id: None,
            agent_id: None,
            status: EnquiryStatus::New,
            note: None,
            remark: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_sub_status_requires_new() {
        let query = LeadListQuery {
            status: Some("CONTACTED".to_string()),
            sub_status: Some("assigned".to_string()),
            ..LeadListQuery::default()
        };
        assert!(matches!(
            LeadService::<Enquiry>::parse_filter(&query),
            Err(AppError::Validation(_))
        ));

        let query = LeadListQuery {
            sub_status: Some("unassigned".to_string()),
            ..LeadListQuery::default()
        };
        assert!(LeadService::<Enquiry>::parse_filter(&query).is_err());

        let query = LeadListQuery {
            status: Some("new".to_string()),
            sub_status: Some("Unassigned".to_string()),
            search: Some("   ".to_string()),
            ..LeadListQuery::default()
        };
        let filter = LeadService::<Enquiry>::parse_filter(&query).unwrap();
        assert_eq!(filter.status, Some(EnquiryStatus::New));
        assert_eq!(filter.sub_status, Some(SubStatus::Unassigned));
        assert_eq!(filter.search, None);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let query = LeadListQuery {
            status: Some("HIRED".to_string()),
            ..LeadListQuery::default()
        };
        assert!(LeadService::<Enquiry>::parse_filter(&query).is_err());
        assert!(LeadService::<FacultyEnquiry>::parse_filter(&query).is_ok());
    }

    #[test]
    fn test_counts_partition_new() {
        let rows = vec![
            (EnquiryStatus::New, 5),
            (EnquiryStatus::Contacted, 2),
            (EnquiryStatus::Enrolled, 1),
        ];
        let counts = build_counts(&rows, 3);

        assert_eq!(counts.get("TOTAL"), Some(8));
        assert_eq!(counts.get("NEW_UNASSIGNED"), Some(2));
        assert_eq!(counts.get("NEW_ASSIGNED"), Some(3));
        assert_eq!(
            counts.get("NEW_UNASSIGNED").unwrap() + counts.get("NEW_ASSIGNED").unwrap(),
            5
        );
        assert_eq!(counts.get("DEAD"), Some(0));
        assert_eq!(counts.get("NEW"), None);
        assert_eq!(
            counts.keys().collect::<Vec<_>>(),
            [
                "TOTAL",
                "NEW_UNASSIGNED",
                "NEW_ASSIGNED",
                "CONTACTED",
                "ENROLLED",
                "DEAD",
                "ARCHIVED"
            ]
        );
    }

    #[test]
    fn test_counts_serialize_in_order() {
        let counts = build_counts::<EnterpriseEnquiryStatus>(&[], 0);
        let json = serde_json::to_string(&counts).unwrap();
        assert!(json.starts_with(r#"{"TOTAL":0,"NEW_UNASSIGNED":0,"NEW_ASSIGNED":0,"CONTACTED":0"#));
        assert!(json.contains(r#""COMPLETED":0"#));
    }

    #[test]
    fn test_page_window_clamps() {
        let svc = service::<Enquiry>(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let query = LeadListQuery {
            page: Some(0),
            page_size: Some(10_000),
            ..LeadListQuery::default()
        };
        assert_eq!(svc.page_window(&query), (1, 100));

        let query = LeadListQuery {
            page_size: Some(0),
            ..LeadListQuery::default()
        };
        assert_eq!(svc.page_window(&query), (1, 1));
        assert_eq!(svc.page_window(&LeadListQuery::default()), (1, 10));
    }

    #[tokio::test]
    async fn test_huge_page_is_rejected_before_querying() {
        // Nothing queued: reaching the database would fail differently.
        let svc = service::<Enquiry>(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = svc
            .list(
                &LeadScope::All,
                &LeadListQuery {
                    page: Some(u64::MAX),
                    ..LeadListQuery::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        assert_eq!(LeadService::<Enquiry>::page_offset(3, 10).unwrap(), 20);
        assert!(LeadService::<Enquiry>::page_offset(u64::MAX / 10 + 2, 10).is_err());
        assert!(LeadService::<Enquiry>::page_offset(1 << 62, 4).is_err());
    }

    #[tokio::test]
    async fn test_list_reports_total_pages() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[maplit::btreemap! {
                "num_items" => Value::BigInt(Some(21))
            }]])
            .append_query_results([vec![create_test_enquiry("e1")]])
            .into_connection();

        let page = service::<Enquiry>(db)
            .list(
                &LeadScope::All,
                &LeadListQuery {
                    page: Some(3),
                    ..LeadListQuery::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(page.page, 3);
        assert_eq!(page.total, 21);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_assign_wrong_role_is_rejected_without_write() {
        // No exec result is queued: an UPDATE would fail the test.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_faculty_enquiry("f1")]])
            .append_query_results([[create_test_user("s1", UserRole::Student, false)]])
            .into_connection();

        let result = service::<FacultyEnquiry>(db)
            .assign(
                &LeadScope::All,
                "f1",
                AssignInput {
                    assignee_id: Some("s1".to_string()),
                },
            )
            .await;

        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("STUDENT"), "{msg}"),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_assign_banned_user_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_enquiry("e1")]])
            .append_query_results([[create_test_user("a1", UserRole::Agent, true)]])
            .into_connection();

        let result = service::<Enquiry>(db)
            .assign(
                &LeadScope::All,
                "e1",
                AssignInput {
                    assignee_id: Some("a1".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_assign_missing_user_is_validation_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_enquiry("e1")]])
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let result = service::<Enquiry>(db)
            .assign(
                &LeadScope::All,
                "e1",
                AssignInput {
                    assignee_id: Some("ghost".to_string()),
                },
            )
            .await;

        match result {
            Err(AppError::Validation(msg)) => assert!(msg.contains("does not exist")),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_assign_missing_lead_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<enquiry::Model>::new()])
            .into_connection();

        let result = service::<Enquiry>(db)
            .assign(&LeadScope::All, "nope", AssignInput::default())
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_assign_agent_to_student_enquiry() {
        let mut assigned = create_test_enquiry("e1");
        assigned.agent_id = Some("a1".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_enquiry("e1")]])
            .append_query_results([[create_test_user("a1", UserRole::Agent, false)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[assigned.clone()]])
            .into_connection();

        let result = service::<Enquiry>(db)
            .assign(
                &LeadScope::All,
                "e1",
                AssignInput {
                    assignee_id: Some(" a1 ".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.agent_id.as_deref(), Some("a1"));
        assert_eq!(result.status, EnquiryStatus::New);
    }

    #[tokio::test]
    async fn test_blank_assignee_unassigns_without_user_lookup() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[create_test_enquiry("e1")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[create_test_enquiry("e1")]])
            .into_connection();

        let result = service::<Enquiry>(db)
            .assign(
                &LeadScope::All,
                "e1",
                AssignInput {
                    assignee_id: Some(String::new()),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.agent_id, None);
    }

    #[test]
    fn test_enterprise_accepts_any_staff() {
        let counselor = create_test_user("c1", UserRole::Counselor, false);
        let student = create_test_user("s1", UserRole::Student, false);

        assert!(LeadService::<EnterpriseEnquiry>::check_assignee(&counselor).is_ok());
        assert!(LeadService::<EnterpriseEnquiry>::check_assignee(&student).is_err());
        assert!(LeadService::<Enquiry>::check_assignee(&counselor).is_err());
    }

    #[tokio::test]
    async fn test_update_status_any_to_any() {
        let mut reopened = create_test_faculty_enquiry("f1");
        reopened.status = FacultyEnquiryStatus::New;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[reopened]])
            .into_connection();

        let result = service::<FacultyEnquiry>(db)
            .update_status(
                &LeadScope::All,
                "f1",
                UpdateStatusInput {
                    status: "new".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.status, FacultyEnquiryStatus::New);
    }

    #[tokio::test]
    async fn test_update_status_unknown_is_validation_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service::<Enquiry>(db)
            .update_status(
                &LeadScope::All,
                "e1",
                UpdateStatusInput {
                    status: "HIRED".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_notes_rejects_oversized_note() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = service::<Enquiry>(db)
            .update_notes(
                &LeadScope::All,
                "e1",
                UpdateNotesInput {
                    note: Some("x".repeat(5001)),
                    remark: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_requires_admin() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let hr = create_test_user("hr1", UserRole::Hr, false);

        let result = service::<FacultyEnquiry>(db).delete(&hr, "f1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_admin_delete() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let admin = create_test_user("admin", UserRole::Admin, false);

        service::<FacultyEnquiry>(db)
            .delete(&admin, "f1")
            .await
            .unwrap();
    }
}
