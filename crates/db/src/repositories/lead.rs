//! Lead repository, shared by the three enquiry tables.

use std::{marker::PhantomData, sync::Arc};

use chrono::{DateTime, Utc};
use institute_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Value,
    sea_query::{Expr, Func, LikeExpr},
};

use crate::lead::{LeadEntity, LeadFilter, LeadScope, LeadStatus, SubStatus};

/// Repository over one lead table.
pub struct LeadRepository<K> {
    db: Arc<DatabaseConnection>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for LeadRepository<K> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            _kind: PhantomData,
        }
    }
}

/// Escape `LIKE` wildcards so user input only ever matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl<K: LeadEntity> LeadRepository<K> {
    /// Create a new lead repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            _kind: PhantomData,
        }
    }

    fn not_found(id: &str) -> AppError {
        AppError::NotFound(format!("{} {id}", K::LABEL))
    }

    fn scope_condition(scope: &LeadScope) -> Condition {
        match scope {
            LeadScope::All => Condition::all(),
            LeadScope::AssignedTo(user_id) => {
                Condition::all().add(K::assignee_column().eq(user_id.as_str()))
            }
        }
    }

    fn search_condition(search: Option<&str>) -> Condition {
        let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) else {
            return Condition::all();
        };

        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        K::search_columns()
            .iter()
            .fold(Condition::any(), |any, column| {
                any.add(
                    Expr::expr(Func::lower(Expr::col(*column)))
                        .like(LikeExpr::new(pattern.clone()).escape('\\')),
                )
            })
    }

    /// Condition selecting the rows a list request returns.
    fn filter_condition(scope: &LeadScope, filter: &LeadFilter<K::Status>) -> Condition {
        let mut condition = Self::scope_condition(scope).add(Self::search_condition(
            filter.search.as_deref(),
        ));

        if let Some(status) = filter.status {
            condition = condition.add(K::status_column().eq(status));
        }

        match filter.sub_status {
            Some(SubStatus::Assigned) => condition.add(K::assignee_column().is_not_null()),
            Some(SubStatus::Unassigned) => condition.add(K::assignee_column().is_null()),
            None => condition,
        }
    }

    /// Find a lead by ID, ignoring scope.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<K::Model>> {
        K::find()
            .filter(K::id_column().eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a lead visible within `scope`, returning an error if not found.
    ///
    /// Rows outside the scope are reported as missing.
    pub async fn get_in_scope(&self, scope: &LeadScope, id: &str) -> AppResult<K::Model> {
        K::find()
            .filter(Self::scope_condition(scope))
            .filter(K::id_column().eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| Self::not_found(id))
    }

    /// One page of leads, newest first, plus the number of matching rows.
    pub async fn list(
        &self,
        scope: &LeadScope,
        filter: &LeadFilter<K::Status>,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<K::Model>, u64)> {
        let query = K::find().filter(Self::filter_condition(scope, filter));

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let items = query
            .order_by_desc(K::created_at_column())
            .order_by_desc(K::id_column())
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((items, total))
    }

    /// Rows per status within `scope` that match `search`.
    ///
    /// Statuses without rows are absent.
    pub async fn count_by_status(
        &self,
        scope: &LeadScope,
        search: Option<&str>,
    ) -> AppResult<Vec<(K::Status, i64)>> {
        K::find()
            .select_only()
            .column(K::status_column())
            .column_as(K::id_column().count(), "count")
            .filter(Self::scope_condition(scope))
            .filter(Self::search_condition(search))
            .group_by(K::status_column())
            .into_tuple::<(K::Status, i64)>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// `NEW` rows within `scope` matching `search` that have an assignee.
    pub async fn count_new_assigned(&self, scope: &LeadScope, search: Option<&str>) -> AppResult<u64> {
        K::find()
            .filter(Self::scope_condition(scope))
            .filter(Self::search_condition(search))
            .filter(K::status_column().eq(<K::Status as LeadStatus>::NEW))
            .filter(K::assignee_column().is_not_null())
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count every row.
    pub async fn count(&self) -> AppResult<u64> {
        K::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count rows created in `[from, to)`.
    pub async fn count_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<u64> {
        K::find()
            .filter(K::created_at_column().gte(from))
            .filter(K::created_at_column().lt(to))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Assignees with the most rows in `status`.
    ///
    /// Ordered by count descending, then assignee ID ascending.
    pub async fn top_assignees(&self, status: K::Status, limit: u64) -> AppResult<Vec<(String, i64)>> {
        K::find()
            .select_only()
            .column(K::assignee_column())
            .column_as(K::id_column().count(), "count")
            .filter(K::status_column().eq(status))
            .filter(K::assignee_column().is_not_null())
            .group_by(K::assignee_column())
            .order_by_desc(K::id_column().count())
            .order_by_asc(K::assignee_column())
            .limit(limit)
            .into_tuple::<(String, i64)>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new lead.
    pub async fn insert<A>(&self, model: A) -> AppResult<K::Model>
    where
        A: ActiveModelTrait<Entity = K> + ActiveModelBehavior + Send,
        K::Model: IntoActiveModel<A>,
    {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Write `values` to a lead visible within `scope` and return the new row.
    async fn update_columns(
        &self,
        scope: &LeadScope,
        id: &str,
        values: Vec<(K::Column, Value)>,
    ) -> AppResult<K::Model> {
        if values.is_empty() {
            return self.get_in_scope(scope, id).await;
        }

        let update = values.into_iter().fold(
            K::update_many()
                .filter(Self::scope_condition(scope))
                .filter(K::id_column().eq(id)),
            |update, (column, value)| update.col_expr(column, Expr::value(value)),
        );

        let result = update
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Set the status of a lead.
    pub async fn update_status(
        &self,
        scope: &LeadScope,
        id: &str,
        status: K::Status,
    ) -> AppResult<K::Model> {
        self.update_columns(scope, id, vec![(K::status_column(), status.into())])
            .await
    }

    /// Set or clear the assignee of a lead.
    pub async fn set_assignee(
        &self,
        scope: &LeadScope,
        id: &str,
        assignee_id: Option<String>,
    ) -> AppResult<K::Model> {
        self.update_columns(scope, id, vec![(K::assignee_column(), assignee_id.into())])
            .await
    }

    /// Overwrite the given free-text fields. `None` leaves a field as is.
    pub async fn update_notes(
        &self,
        scope: &LeadScope,
        id: &str,
        note: Option<Option<String>>,
        remark: Option<Option<String>>,
    ) -> AppResult<K::Model> {
        let mut values = Vec::with_capacity(2);
        if let Some(note) = note {
            values.push((K::note_column(), note.into()));
        }
        if let Some(remark) = remark {
            values.push((K::remark_column(), remark.into()));
        }
        self.update_columns(scope, id, values).await
    }

    /// Hard-delete a lead.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let result = K::delete_many()
            .filter(K::id_column().eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::{
        Enquiry, FacultyEnquiry, enquiry,
        enquiry::EnquiryStatus,
        faculty_enquiry::{self, FacultyEnquiryStatus},
    };
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

    fn create_test_enquiry(id: &str, agent_id: Option<&str>) -> enquiry::Model {
        enquiry::Model {
            id: id.to_string(),
            name: "Asha Verma".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            message: None,
            course_id: Some("course1".to_string()),
            agent_id: agent_id.map(str::to_string),
            status: EnquiryStatus::New,
            note: None,
            remark: None,
            created_at: Utc::now(),
        }
    }

    fn count_row(n: i64) -> [std::collections::BTreeMap<&'static str, Value>; 1] {
        [maplit::btreemap! { "num_items" => Value::BigInt(Some(n)) }]
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_unassigned_filter_is_a_null_predicate() {
        let filter = LeadFilter {
            status: Some(EnquiryStatus::New),
            sub_status: Some(SubStatus::Unassigned),
            search: None,
        };
        let sql = Enquiry::find()
            .filter(LeadRepository::<Enquiry>::filter_condition(&LeadScope::All, &filter))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""enquiry"."status" = 'NEW'"#), "{sql}");
        assert!(sql.contains(r#""enquiry"."agent_id" IS NULL"#), "{sql}");
    }

    #[test]
    fn test_search_is_case_insensitive_over_all_columns() {
        let filter = LeadFilter {
            search: Some("  ASHA ".to_string()),
            ..LeadFilter::default()
        };
        let sql = Enquiry::find()
            .filter(LeadRepository::<Enquiry>::filter_condition(&LeadScope::All, &filter))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains("LOWER"), "{sql}");
        assert!(sql.contains("'%asha%'"), "{sql}");
        assert!(sql.contains(r#""phone""#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
    }

    #[test]
    fn test_scope_filters_on_assignee() {
        let sql = FacultyEnquiry::find()
            .filter(LeadRepository::<FacultyEnquiry>::filter_condition(
                &LeadScope::AssignedTo("hr1".to_string()),
                &LeadFilter::default(),
            ))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(
            sql.contains(r#""faculty_enquiry"."assigned_to_id" = 'hr1'"#),
            "{sql}"
        );
    }

    #[tokio::test]
    async fn test_list_returns_page_and_total() {
        let rows = vec![
            create_test_enquiry("e2", None),
            create_test_enquiry("e1", None),
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count_row(7)])
                .append_query_results([rows])
                .into_connection(),
        );

        let repo = LeadRepository::<Enquiry>::new(db);
        let (items, total) = repo
            .list(&LeadScope::All, &LeadFilter::default(), 0, 2)
            .await
            .unwrap();

        assert_eq!(total, 7);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "e2");
    }

    #[tokio::test]
    async fn test_get_in_scope_outside_scope_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<faculty_enquiry::Model>::new()])
                .into_connection(),
        );

        let repo = LeadRepository::<FacultyEnquiry>::new(db);
        let result = repo
            .get_in_scope(&LeadScope::AssignedTo("hr2".to_string()), "f1")
            .await;

        match result {
            Err(AppError::NotFound(what)) => assert_eq!(what, "Faculty enquiry f1"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_status_refetches_row() {
        let mut updated = create_test_enquiry("e1", Some("agent1"));
        updated.status = EnquiryStatus::Enrolled;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[updated.clone()]])
                .into_connection(),
        );

        let repo = LeadRepository::<Enquiry>::new(db);
        let result = repo
            .update_status(&LeadScope::All, "e1", EnquiryStatus::Enrolled)
            .await
            .unwrap();

        assert_eq!(result.status, EnquiryStatus::Enrolled);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = LeadRepository::<FacultyEnquiry>::new(db);
        let result = repo
            .update_status(&LeadScope::All, "missing", FacultyEnquiryStatus::Hired)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_notes_without_fields_only_reads() {
        let row = create_test_enquiry("e1", None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row.clone()]])
                .into_connection(),
        );

        let repo = LeadRepository::<Enquiry>::new(db);
        let result = repo
            .update_notes(&LeadScope::All, "e1", None, None)
            .await
            .unwrap();

        assert_eq!(result, row);
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = LeadRepository::<Enquiry>::new(db);
        assert!(matches!(
            repo.delete("missing").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_count_new_assigned() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count_row(3)])
                .into_connection(),
        );

        let repo = LeadRepository::<Enquiry>::new(db);
        let count = repo
            .count_new_assigned(&LeadScope::All, None)
            .await
            .unwrap();

        assert_eq!(count, 3);
    }
}
