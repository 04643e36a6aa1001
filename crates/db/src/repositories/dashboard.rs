//! Cross-table reads backing the admin dashboard.

use std::sync::Arc;

use institute_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};

use crate::entities::{
    Enquiry, category, course,
    enquiry::{self, EnquiryStatus},
};

/// One enrolled enquiry with the price and category of its course.
///
/// Course columns are `None` when the enquiry has no course.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct EnrolledRevenueRow {
    pub course_id: Option<String>,
    pub fees: Option<i64>,
    pub discount: Option<i64>,
    pub category: Option<String>,
}

/// Enquiry count of one course.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CourseEnquiryCount {
    pub course_id: String,
    pub title: String,
    pub enquiries: i64,
}

/// Read-only aggregate queries joining several tables.
#[derive(Clone)]
pub struct DashboardRepository {
    db: Arc<DatabaseConnection>,
}

impl DashboardRepository {
    /// Create a new dashboard repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Every `ENROLLED` student enquiry joined to its course and category.
    pub async fn enrolled_revenue_rows(&self) -> AppResult<Vec<EnrolledRevenueRow>> {
        Enquiry::find()
            .select_only()
            .column_as(enquiry::Column::CourseId, "course_id")
            .column_as(course::Column::Fees, "fees")
            .column_as(course::Column::Discount, "discount")
            .column_as(category::Column::Title, "category")
            .join(JoinType::LeftJoin, enquiry::Relation::Course.def())
            .join(JoinType::LeftJoin, course::Relation::Category.def())
            .filter(enquiry::Column::Status.eq(EnquiryStatus::Enrolled))
            .into_model::<EnrolledRevenueRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Courses with the most enquiries of any status.
    ///
    /// Ordered by count descending, then course ID ascending.
    pub async fn popular_courses(&self, limit: u64) -> AppResult<Vec<CourseEnquiryCount>> {
        Enquiry::find()
            .select_only()
            .column_as(course::Column::Id, "course_id")
            .column_as(course::Column::Title, "title")
            .column_as(enquiry::Column::Id.count(), "enquiries")
            .join(JoinType::InnerJoin, enquiry::Relation::Course.def())
            .group_by(course::Column::Id)
            .group_by(course::Column::Title)
            .order_by_desc(enquiry::Column::Id.count())
            .order_by_asc(course::Column::Id)
            .limit(limit)
            .into_model::<CourseEnquiryCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait, Value};

    #[tokio::test]
    async fn test_enrolled_revenue_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! {
                        "course_id" => Value::String(Some(Box::new("c1".to_string()))),
                        "fees" => Value::BigInt(Some(10_000)),
                        "discount" => Value::BigInt(Some(1_000)),
                        "category" => Value::String(Some(Box::new("Web".to_string()))),
                    },
                    maplit::btreemap! {
                        "course_id" => Value::String(None),
                        "fees" => Value::BigInt(None),
                        "discount" => Value::BigInt(None),
                        "category" => Value::String(None),
                    },
                ]])
                .into_connection(),
        );

        let repo = DashboardRepository::new(db);
        let rows = repo.enrolled_revenue_rows().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fees, Some(10_000));
        assert_eq!(rows[1].course_id, None);
    }

    #[test]
    fn test_revenue_query_keeps_enquiries_without_course() {
        let sql = Enquiry::find()
            .select_only()
            .column(enquiry::Column::Id)
            .join(JoinType::LeftJoin, enquiry::Relation::Course.def())
            .join(JoinType::LeftJoin, course::Relation::Category.def())
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LEFT JOIN "course""#), "{sql}");
        assert!(sql.contains(r#"LEFT JOIN "category""#), "{sql}");
    }

    #[tokio::test]
    async fn test_popular_courses() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "course_id" => Value::String(Some(Box::new("c1".to_string()))),
                    "title" => Value::String(Some(Box::new("Full Stack".to_string()))),
                    "enquiries" => Value::BigInt(Some(12)),
                }]])
                .into_connection(),
        );

        let repo = DashboardRepository::new(db);
        let courses = repo.popular_courses(6).await.unwrap();

        assert_eq!(
            courses,
            vec![CourseEnquiryCount {
                course_id: "c1".to_string(),
                title: "Full Stack".to_string(),
                enquiries: 12,
            }]
        );
    }
}
