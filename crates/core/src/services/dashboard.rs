//! Admin dashboard aggregation.
//!
//! A snapshot is computed fresh for every request from independent reads
//! that are issued concurrently. If any read fails the whole snapshot fails;
//! callers never see partial data.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use institute_common::{AppResult, config::DashboardConfig};
use institute_db::{
    entities::{
        Blog, Course, EnterpriseEnquiry, Enquiry, FacultyEnquiry, Placement, Testimonial,
        enquiry::EnquiryStatus,
        enterprise_enquiry::EnterpriseEnquiryStatus,
        faculty_enquiry::FacultyEnquiryStatus,
        user::UserRole,
    },
    lead::{LeadScope, LeadStatus},
    repositories::{
        ContentRepository, CourseEnquiryCount, DashboardRepository, EnrolledRevenueRow,
        LeadRepository, UserRepository,
    },
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::debug;

/// Length of the "last 30 days" comparison window.
const GROWTH_WINDOW_DAYS: i64 = 30;

/// Points in every daily trend series.
pub const TREND_DAYS: u32 = 30;

/// Category name for courses without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Count of leads in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunnelStage {
    pub status: &'static str,
    pub count: u64,
}

/// One agent on the enrolment leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPerformance {
    pub agent_id: String,
    pub name: String,
    pub enrolled: u64,
}

/// One course on the popularity chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularCourse {
    pub course_id: String,
    pub title: String,
    pub enquiries: u64,
}

/// Enrolled revenue of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: i64,
}

/// Rows created on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Accounts holding one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleCount {
    pub role: UserRole,
    pub count: u64,
}

/// Headline totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_students: u64,
    pub total_courses: u64,
    pub total_enquiries: u64,
    pub new_enquiries: u64,
    pub total_enterprise_enquiries: u64,
    pub total_faculty_enquiries: u64,
    pub total_blogs: u64,
    pub public_blogs: u64,
    pub total_testimonials: u64,
    pub featured_testimonials: u64,
    pub total_placements: u64,
}

/// Everything the admin dashboard renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub student_growth: String,
    pub total_revenue: i64,
    pub enquiry_funnel: Vec<FunnelStage>,
    pub hiring_pipeline: Vec<FunnelStage>,
    pub enterprise_pipeline: Vec<FunnelStage>,
    pub top_agents: Vec<AgentPerformance>,
    pub popular_courses: Vec<PopularCourse>,
    pub revenue_by_category: Vec<CategoryRevenue>,
    pub blog_activity: Vec<DailyCount>,
    pub user_registration_trend: Vec<DailyCount>,
    pub users_by_role: Vec<RoleCount>,
    pub overview: Overview,
    pub as_of: DateTime<Utc>,
}

fn to_u64(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

/// Percentage change from `baseline` to `current`, e.g. `"12.5%"`.
///
/// Rounded to one decimal with a trailing `.0` dropped; exactly `"0%"` when
/// the baseline is zero.
#[must_use]
pub fn growth_percentage(baseline: u64, current: u64) -> String {
    if baseline == 0 {
        return "0%".to_string();
    }

    let change = (current as f64 - baseline as f64) / baseline as f64 * 100.0;
    let rounded = (change * 10.0).round() / 10.0;

    if rounded == 0.0 {
        "0%".to_string()
    } else if rounded.fract() == 0.0 {
        format!("{}%", rounded as i64)
    } else {
        format!("{rounded:.1}%")
    }
}

/// Bucket `timestamps` into `days` consecutive UTC days starting at
/// `first_day`. Days without rows are present with a zero count.
#[must_use]
pub fn daily_series(timestamps: &[DateTime<Utc>], first_day: NaiveDate, days: u32) -> Vec<DailyCount> {
    let mut buckets: BTreeMap<NaiveDate, u64> = first_day
        .iter_days()
        .take(days as usize)
        .map(|date| (date, 0))
        .collect();

    for ts in timestamps {
        if let Some(count) = buckets.get_mut(&ts.date_naive()) {
            *count += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

/// Total enrolled revenue and its split per category.
///
/// Enquiries without a course earn nothing. Courses without a category are
/// grouped under [`UNCATEGORIZED`], so the split always sums to the total.
/// Categories are ordered by revenue descending, then name.
#[must_use]
pub fn revenue_summary(rows: &[EnrolledRevenueRow]) -> (i64, Vec<CategoryRevenue>) {
    let mut by_category: BTreeMap<&str, i64> = BTreeMap::new();
    let mut total = 0;

    for row in rows {
        if row.course_id.is_none() {
            continue;
        }
        let net = row.fees.unwrap_or(0) - row.discount.unwrap_or(0);
        total += net;
        *by_category
            .entry(row.category.as_deref().unwrap_or(UNCATEGORIZED))
            .or_default() += net;
    }

    let mut categories: Vec<CategoryRevenue> = by_category
        .into_iter()
        .map(|(category, revenue)| CategoryRevenue {
            category: category.to_string(),
            revenue,
        })
        .collect();
    categories.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.category.cmp(&b.category)));

    (total, categories)
}

/// Per-status counts in funnel order, zero for statuses without rows.
#[must_use]
pub fn funnel<S: LeadStatus>(rows: &[(S, i64)]) -> Vec<FunnelStage> {
    S::ORDERED
        .iter()
        .map(|status| FunnelStage {
            status: status.as_str(),
            count: rows
                .iter()
                .filter(|(s, _)| s == status)
                .map(|(_, n)| to_u64(*n))
                .sum(),
        })
        .collect()
}

/// Counts for every role in display order.
#[must_use]
pub fn role_breakdown(rows: &[(UserRole, i64)]) -> Vec<RoleCount> {
    UserRole::ALL
        .into_iter()
        .map(|role| RoleCount {
            role,
            count: rows
                .iter()
                .filter(|(r, _)| *r == role)
                .map(|(_, n)| to_u64(*n))
                .sum(),
        })
        .collect()
}

/// First day of the trailing trend window ending on `as_of`'s date.
fn trend_start(as_of: DateTime<Utc>, days: u32) -> NaiveDate {
    let today = as_of.date_naive();
    today - Duration::days(i64::from(days.max(1)) - 1)
}

/// Time ranges a snapshot reads, all half-open `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotWindows {
    /// The 30 days before the current window.
    pub baseline: (DateTime<Utc>, DateTime<Utc>),
    /// The 30 days ending at `as_of`.
    pub current: (DateTime<Utc>, DateTime<Utc>),
    /// First day of the trend series.
    pub first_day: NaiveDate,
    /// Midnight UTC of `first_day` up to `as_of`.
    pub trend: (DateTime<Utc>, DateTime<Utc>),
}

impl SnapshotWindows {
    /// Windows of a snapshot taken at `as_of`.
    #[must_use]
    pub fn at(as_of: DateTime<Utc>) -> Self {
        let window = Duration::days(GROWTH_WINDOW_DAYS);
        let current_start = as_of - window;
        let first_day = trend_start(as_of, TREND_DAYS);

        Self {
            baseline: (current_start - window, current_start),
            current: (current_start, as_of),
            first_day,
            trend: (first_day.and_time(chrono::NaiveTime::MIN).and_utc(), as_of),
        }
    }
}

/// Raw results of every snapshot read, before folding.
#[derive(Debug, Clone, Default)]
pub struct SnapshotReads {
    pub baseline_students: u64,
    pub current_students: u64,
    pub revenue_rows: Vec<EnrolledRevenueRow>,
    pub enquiry_statuses: Vec<(EnquiryStatus, i64)>,
    pub faculty_statuses: Vec<(FacultyEnquiryStatus, i64)>,
    pub enterprise_statuses: Vec<(EnterpriseEnquiryStatus, i64)>,
    pub top_agents: Vec<AgentPerformance>,
    pub popular_courses: Vec<CourseEnquiryCount>,
    pub blog_timestamps: Vec<DateTime<Utc>>,
    pub user_timestamps: Vec<DateTime<Utc>>,
    pub role_counts: Vec<(UserRole, i64)>,
    pub overview: Overview,
}

/// Fold the reads of a snapshot into what the dashboard renders.
#[must_use]
pub fn assemble(
    reads: SnapshotReads,
    windows: &SnapshotWindows,
    as_of: DateTime<Utc>,
) -> DashboardData {
    let (total_revenue, revenue_by_category) = revenue_summary(&reads.revenue_rows);

    DashboardData {
        student_growth: growth_percentage(reads.baseline_students, reads.current_students),
        total_revenue,
        enquiry_funnel: funnel(&reads.enquiry_statuses),
        hiring_pipeline: funnel(&reads.faculty_statuses),
        enterprise_pipeline: funnel(&reads.enterprise_statuses),
        top_agents: reads.top_agents,
        popular_courses: reads
            .popular_courses
            .into_iter()
            .map(|CourseEnquiryCount { course_id, title, enquiries }| PopularCourse {
                course_id,
                title,
                enquiries: to_u64(enquiries),
            })
            .collect(),
        revenue_by_category,
        blog_activity: daily_series(&reads.blog_timestamps, windows.first_day, TREND_DAYS),
        user_registration_trend: daily_series(&reads.user_timestamps, windows.first_day, TREND_DAYS),
        users_by_role: role_breakdown(&reads.role_counts),
        overview: reads.overview,
        as_of,
    }
}

/// Computes dashboard snapshots.
#[derive(Clone)]
pub struct DashboardService {
    users: UserRepository,
    enquiries: LeadRepository<Enquiry>,
    enterprise_enquiries: LeadRepository<EnterpriseEnquiry>,
    faculty_enquiries: LeadRepository<FacultyEnquiry>,
    courses: ContentRepository<Course>,
    blogs: ContentRepository<Blog>,
    testimonials: ContentRepository<Testimonial>,
    placements: ContentRepository<Placement>,
    dashboard_repo: DashboardRepository,
    config: DashboardConfig,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: DashboardConfig) -> Self {
        Self {
            users: UserRepository::new(Arc::clone(&db)),
            enquiries: LeadRepository::new(Arc::clone(&db)),
            enterprise_enquiries: LeadRepository::new(Arc::clone(&db)),
            faculty_enquiries: LeadRepository::new(Arc::clone(&db)),
            courses: ContentRepository::new(Arc::clone(&db)),
            blogs: ContentRepository::new(Arc::clone(&db)),
            testimonials: ContentRepository::new(Arc::clone(&db)),
            placements: ContentRepository::new(Arc::clone(&db)),
            dashboard_repo: DashboardRepository::new(db),
            config,
        }
    }

    /// Compute the snapshot as seen at `as_of`.
    pub async fn snapshot(&self, as_of: DateTime<Utc>) -> AppResult<DashboardData> {
        let windows = SnapshotWindows::at(as_of);
        let (baseline_from, baseline_to) = windows.baseline;
        let (current_from, current_to) = windows.current;
        let (trend_from, trend_to) = windows.trend;

        let (
            baseline_students,
            current_students,
            revenue_rows,
            enquiry_statuses,
            faculty_statuses,
            enterprise_statuses,
            top_agents,
            popular_courses,
            blog_timestamps,
            user_timestamps,
            role_counts,
            overview,
        ) = tokio::try_join!(
            self.users
                .count_students_created_between(baseline_from, baseline_to),
            self.users
                .count_students_created_between(current_from, current_to),
            self.dashboard_repo.enrolled_revenue_rows(),
            self.enquiries.count_by_status(&LeadScope::All, None),
            self.faculty_enquiries.count_by_status(&LeadScope::All, None),
            self.enterprise_enquiries.count_by_status(&LeadScope::All, None),
            self.top_agents(),
            self.dashboard_repo
                .popular_courses(self.config.popular_courses_limit),
            self.blogs.created_at_between(trend_from, trend_to),
            self.users.created_at_between(trend_from, trend_to),
            self.users.count_by_role(),
            self.overview(current_from, current_to),
        )?;

        debug!(
            as_of = %as_of,
            enrolled = revenue_rows.len(),
            "Dashboard reads complete"
        );

        Ok(assemble(
            SnapshotReads {
                baseline_students,
                current_students,
                revenue_rows,
                enquiry_statuses,
                faculty_statuses,
                enterprise_statuses,
                top_agents,
                popular_courses,
                blog_timestamps,
                user_timestamps,
                role_counts,
                overview,
            },
            &windows,
            as_of,
        ))
    }

    /// Agents with the most enrolments, with display names.
    async fn top_agents(&self) -> AppResult<Vec<AgentPerformance>> {
        let ranked = self
            .enquiries
            .top_assignees(EnquiryStatus::Enrolled, self.config.top_agents_limit)
            .await?;
        if ranked.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = ranked.iter().map(|(id, _)| id.clone()).collect();
        let names: BTreeMap<String, String> = self
            .users
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.name))
            .collect();

        Ok(ranked
            .into_iter()
            .map(|(agent_id, enrolled)| AgentPerformance {
                name: names.get(&agent_id).cloned().unwrap_or_else(|| agent_id.clone()),
                agent_id,
                enrolled: to_u64(enrolled),
            })
            .collect())
    }

    async fn overview(&self, recent_from: DateTime<Utc>, as_of: DateTime<Utc>) -> AppResult<Overview> {
        let (
            total_students,
            total_courses,
            total_enquiries,
            new_enquiries,
            total_enterprise_enquiries,
            total_faculty_enquiries,
            total_blogs,
            public_blogs,
            total_testimonials,
            featured_testimonials,
            total_placements,
        ) = tokio::try_join!(
            self.users.count_students(),
            self.courses.count(),
            self.enquiries.count(),
            self.enquiries.count_created_between(recent_from, as_of),
            self.enterprise_enquiries.count(),
            self.faculty_enquiries.count(),
            self.blogs.count(),
            self.blogs.count_public(),
            self.testimonials.count(),
            self.testimonials.count_featured(),
            self.placements.count(),
        )?;

        Ok(Overview {
            total_students,
            total_courses,
            total_enquiries,
            new_enquiries,
            total_enterprise_enquiries,
            total_faculty_enquiries,
            total_blogs,
            public_blogs,
            total_testimonials,
            featured_testimonials,
            total_placements,
        })
    }
}
