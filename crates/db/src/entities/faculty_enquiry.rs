//! Faculty application entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entities::user::UserRole;
use crate::lead::{LeadEntity, LeadKind, LeadStatus};

/// Hiring stage of a faculty application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FacultyEnquiryStatus {
    #[sea_orm(string_value = "NEW")]
    New,
    #[sea_orm(string_value = "CONTACTED")]
    Contacted,
    #[sea_orm(string_value = "HIRED")]
    Hired,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
    #[sea_orm(string_value = "ARCHIVED")]
    Archived,
}

impl LeadStatus for FacultyEnquiryStatus {
    const NEW: Self = Self::New;
    const ORDERED: &'static [Self] = &[
        Self::New,
        Self::Contacted,
        Self::Hired,
        Self::Closed,
        Self::Archived,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Contacted => "CONTACTED",
            Self::Hired => "HIRED",
            Self::Closed => "CLOSED",
            Self::Archived => "ARCHIVED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faculty_enquiry")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    pub email: String,

    pub phone: String,

    /// Hosted resume URL.
    #[sea_orm(nullable)]
    pub resume_url: Option<String>,

    /// Earliest date the applicant can start.
    #[sea_orm(nullable)]
    pub available_date: Option<Date>,

    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    /// HR user screening the application.
    #[sea_orm(nullable)]
    pub assigned_to_id: Option<String>,

    pub status: FacultyEnquiryStatus,

    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub remark: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AssignedToId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    AssignedTo,
}

impl ActiveModelBehavior for ActiveModel {}

impl LeadEntity for Entity {
    type Status = FacultyEnquiryStatus;

    const KIND: LeadKind = LeadKind::Faculty;
    const LABEL: &'static str = "Faculty enquiry";

    fn id_column() -> Column {
        Column::Id
    }

    fn status_column() -> Column {
        Column::Status
    }

    fn assignee_column() -> Column {
        Column::AssignedToId
    }

    fn note_column() -> Column {
        Column::Note
    }

    fn remark_column() -> Column {
        Column::Remark
    }

    fn created_at_column() -> Column {
        Column::CreatedAt
    }

    fn search_columns() -> &'static [Column] {
        &[Column::Name, Column::Email, Column::Phone]
    }

    fn accepts_assignee(role: UserRole) -> bool {
        role == UserRole::Hr
    }
}
