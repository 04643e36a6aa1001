//! Enterprise (corporate training) enquiry entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entities::user::UserRole;
use crate::lead::{LeadEntity, LeadKind, LeadStatus};

/// Pipeline stage of an enterprise enquiry.
///
/// "Assigned" is not a stage: it is a `NEW` enquiry with an assignee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnterpriseEnquiryStatus {
    #[sea_orm(string_value = "NEW")]
    New,
    #[sea_orm(string_value = "CONTACTED")]
    Contacted,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
    #[sea_orm(string_value = "ARCHIVED")]
    Archived,
}

impl LeadStatus for EnterpriseEnquiryStatus {
    const NEW: Self = Self::New;
    const ORDERED: &'static [Self] = &[
        Self::New,
        Self::Contacted,
        Self::Completed,
        Self::Closed,
        Self::Archived,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Contacted => "CONTACTED",
            Self::Completed => "COMPLETED",
            Self::Closed => "CLOSED",
            Self::Archived => "ARCHIVED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enterprise_enquiry")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub company_name: String,

    pub email: String,

    pub phone: String,

    /// Requested training duration, free text ("3 months").
    #[sea_orm(nullable)]
    pub duration: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    #[sea_orm(nullable)]
    pub assigned_to_id: Option<String>,

    pub status: EnterpriseEnquiryStatus,

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
    type Status = EnterpriseEnquiryStatus;

    const KIND: LeadKind = LeadKind::Enterprise;
    const LABEL: &'static str = "Enterprise enquiry";

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
        &[Column::CompanyName, Column::Email, Column::Phone]
    }

    fn accepts_assignee(role: UserRole) -> bool {
        role.is_staff()
    }
}
