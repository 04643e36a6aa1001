//! Student enquiry entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entities::user::UserRole;
use crate::lead::{LeadEntity, LeadKind, LeadStatus};

/// Pipeline stage of a student enquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnquiryStatus {
    #[sea_orm(string_value = "NEW")]
    New,
    #[sea_orm(string_value = "CONTACTED")]
    Contacted,
    #[sea_orm(string_value = "ENROLLED")]
    Enrolled,
    #[sea_orm(string_value = "DEAD")]
    Dead,
    #[sea_orm(string_value = "ARCHIVED")]
    Archived,
}

impl LeadStatus for EnquiryStatus {
    const NEW: Self = Self::New;
    const ORDERED: &'static [Self] = &[
        Self::New,
        Self::Contacted,
        Self::Enrolled,
        Self::Dead,
        Self::Archived,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Contacted => "CONTACTED",
            Self::Enrolled => "ENROLLED",
            Self::Dead => "DEAD",
            Self::Archived => "ARCHIVED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enquiry")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    pub email: String,

    pub phone: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,

    /// Course the student asked about.
    #[sea_orm(nullable)]
    pub course_id: Option<String>,

    /// Sales agent handling the lead.
    #[sea_orm(nullable)]
    pub agent_id: Option<String>,

    pub status: EnquiryStatus,

    /// Internal staff note, never shown to the submitter.
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub remark: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "SetNull"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AgentId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Agent,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl LeadEntity for Entity {
    type Status = EnquiryStatus;

    const KIND: LeadKind = LeadKind::Student;
    const LABEL: &'static str = "Enquiry";

    fn id_column() -> Column {
        Column::Id
    }

    fn status_column() -> Column {
        Column::Status
    }

    fn assignee_column() -> Column {
        Column::AgentId
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
        role == UserRole::Agent
    }
}
