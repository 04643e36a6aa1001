//! The shape shared by every enquiry table.
//!
//! Student, enterprise and faculty enquiries follow one lifecycle: a status
//! column driven by staff, an optional assignee, free-text `note`/`remark`
//! fields and a creation timestamp. [`LeadEntity`] names those columns so the
//! repository and the workflow service are written once.
//!
//! Whether a `NEW` lead is "assigned" is never stored. It is the predicate
//! `assignee IS NOT NULL`, see [`SubStatus`].

use std::fmt::Debug;

use sea_orm::{ActiveEnum, EntityTrait, TryGetable};
use serde::{Serialize, de::DeserializeOwned};

use crate::entities::user::UserRole;

/// Status enum of one lead table.
pub trait LeadStatus:
    ActiveEnum<Value = String>
    + Into<sea_orm::Value>
    + TryGetable
    + Copy
    + Eq
    + Debug
    + Send
    + Sync
    + Serialize
    + DeserializeOwned
    + 'static
{
    /// Status of every fresh submission.
    const NEW: Self;

    /// Funnel order, `NEW` first and `ARCHIVED` last.
    const ORDERED: &'static [Self];

    /// Upper-case name as stored and rendered.
    fn as_str(self) -> &'static str;

    /// Parse a status name, ignoring case and surrounding whitespace.
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ORDERED
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw))
    }
}

/// Which of the three lead tables a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LeadKind {
    Student,
    Enterprise,
    Faculty,
}

/// A table that holds leads.
pub trait LeadEntity: EntityTrait<Model: Serialize + Sync> {
    /// Status enum stored in [`Self::status_column`].
    type Status: LeadStatus;

    /// Which table this is.
    const KIND: LeadKind;

    /// Human readable name used in error messages.
    const LABEL: &'static str;

    fn id_column() -> Self::Column;
    fn status_column() -> Self::Column;
    fn assignee_column() -> Self::Column;
    fn note_column() -> Self::Column;
    fn remark_column() -> Self::Column;
    fn created_at_column() -> Self::Column;

    /// Columns matched by the free-text search box.
    fn search_columns() -> &'static [Self::Column];

    /// Whether a user holding `role` may be put in charge of a lead.
    fn accepts_assignee(role: UserRole) -> bool;
}

/// Split of the `NEW` column into the "New" and "Assigned" tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubStatus {
    Assigned,
    Unassigned,
}

impl SubStatus {
    /// Parse `assigned` / `unassigned`, ignoring case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "assigned" => Some(Self::Assigned),
            "unassigned" => Some(Self::Unassigned),
            _ => None,
        }
    }
}

/// Rows a caller is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadScope {
    /// Every row of the table.
    All,
    /// Only rows whose assignee is the given user.
    AssignedTo(String),
}

/// Filters shared by the list and count queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadFilter<S> {
    pub status: Option<S>,
    pub sub_status: Option<SubStatus>,
    pub search: Option<String>,
}

impl<S> Default for LeadFilter<S> {
    fn default() -> Self {
        Self {
            status: None,
            sub_status: None,
            search: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::enquiry::EnquiryStatus;
    use crate::entities::faculty_enquiry::FacultyEnquiryStatus;

    #[test]
    fn test_parse_status_ignores_case() {
        assert_eq!(EnquiryStatus::parse("enrolled"), Some(EnquiryStatus::Enrolled));
        assert_eq!(
            FacultyEnquiryStatus::parse(" Hired "),
            Some(FacultyEnquiryStatus::Hired)
        );
        assert_eq!(EnquiryStatus::parse("HIRED"), None);
    }

    #[test]
    fn test_funnel_order_starts_new_ends_archived() {
        assert_eq!(EnquiryStatus::ORDERED.first(), Some(&EnquiryStatus::NEW));
        assert_eq!(
            EnquiryStatus::ORDERED.last(),
            Some(&EnquiryStatus::Archived)
        );
    }

    #[test]
    fn test_parse_sub_status() {
        assert_eq!(SubStatus::parse("Assigned"), Some(SubStatus::Assigned));
        assert_eq!(SubStatus::parse("unassigned"), Some(SubStatus::Unassigned));
        assert_eq!(SubStatus::parse("pending"), None);
    }
}
