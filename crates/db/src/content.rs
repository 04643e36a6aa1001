//! Shape shared by the public marketing tables.
//!
//! Courses, blogs, testimonials, placements, FAQs and faculty profiles are
//! all rows with an `isPublic` flag (and, except for FAQs, an `isFeatured`
//! flag) that admins toggle from the back office.

use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};

/// A table of publishable content.
pub trait ContentEntity: EntityTrait<Model: Serialize + Sync> {
    /// Human readable name used in error messages.
    const LABEL: &'static str;

    fn id_column() -> Self::Column;
    fn created_at_column() -> Self::Column;
    fn public_column() -> Self::Column;

    /// `None` for tables that cannot be featured.
    fn featured_column() -> Option<Self::Column>;
}

/// Explicit flag values to store. `None` leaves a flag unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visibility {
    pub is_public: Option<bool>,
    pub is_featured: Option<bool>,
}

impl Visibility {
    /// Whether the request changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_public.is_none() && self.is_featured.is_none()
    }
}
