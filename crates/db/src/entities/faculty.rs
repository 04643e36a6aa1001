//! Faculty profile entity, shown on the public "our trainers" page.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::content::ContentEntity;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faculty")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    #[sea_orm(nullable)]
    pub designation: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    pub is_public: bool,

    pub is_featured: bool,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ContentEntity for Entity {
    const LABEL: &'static str = "Faculty";

    fn id_column() -> Column {
        Column::Id
    }

    fn created_at_column() -> Column {
        Column::CreatedAt
    }

    fn public_column() -> Column {
        Column::IsPublic
    }

    fn featured_column() -> Option<Column> {
        Some(Column::IsFeatured)
    }
}
