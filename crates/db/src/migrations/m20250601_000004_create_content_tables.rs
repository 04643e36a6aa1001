//! Create the public content tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blog::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Blog::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Blog::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Blog::Slug).string_len(512).not_null())
                    .col(ColumnDef::new(Blog::Excerpt).text())
                    .col(ColumnDef::new(Blog::Content).text().not_null())
                    .col(ColumnDef::new(Blog::ImageUrl).string_len(1024))
                    .col(ColumnDef::new(Blog::AuthorId).string_len(32))
                    .col(ColumnDef::new(Blog::IsPublic).boolean().not_null().default(false))
                    .col(ColumnDef::new(Blog::IsFeatured).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Blog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_author_id")
                            .from(Blog::Table, Blog::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_slug")
                    .table(Blog::Table)
                    .col(Blog::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_created_at")
                    .table(Blog::Table)
                    .col(Blog::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Testimonial::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Testimonial::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Testimonial::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Testimonial::Designation).string_len(256))
                    .col(ColumnDef::new(Testimonial::Message).text().not_null())
                    .col(ColumnDef::new(Testimonial::ImageUrl).string_len(1024))
                    .col(ColumnDef::new(Testimonial::IsPublic).boolean().not_null().default(false))
                    .col(ColumnDef::new(Testimonial::IsFeatured).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Testimonial::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Placement::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Placement::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Placement::StudentName).string_len(256).not_null())
                    .col(ColumnDef::new(Placement::Company).string_len(256).not_null())
                    .col(ColumnDef::new(Placement::Designation).string_len(256))
                    .col(ColumnDef::new(Placement::Package).string_len(64))
                    .col(ColumnDef::new(Placement::ImageUrl).string_len(1024))
                    .col(ColumnDef::new(Placement::IsPublic).boolean().not_null().default(false))
                    .col(ColumnDef::new(Placement::IsFeatured).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Placement::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Faq::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Faq::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Faq::Question).text().not_null())
                    .col(ColumnDef::new(Faq::Answer).text().not_null())
                    .col(ColumnDef::new(Faq::IsPublic).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Faq::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Faculty::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Faculty::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Faculty::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Faculty::Designation).string_len(256))
                    .col(ColumnDef::new(Faculty::Bio).text())
                    .col(ColumnDef::new(Faculty::ImageUrl).string_len(1024))
                    .col(ColumnDef::new(Faculty::IsPublic).boolean().not_null().default(false))
                    .col(ColumnDef::new(Faculty::IsFeatured).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Faculty::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Faculty::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Faq::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Placement::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Testimonial::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Blog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Blog {
    Table,
    Id,
    Title,
    Slug,
    Excerpt,
    Content,
    ImageUrl,
    AuthorId,
    IsPublic,
    IsFeatured,
    CreatedAt,
}

#[derive(Iden)]
enum Testimonial {
    Table,
    Id,
    Name,
    Designation,
    Message,
    ImageUrl,
    IsPublic,
    IsFeatured,
    CreatedAt,
}

#[derive(Iden)]
enum Placement {
    Table,
    Id,
    StudentName,
    Company,
    Designation,
    Package,
    ImageUrl,
    IsPublic,
    IsFeatured,
    CreatedAt,
}

#[derive(Iden)]
enum Faq {
    Table,
    Id,
    Question,
    Answer,
    IsPublic,
    CreatedAt,
}

#[derive(Iden)]
enum Faculty {
    Table,
    Id,
    Name,
    Designation,
    Bio,
    ImageUrl,
    IsPublic,
    IsFeatured,
    CreatedAt,
}
