//! Create the three enquiry tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enquiry::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Enquiry::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Enquiry::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Enquiry::Email).string_len(320).not_null())
                    .col(ColumnDef::new(Enquiry::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(Enquiry::Message).text())
                    .col(ColumnDef::new(Enquiry::CourseId).string_len(32))
                    .col(ColumnDef::new(Enquiry::AgentId).string_len(32))
                    .col(ColumnDef::new(Enquiry::Status).string_len(16).not_null().default("NEW"))
                    .col(ColumnDef::new(Enquiry::Note).text())
                    .col(ColumnDef::new(Enquiry::Remark).text())
                    .col(
                        ColumnDef::new(Enquiry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enquiry_course_id")
                            .from(Enquiry::Table, Enquiry::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enquiry_agent_id")
                            .from(Enquiry::Table, Enquiry::AgentId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enquiry_status_agent_id")
                    .table(Enquiry::Table)
                    .col(Enquiry::Status)
                    .col(Enquiry::AgentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enquiry_course_id")
                    .table(Enquiry::Table)
                    .col(Enquiry::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EnterpriseEnquiry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnterpriseEnquiry::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EnterpriseEnquiry::CompanyName).string_len(256).not_null())
                    .col(ColumnDef::new(EnterpriseEnquiry::Email).string_len(320).not_null())
                    .col(ColumnDef::new(EnterpriseEnquiry::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(EnterpriseEnquiry::Duration).string_len(128))
                    .col(ColumnDef::new(EnterpriseEnquiry::Message).text())
                    .col(ColumnDef::new(EnterpriseEnquiry::AssignedToId).string_len(32))
                    .col(
                        ColumnDef::new(EnterpriseEnquiry::Status)
                            .string_len(16)
                            .not_null()
                            .default("NEW"),
                    )
                    .col(ColumnDef::new(EnterpriseEnquiry::Note).text())
                    .col(ColumnDef::new(EnterpriseEnquiry::Remark).text())
                    .col(
                        ColumnDef::new(EnterpriseEnquiry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enterprise_enquiry_assigned_to_id")
                            .from(EnterpriseEnquiry::Table, EnterpriseEnquiry::AssignedToId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enterprise_enquiry_status_assigned_to_id")
                    .table(EnterpriseEnquiry::Table)
                    .col(EnterpriseEnquiry::Status)
                    .col(EnterpriseEnquiry::AssignedToId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FacultyEnquiry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FacultyEnquiry::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FacultyEnquiry::Name).string_len(256).not_null())
                    .col(ColumnDef::new(FacultyEnquiry::Email).string_len(320).not_null())
                    .col(ColumnDef::new(FacultyEnquiry::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(FacultyEnquiry::ResumeUrl).string_len(1024))
                    .col(ColumnDef::new(FacultyEnquiry::AvailableDate).date())
                    .col(ColumnDef::new(FacultyEnquiry::Message).text())
                    .col(ColumnDef::new(FacultyEnquiry::AssignedToId).string_len(32))
                    .col(
                        ColumnDef::new(FacultyEnquiry::Status)
                            .string_len(16)
                            .not_null()
                            .default("NEW"),
                    )
                    .col(ColumnDef::new(FacultyEnquiry::Note).text())
                    .col(ColumnDef::new(FacultyEnquiry::Remark).text())
                    .col(
                        ColumnDef::new(FacultyEnquiry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_faculty_enquiry_assigned_to_id")
                            .from(FacultyEnquiry::Table, FacultyEnquiry::AssignedToId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // HR views filter on the assignee first
        manager
            .create_index(
                Index::create()
                    .name("idx_faculty_enquiry_assigned_to_id_status")
                    .table(FacultyEnquiry::Table)
                    .col(FacultyEnquiry::AssignedToId)
                    .col(FacultyEnquiry::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FacultyEnquiry::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EnterpriseEnquiry::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enquiry::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Course {
    Table,
    Id,
}

#[derive(Iden)]
enum Enquiry {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Message,
    CourseId,
    AgentId,
    Status,
    Note,
    Remark,
    CreatedAt,
}

#[derive(Iden)]
enum EnterpriseEnquiry {
    Table,
    Id,
    CompanyName,
    Email,
    Phone,
    Duration,
    Message,
    AssignedToId,
    Status,
    Note,
    Remark,
    CreatedAt,
}

#[derive(Iden)]
enum FacultyEnquiry {
    Table,
    Id,
    Name,
    Email,
    Phone,
    ResumeUrl,
    AvailableDate,
    Message,
    AssignedToId,
    Status,
    Note,
    Remark,
    CreatedAt,
}
