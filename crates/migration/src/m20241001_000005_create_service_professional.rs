//! Create `service_professional` table with FKs to `user` and `service`.
//!
//! The FK to `service` restricts deletes: a catalog entry offered by a
//! professional cannot be removed.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceProfessional::Table)
                    .if_not_exists()
                    .col(uuid(ServiceProfessional::Id).primary_key())
                    .col(uuid(ServiceProfessional::UserId).unique_key().not_null())
                    .col(uuid(ServiceProfessional::ServiceId).not_null())
                    .col(string_len(ServiceProfessional::ServiceType, 120).not_null())
                    .col(double(ServiceProfessional::Experience).not_null())
                    .col(double(ServiceProfessional::Rating).default(0.0).not_null())
                    .col(string_len_null(ServiceProfessional::ResumeRef, 255))
                    .col(string_len_null(ServiceProfessional::Address, 255))
                    .col(string_len_null(ServiceProfessional::PinCode, 10))
                    .col(string_len_null(ServiceProfessional::Description, 255))
                    .col(boolean(ServiceProfessional::IsApproved).default(false).not_null())
                    .col(timestamp_with_time_zone(ServiceProfessional::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_professional_user")
                            .from(ServiceProfessional::Table, ServiceProfessional::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_professional_service")
                            .from(ServiceProfessional::Table, ServiceProfessional::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceProfessional::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceProfessional {
    Table,
    Id,
    UserId,
    ServiceId,
    ServiceType,
    Experience,
    Rating,
    ResumeRef,
    Address,
    PinCode,
    Description,
    IsApproved,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Service { Table, Id }
