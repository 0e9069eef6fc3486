//! Create `service_request` table, the workflow entity.
//!
//! `status` holds one of `requested`, `accepted`, `closed`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceRequest::Table)
                    .if_not_exists()
                    .col(uuid(ServiceRequest::Id).primary_key())
                    .col(uuid(ServiceRequest::ServiceId).not_null())
                    .col(uuid(ServiceRequest::CustomerId).not_null())
                    .col(uuid_null(ServiceRequest::ProfessionalId))
                    .col(string_len(ServiceRequest::Status, 16).not_null())
                    .col(string_len_null(ServiceRequest::Remarks, 255))
                    .col(timestamp_with_time_zone(ServiceRequest::DateOfRequest).not_null())
                    .col(timestamp_with_time_zone_null(ServiceRequest::DateOfCompletion))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_service")
                            .from(ServiceRequest::Table, ServiceRequest::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_customer")
                            .from(ServiceRequest::Table, ServiceRequest::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_professional")
                            .from(ServiceRequest::Table, ServiceRequest::ProfessionalId)
                            .to(ServiceProfessional::Table, ServiceProfessional::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceRequest::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceRequest {
    Table,
    Id,
    ServiceId,
    CustomerId,
    ProfessionalId,
    Status,
    Remarks,
    DateOfRequest,
    DateOfCompletion,
}

#[derive(DeriveIden)]
enum Service { Table, Id }

#[derive(DeriveIden)]
enum Customer { Table, Id }

#[derive(DeriveIden)]
enum ServiceProfessional { Table, Id }
