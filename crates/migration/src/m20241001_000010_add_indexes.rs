use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ServiceProfessional: index on service_id（删除服务时的依赖检查）
        manager
            .create_index(
                Index::create()
                    .name("idx_professional_service")
                    .table(ServiceProfessional::Table)
                    .col(ServiceProfessional::ServiceId)
                    .to_owned(),
            )
            .await?;

        // ServiceRequest: status + service（专业人员查看待接单请求）
        manager
            .create_index(
                Index::create()
                    .name("idx_request_status_service")
                    .table(ServiceRequest::Table)
                    .col(ServiceRequest::Status)
                    .col(ServiceRequest::ServiceId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_request_customer")
                    .table(ServiceRequest::Table)
                    .col(ServiceRequest::CustomerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_request_professional")
                    .table(ServiceRequest::Table)
                    .col(ServiceRequest::ProfessionalId)
                    .to_owned(),
            )
            .await?;

        // Review: one review per (request, customer)
        manager
            .create_index(
                Index::create()
                    .name("uniq_review_request_customer")
                    .table(Review::Table)
                    .col(Review::ServiceRequestId)
                    .col(Review::CustomerId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_professional_service").table(ServiceProfessional::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_request_status_service").table(ServiceRequest::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_request_customer").table(ServiceRequest::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_request_professional").table(ServiceRequest::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_review_request_customer").table(Review::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceProfessional { Table, ServiceId }

#[derive(DeriveIden)]
enum ServiceRequest { Table, Status, ServiceId, CustomerId, ProfessionalId }

#[derive(DeriveIden)]
enum Review { Table, ServiceRequestId, CustomerId }
