use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DrugOrder::Table)
                    .if_not_exists()
                    .col(pk_auto(DrugOrder::Id))
                    .col(uuid_uniq(DrugOrder::Uuid))
                    .col(integer_null(DrugOrder::GroupId))
                    .col(integer(DrugOrder::PatientId))
                    .col(integer(DrugOrder::DrugConceptId))
                    .col(integer_null(DrugOrder::IndicationConceptId))
                    .col(string_null(DrugOrder::AdministrationInstructions))
                    .col(timestamp_with_time_zone(DrugOrder::StartDate))
                    .col(timestamp_with_time_zone_null(DrugOrder::EndDate))
                    .col(boolean(DrugOrder::Voided).default(false))
                    .col(string_null(DrugOrder::VoidReason))
                    .col(timestamp_with_time_zone_null(DrugOrder::VoidedAt))
                    .col(timestamp_with_time_zone(DrugOrder::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_drug_order_order_group")
                            .from(DrugOrder::Table, DrugOrder::GroupId)
                            .to(OrderGroup::Table, OrderGroup::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(DrugOrder::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum DrugOrder {
    Table,
    Id,
    Uuid,
    GroupId,
    PatientId,
    DrugConceptId,
    IndicationConceptId,
    AdministrationInstructions,
    StartDate,
    EndDate,
    Voided,
    VoidReason,
    VoidedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OrderGroup { Table, Id }
