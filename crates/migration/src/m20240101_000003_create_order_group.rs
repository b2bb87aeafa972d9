use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderGroup::Table)
                    .if_not_exists()
                    .col(pk_auto(OrderGroup::Id))
                    .col(uuid_uniq(OrderGroup::Uuid))
                    .col(string_len(OrderGroup::GroupType, 32))
                    .col(integer_null(OrderGroup::OrderSetId))
                    .col(integer(OrderGroup::PatientId))
                    .col(integer_null(OrderGroup::CycleNumber))
                    .col(boolean(OrderGroup::Voided).default(false))
                    .col(string_null(OrderGroup::VoidReason))
                    .col(timestamp_with_time_zone_null(OrderGroup::VoidedAt))
                    .col(timestamp_with_time_zone(OrderGroup::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_group_order_set")
                            .from(OrderGroup::Table, OrderGroup::OrderSetId)
                            .to(OrderSet::Table, OrderSet::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OrderGroup::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OrderGroup {
    Table,
    Id,
    Uuid,
    GroupType,
    OrderSetId,
    PatientId,
    CycleNumber,
    Voided,
    VoidReason,
    VoidedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OrderSet { Table, Id }
