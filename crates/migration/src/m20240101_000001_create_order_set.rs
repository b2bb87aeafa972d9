use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderSet::Table)
                    .if_not_exists()
                    .col(pk_auto(OrderSet::Id))
                    .col(uuid_uniq(OrderSet::Uuid))
                    .col(string_len_null(OrderSet::Name, 255))
                    .col(string_null(OrderSet::Description))
                    .col(integer_null(OrderSet::IndicationConceptId))
                    .col(boolean(OrderSet::Cyclical).default(false))
                    .col(integer_null(OrderSet::CycleLengthDays))
                    .col(boolean(OrderSet::Retired).default(false))
                    .col(string_null(OrderSet::RetiredReason))
                    .col(timestamp_with_time_zone_null(OrderSet::RetiredAt))
                    .col(timestamp_with_time_zone(OrderSet::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OrderSet::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OrderSet {
    Table,
    Id,
    Uuid,
    Name,
    Description,
    IndicationConceptId,
    Cyclical,
    CycleLengthDays,
    Retired,
    RetiredReason,
    RetiredAt,
    CreatedAt,
}
