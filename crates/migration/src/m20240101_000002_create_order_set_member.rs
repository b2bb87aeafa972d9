use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderSetMember::Table)
                    .if_not_exists()
                    .col(pk_auto(OrderSetMember::Id))
                    .col(uuid_uniq(OrderSetMember::Uuid))
                    .col(integer(OrderSetMember::OrderSetId))
                    .col(string_len(OrderSetMember::MemberType, 32))
                    .col(integer_null(OrderSetMember::ConceptId))
                    .col(integer_null(OrderSetMember::NestedOrderSetId))
                    .col(integer_null(OrderSetMember::SortWeight))
                    .col(timestamp_with_time_zone(OrderSetMember::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_set_member_order_set")
                            .from(OrderSetMember::Table, OrderSetMember::OrderSetId)
                            .to(OrderSet::Table, OrderSet::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_set_member_nested_order_set")
                            .from(OrderSetMember::Table, OrderSetMember::NestedOrderSetId)
                            .to(OrderSet::Table, OrderSet::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OrderSetMember::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OrderSetMember {
    Table,
    Id,
    Uuid,
    OrderSetId,
    MemberType,
    ConceptId,
    NestedOrderSetId,
    SortWeight,
    CreatedAt,
}

#[derive(DeriveIden)]
enum OrderSet { Table, Id }
