use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // OrderSet: name listing is ordered and substring-filtered
        manager
            .create_index(
                Index::create()
                    .name("idx_order_set_name")
                    .table(OrderSet::Table)
                    .col(OrderSet::Name)
                    .to_owned(),
            )
            .await?;

        // OrderSetMember: parent-set traversal keys on the nested set
        manager
            .create_index(
                Index::create()
                    .name("idx_order_set_member_nested")
                    .table(OrderSetMember::Table)
                    .col(OrderSetMember::NestedOrderSetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_set_member_set")
                    .table(OrderSetMember::Table)
                    .col(OrderSetMember::OrderSetId)
                    .to_owned(),
            )
            .await?;

        // OrderGroup: patient-scoped lookups and the cycle aggregate
        manager
            .create_index(
                Index::create()
                    .name("idx_order_group_patient")
                    .table(OrderGroup::Table)
                    .col(OrderGroup::PatientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_group_order_set")
                    .table(OrderGroup::Table)
                    .col(OrderGroup::OrderSetId)
                    .to_owned(),
            )
            .await?;

        // DrugOrder: date-window queries per patient, group join
        manager
            .create_index(
                Index::create()
                    .name("idx_drug_order_patient_start")
                    .table(DrugOrder::Table)
                    .col(DrugOrder::PatientId)
                    .col(DrugOrder::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_drug_order_group")
                    .table(DrugOrder::Table)
                    .col(DrugOrder::GroupId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_index(Index::drop().name("idx_drug_order_group").table(DrugOrder::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_drug_order_patient_start").table(DrugOrder::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_order_group_order_set").table(OrderGroup::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_order_group_patient").table(OrderGroup::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_order_set_member_set").table(OrderSetMember::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_order_set_member_nested").table(OrderSetMember::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_order_set_name").table(OrderSet::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum OrderSet { Table, Name }

#[derive(DeriveIden)]
enum OrderSetMember { Table, OrderSetId, NestedOrderSetId }

#[derive(DeriveIden)]
enum OrderGroup { Table, PatientId, OrderSetId }

#[derive(DeriveIden)]
enum DrugOrder { Table, PatientId, StartDate, GroupId }
