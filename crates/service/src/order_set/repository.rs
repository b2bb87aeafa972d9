use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Data-access contract for order sets. Handlers depend on this trait rather
/// than on a globally resolved service instance.
#[async_trait]
pub trait OrderSetRepository: Send + Sync {
    async fn list(
        &self,
        partial_name: Option<&str>,
        indication_concept_id: Option<i32>,
        include_retired: bool,
    ) -> Result<Vec<models::order_set::Model>, ServiceError>;
    async fn create(
        &self,
        name: Option<&str>,
        description: Option<&str>,
        indication_concept_id: Option<i32>,
        cyclical: bool,
        cycle_length_days: Option<i32>,
    ) -> Result<models::order_set::Model, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<models::order_set::Model>, ServiceError>;
    async fn get_by_uuid(&self, uuid: Uuid) -> Result<Option<models::order_set::Model>, ServiceError>;
    async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        description: Option<&str>,
        indication_concept_id: Option<i32>,
        cyclical: Option<bool>,
        cycle_length_days: Option<i32>,
    ) -> Result<models::order_set::Model, ServiceError>;
    async fn purge(&self, id: i32) -> Result<bool, ServiceError>;
    async fn retire(&self, id: i32, reason: Option<&str>) -> Result<models::order_set::Model, ServiceError>;
    async fn unretire(&self, id: i32) -> Result<models::order_set::Model, ServiceError>;
    async fn parents(&self, id: i32) -> Result<Vec<models::order_set::Model>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmOrderSetRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl OrderSetRepository for SeaOrmOrderSetRepository {
    async fn list(
        &self,
        partial_name: Option<&str>,
        indication_concept_id: Option<i32>,
        include_retired: bool,
    ) -> Result<Vec<models::order_set::Model>, ServiceError> {
        crate::db::order_set_service::get_named_order_sets(&self.db, partial_name, indication_concept_id, include_retired).await
    }

    async fn create(
        &self,
        name: Option<&str>,
        description: Option<&str>,
        indication_concept_id: Option<i32>,
        cyclical: bool,
        cycle_length_days: Option<i32>,
    ) -> Result<models::order_set::Model, ServiceError> {
        crate::db::order_set_service::create_order_set(&self.db, name, description, indication_concept_id, cyclical, cycle_length_days).await
    }

    async fn get(&self, id: i32) -> Result<Option<models::order_set::Model>, ServiceError> {
        crate::db::order_set_service::get_order_set(&self.db, id).await
    }

    async fn get_by_uuid(&self, uuid: Uuid) -> Result<Option<models::order_set::Model>, ServiceError> {
        crate::db::order_set_service::get_order_set_by_uuid(&self.db, uuid).await
    }

    async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        description: Option<&str>,
        indication_concept_id: Option<i32>,
        cyclical: Option<bool>,
        cycle_length_days: Option<i32>,
    ) -> Result<models::order_set::Model, ServiceError> {
        crate::db::order_set_service::update_order_set(&self.db, id, name, description, indication_concept_id, cyclical, cycle_length_days).await
    }

    async fn purge(&self, id: i32) -> Result<bool, ServiceError> {
        crate::db::order_set_service::purge_order_set(&self.db, id).await
    }

    async fn retire(&self, id: i32, reason: Option<&str>) -> Result<models::order_set::Model, ServiceError> {
        crate::db::order_set_service::retire_order_set(&self.db, id, reason).await
    }

    async fn unretire(&self, id: i32) -> Result<models::order_set::Model, ServiceError> {
        crate::db::order_set_service::unretire_order_set(&self.db, id).await
    }

    async fn parents(&self, id: i32) -> Result<Vec<models::order_set::Model>, ServiceError> {
        crate::db::order_set_service::get_parent_order_sets(&self.db, id).await
    }
}
