use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use models::{order_set, order_set_member};

/// Fetch by id; absent rows are `None`, never an error.
pub async fn get_order_set(db: &DatabaseConnection, id: i32) -> Result<Option<order_set::Model>, ServiceError> {
    order_set::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Unique-result fetch; the uuid column carries a unique index.
pub async fn get_order_set_by_uuid(db: &DatabaseConnection, uuid: Uuid) -> Result<Option<order_set::Model>, ServiceError> {
    order_set::Entity::find()
        .filter(order_set::Column::Uuid.eq(uuid))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Query for named order sets. Absent filters add no restriction.
/// - always `name IS NOT NULL`
/// - `partial_name`: case-insensitive substring match
/// - `indication`: equality on the indication concept
/// - retired sets excluded unless `include_retired`
/// - ordered ascending by name
fn named_order_sets_query(
    partial_name: Option<&str>,
    indication_concept_id: Option<i32>,
    include_retired: bool,
) -> Select<order_set::Entity> {
    let mut query = order_set::Entity::find().filter(order_set::Column::Name.is_not_null());
    if !include_retired {
        query = query.filter(order_set::Column::Retired.eq(false));
    }
    if let Some(partial) = partial_name {
        let pattern = format!("%{}%", partial.to_lowercase());
        query = query.filter(Expr::expr(Func::lower(Expr::col(order_set::Column::Name))).like(pattern));
    }
    if let Some(indication) = indication_concept_id {
        query = query.filter(order_set::Column::IndicationConceptId.eq(indication));
    }
    query.order_by_asc(order_set::Column::Name)
}

pub async fn get_named_order_sets(
    db: &DatabaseConnection,
    partial_name: Option<&str>,
    indication_concept_id: Option<i32>,
    include_retired: bool,
) -> Result<Vec<order_set::Model>, ServiceError> {
    named_order_sets_query(partial_name, indication_concept_id, include_retired)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn create_order_set(
    db: &DatabaseConnection,
    name: Option<&str>,
    description: Option<&str>,
    indication_concept_id: Option<i32>,
    cyclical: bool,
    cycle_length_days: Option<i32>,
) -> Result<order_set::Model, ServiceError> {
    Ok(order_set::create(db, name, description, indication_concept_id, cyclical, cycle_length_days).await?)
}

/// Update in place; `None` fields stay untouched.
pub async fn update_order_set(
    db: &DatabaseConnection,
    id: i32,
    name: Option<&str>,
    description: Option<&str>,
    indication_concept_id: Option<i32>,
    cyclical: Option<bool>,
    cycle_length_days: Option<i32>,
) -> Result<order_set::Model, ServiceError> {
    let found = get_order_set(db, id).await?.ok_or_else(|| ServiceError::not_found("order set"))?;
    let mut am: order_set::ActiveModel = found.into();
    if let Some(n) = name {
        order_set::validate_name(n)?;
        am.name = Set(Some(n.to_string()));
    }
    if let Some(d) = description {
        am.description = Set(Some(d.to_string()));
    }
    if let Some(i) = indication_concept_id {
        am.indication_concept_id = Set(Some(i));
    }
    if let Some(c) = cyclical {
        am.cyclical = Set(c);
    }
    if let Some(days) = cycle_length_days {
        am.cycle_length_days = Set(Some(days));
    }
    am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))
}

/// Hard delete. Returns whether a row was removed. No voiding here.
pub async fn purge_order_set(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = order_set::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

pub async fn retire_order_set(db: &DatabaseConnection, id: i32, reason: Option<&str>) -> Result<order_set::Model, ServiceError> {
    get_order_set(db, id).await?.ok_or_else(|| ServiceError::not_found("order set"))?;
    Ok(order_set::retire(db, id, reason).await?)
}

pub async fn unretire_order_set(db: &DatabaseConnection, id: i32) -> Result<order_set::Model, ServiceError> {
    get_order_set(db, id).await?.ok_or_else(|| ServiceError::not_found("order set"))?;
    Ok(order_set::unretire(db, id).await?)
}

pub async fn get_order_set_member(db: &DatabaseConnection, id: i32) -> Result<Option<order_set_member::Model>, ServiceError> {
    order_set_member::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Every order set that embeds the given one as a nested member.
pub async fn get_parent_order_sets(db: &DatabaseConnection, order_set_id: i32) -> Result<Vec<order_set::Model>, ServiceError> {
    order_set::Entity::find()
        .join_rev(JoinType::InnerJoin, order_set_member::Relation::OrderSet.def())
        .filter(order_set_member::Column::NestedOrderSetId.eq(order_set_id))
        .order_by_asc(order_set::Column::Name)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}
