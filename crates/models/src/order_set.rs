use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::NotSet, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::order_set_member;

/// Reusable order template. `name` is nullable; named listings filter on it.
/// Retired sets stay on record but drop out of default listings.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_set")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub indication_concept_id: Option<i32>,
    pub cyclical: bool,
    pub cycle_length_days: Option<i32>,
    pub retired: bool,
    pub retired_reason: Option<String>,
    pub retired_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Members,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Members => Entity::has_many(order_set_member::Entity).into(),
        }
    }
}

impl Related<order_set_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name must not be blank".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    name: Option<&str>,
    description: Option<&str>,
    indication_concept_id: Option<i32>,
    cyclical: bool,
    cycle_length_days: Option<i32>,
) -> Result<Model, errors::ModelError> {
    if let Some(n) = name {
        validate_name(n)?;
    }
    let am = ActiveModel {
        id: NotSet,
        uuid: Set(Uuid::new_v4()),
        name: Set(name.map(|s| s.to_string())),
        description: Set(description.map(|s| s.to_string())),
        indication_concept_id: Set(indication_concept_id),
        cyclical: Set(cyclical),
        cycle_length_days: Set(cycle_length_days),
        retired: Set(false),
        retired_reason: Set(None),
        retired_at: Set(None),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn retire(db: &DatabaseConnection, id: i32, reason: Option<&str>) -> Result<Model, errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("order set not found".into()))?
        .into();
    found.retired = Set(true);
    found.retired_reason = Set(reason.map(|s| s.to_string()));
    found.retired_at = Set(Some(Utc::now().into()));
    found.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn unretire(db: &DatabaseConnection, id: i32) -> Result<Model, errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("order set not found".into()))?
        .into();
    found.retired = Set(false);
    found.retired_reason = Set(None);
    found.retired_at = Set(None);
    found.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
