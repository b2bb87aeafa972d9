use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::NotSet, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::order_set;

pub const MEMBER_TYPE_DRUG: &str = "drug";
pub const MEMBER_TYPE_NESTED: &str = "nested";

/// Item belonging to an order set. A `nested` member embeds another order
/// set via `nested_order_set_id`; a `drug` member carries a concept.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_set_member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub order_set_id: i32,
    pub member_type: String,
    pub concept_id: Option<i32>,
    pub nested_order_set_id: Option<i32>,
    pub sort_weight: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    OrderSet,
    NestedOrderSet,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::OrderSet => Entity::belongs_to(order_set::Entity)
                .from(Column::OrderSetId)
                .to(order_set::Column::Id)
                .into(),
            Relation::NestedOrderSet => Entity::belongs_to(order_set::Entity)
                .from(Column::NestedOrderSetId)
                .to(order_set::Column::Id)
                .into(),
        }
    }
}

impl Related<order_set::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderSet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn add_drug_member(
    db: &DatabaseConnection,
    order_set_id: i32,
    concept_id: i32,
    sort_weight: Option<i32>,
) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: NotSet,
        uuid: Set(Uuid::new_v4()),
        order_set_id: Set(order_set_id),
        member_type: Set(MEMBER_TYPE_DRUG.into()),
        concept_id: Set(Some(concept_id)),
        nested_order_set_id: Set(None),
        sort_weight: Set(sort_weight),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn add_nested_member(
    db: &DatabaseConnection,
    order_set_id: i32,
    nested_order_set_id: i32,
    sort_weight: Option<i32>,
) -> Result<Model, errors::ModelError> {
    if order_set_id == nested_order_set_id {
        return Err(errors::ModelError::Validation("an order set cannot nest itself".into()));
    }
    let am = ActiveModel {
        id: NotSet,
        uuid: Set(Uuid::new_v4()),
        order_set_id: Set(order_set_id),
        member_type: Set(MEMBER_TYPE_NESTED.into()),
        concept_id: Set(None),
        nested_order_set_id: Set(Some(nested_order_set_id)),
        sort_weight: Set(sort_weight),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
