use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::NotSet, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::order_group;

/// Drug order extended with a start date and an indication, optionally
/// belonging to an order group.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "drug_order")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub group_id: Option<i32>,
    pub patient_id: i32,
    pub drug_concept_id: i32,
    pub indication_concept_id: Option<i32>,
    pub administration_instructions: Option<String>,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: Option<DateTimeWithTimeZone>,
    pub voided: bool,
    pub void_reason: Option<String>,
    pub voided_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    OrderGroup,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::OrderGroup => Entity::belongs_to(order_group::Entity)
                .from(Column::GroupId)
                .to(order_group::Column::Id)
                .into(),
        }
    }
}

impl Related<order_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    patient_id: i32,
    drug_concept_id: i32,
    group_id: Option<i32>,
    indication_concept_id: Option<i32>,
    administration_instructions: Option<&str>,
    start_date: DateTimeWithTimeZone,
    end_date: Option<DateTimeWithTimeZone>,
) -> Result<Model, errors::ModelError> {
    if let Some(end) = end_date {
        if end < start_date {
            return Err(errors::ModelError::Validation("end_date before start_date".into()));
        }
    }
    let am = ActiveModel {
        id: NotSet,
        uuid: Set(Uuid::new_v4()),
        group_id: Set(group_id),
        patient_id: Set(patient_id),
        drug_concept_id: Set(drug_concept_id),
        indication_concept_id: Set(indication_concept_id),
        administration_instructions: Set(administration_instructions.map(|s| s.to_string())),
        start_date: Set(start_date),
        end_date: Set(end_date),
        voided: Set(false),
        void_reason: Set(None),
        voided_at: Set(None),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Soft delete; the row stays on record for audit.
pub async fn void(db: &DatabaseConnection, id: i32, reason: Option<&str>) -> Result<Model, errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("drug order not found".into()))?
        .into();
    found.voided = Set(true);
    found.void_reason = Set(reason.map(|s| s.to_string()));
    found.voided_at = Set(Some(Utc::now().into()));
    found.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
