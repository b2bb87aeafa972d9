use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::NotSet, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;
use crate::order_set;

/// Subtype discriminator stored in `group_type`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderGroupKind {
    OrderGroup,
    DrugRegimen,
}

impl OrderGroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderGroupKind::OrderGroup => "order_group",
            OrderGroupKind::DrugRegimen => "drug_regimen",
        }
    }
}

impl std::str::FromStr for OrderGroupKind {
    type Err = errors::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order_group" => Ok(OrderGroupKind::OrderGroup),
            "drug_regimen" => Ok(OrderGroupKind::DrugRegimen),
            other => Err(errors::ModelError::Validation(format!("unknown group kind: {}", other))),
        }
    }
}

/// Patient-scoped grouping of orders. Drug regimens are the
/// `drug_regimen` subtype and carry a cycle number.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_group")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: Uuid,
    pub group_type: String,
    pub order_set_id: Option<i32>,
    pub patient_id: i32,
    pub cycle_number: Option<i32>,
    pub voided: bool,
    pub void_reason: Option<String>,
    pub voided_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn kind(&self) -> Result<OrderGroupKind, errors::ModelError> {
        self.group_type.parse()
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    OrderSet,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::OrderSet => Entity::belongs_to(order_set::Entity)
                .from(Column::OrderSetId)
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

pub async fn create(
    db: &DatabaseConnection,
    kind: OrderGroupKind,
    patient_id: i32,
    order_set_id: Option<i32>,
    cycle_number: Option<i32>,
) -> Result<Model, errors::ModelError> {
    if cycle_number.is_some() && kind != OrderGroupKind::DrugRegimen {
        return Err(errors::ModelError::Validation(
            "cycle_number is only valid for drug regimens".into(),
        ));
    }
    let am = ActiveModel {
        id: NotSet,
        uuid: Set(Uuid::new_v4()),
        group_type: Set(kind.as_str().into()),
        order_set_id: Set(order_set_id),
        patient_id: Set(patient_id),
        cycle_number: Set(cycle_number),
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
        .ok_or_else(|| errors::ModelError::Validation("order group not found".into()))?
        .into();
    found.voided = Set(true);
    found.void_reason = Set(reason.map(|s| s.to_string()));
    found.voided_at = Set(Some(Utc::now().into()));
    found.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
