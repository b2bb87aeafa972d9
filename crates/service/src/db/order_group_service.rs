use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, QueryOrder, Statement,
};

use crate::errors::ServiceError;
use models::order_group::OrderGroupKind;
use models::{drug_order, order_group};

type DateTimeTz = chrono::DateTime<chrono::FixedOffset>;

pub async fn get_order_group(db: &DatabaseConnection, id: i32) -> Result<Option<order_group::Model>, ServiceError> {
    order_group::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Fetch by id, restricted to the drug-regimen subtype.
pub async fn get_drug_regimen(db: &DatabaseConnection, id: i32) -> Result<Option<order_group::Model>, ServiceError> {
    order_group::Entity::find_by_id(id)
        .filter(order_group::Column::GroupType.eq(OrderGroupKind::DrugRegimen.as_str()))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn create_order_group(
    db: &DatabaseConnection,
    kind: OrderGroupKind,
    patient_id: i32,
    order_set_id: Option<i32>,
    cycle_number: Option<i32>,
) -> Result<order_group::Model, ServiceError> {
    Ok(order_group::create(db, kind, patient_id, order_set_id, cycle_number).await?)
}

pub async fn void_order_group(db: &DatabaseConnection, id: i32, reason: Option<&str>) -> Result<order_group::Model, ServiceError> {
    get_order_group(db, id).await?.ok_or_else(|| ServiceError::not_found("order group"))?;
    Ok(order_group::void(db, id, reason).await?)
}

/// Non-voided groups of the given subtype for one patient.
pub async fn get_order_groups_for_patient(
    db: &DatabaseConnection,
    patient_id: i32,
    kind: OrderGroupKind,
) -> Result<Vec<order_group::Model>, ServiceError> {
    order_group::Entity::find()
        .filter(order_group::Column::PatientId.eq(patient_id))
        .filter(order_group::Column::GroupType.eq(kind.as_str()))
        .filter(order_group::Column::Voided.eq(false))
        .order_by_asc(order_group::Column::Id)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn get_drug_order(db: &DatabaseConnection, id: i32) -> Result<Option<drug_order::Model>, ServiceError> {
    drug_order::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

#[allow(clippy::too_many_arguments)]
pub async fn create_drug_order(
    db: &DatabaseConnection,
    patient_id: i32,
    drug_concept_id: i32,
    group_id: Option<i32>,
    indication_concept_id: Option<i32>,
    administration_instructions: Option<&str>,
    start_date: DateTimeTz,
    end_date: Option<DateTimeTz>,
) -> Result<drug_order::Model, ServiceError> {
    Ok(drug_order::create(
        db,
        patient_id,
        drug_concept_id,
        group_id,
        indication_concept_id,
        administration_instructions,
        start_date,
        end_date,
    )
    .await?)
}

pub async fn void_drug_order(db: &DatabaseConnection, id: i32, reason: Option<&str>) -> Result<drug_order::Model, ServiceError> {
    get_drug_order(db, id).await?.ok_or_else(|| ServiceError::not_found("drug order"))?;
    Ok(drug_order::void(db, id, reason).await?)
}

/// Start-date window: inclusive lower bound, exclusive upper bound. A single
/// bound restricts on its own; no bounds, no restriction.
fn start_date_window(start_after: Option<DateTimeTz>, start_before: Option<DateTimeTz>) -> Condition {
    let mut cond = Condition::all();
    if let Some(after) = start_after {
        cond = cond.add(drug_order::Column::StartDate.gte(after));
    }
    if let Some(before) = start_before {
        cond = cond.add(drug_order::Column::StartDate.lt(before));
    }
    cond
}

/// Non-voided drug orders for a patient, optionally restricted by indication
/// and a start-date window.
pub async fn get_drug_orders_for_patient(
    db: &DatabaseConnection,
    patient_id: i32,
    indication_concept_id: Option<i32>,
    start_after: Option<DateTimeTz>,
    start_before: Option<DateTimeTz>,
) -> Result<Vec<drug_order::Model>, ServiceError> {
    let mut query = drug_order::Entity::find()
        .filter(drug_order::Column::PatientId.eq(patient_id))
        .filter(drug_order::Column::Voided.eq(false));
    if let Some(indication) = indication_concept_id {
        query = query.filter(drug_order::Column::IndicationConceptId.eq(indication));
    }
    query
        .filter(start_date_window(start_after, start_before))
        .order_by_asc(drug_order::Column::StartDate)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Earliest non-voided drug-order start date within a group.
pub async fn first_drug_order_start_date(db: &DatabaseConnection, group_id: i32) -> Result<Option<DateTimeTz>, ServiceError> {
    let first = drug_order::Entity::find()
        .filter(drug_order::Column::GroupId.eq(group_id))
        .filter(drug_order::Column::Voided.eq(false))
        .order_by_asc(drug_order::Column::StartDate)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(first.map(|o| o.start_date))
}

/// Maximum recorded cycle number across the patient's non-voided regimens of
/// the same order set, counting only cycles on or after the given regimen's
/// first drug-order start date. `None` when nothing matches, or when the
/// regimen has no orders to anchor the date on.
///
/// The aggregate joins orders to their owning group explicitly
/// (`d.group_id = g.id`); an order never counts toward another group.
pub async fn get_max_cycle_number(
    db: &DatabaseConnection,
    patient_id: i32,
    regimen: &order_group::Model,
) -> Result<Option<i32>, ServiceError> {
    if regimen.kind()? != OrderGroupKind::DrugRegimen {
        return Err(ServiceError::Validation("order group is not a drug regimen".into()));
    }
    let order_set_id = regimen
        .order_set_id
        .ok_or_else(|| ServiceError::Validation("regimen has no order set".into()))?;
    let first_start = match first_drug_order_start_date(db, regimen.id).await? {
        Some(d) => d,
        None => return Ok(None),
    };

    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"SELECT MAX(g.cycle_number) AS max_cycle
           FROM order_group g
           JOIN drug_order d ON d.group_id = g.id
           WHERE g.voided = FALSE
             AND d.voided = FALSE
             AND g.order_set_id = $1
             AND d.patient_id = $2
             AND d.start_date >= $3"#,
        [order_set_id.into(), patient_id.into(), first_start.into()],
    );
    let row = db.query_one(stmt).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    match row {
        Some(row) => row
            .try_get::<Option<i32>>("", "max_cycle")
            .map_err(|e| ServiceError::Db(e.to_string())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::order_set_service::{create_order_set, purge_order_set};
    use crate::test_support::get_db;
    use chrono::{Duration, Utc};

    fn ts(days_from_now: i64) -> DateTimeTz {
        (Utc::now() + Duration::days(days_from_now)).into()
    }

    fn window_sql(after: Option<DateTimeTz>, before: Option<DateTimeTz>) -> String {
        use sea_orm::QueryTrait;
        drug_order::Entity::find()
            .filter(start_date_window(after, before))
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn window_bounds_compose() {
        let both = window_sql(Some(ts(0)), Some(ts(5)));
        assert!(both.contains(r#""start_date" >="#));
        assert!(both.contains(r#""start_date" <"#));

        let lower_only = window_sql(Some(ts(0)), None);
        assert!(lower_only.contains(">="));
        assert!(!lower_only.contains(r#""start_date" < "#));

        let upper_only = window_sql(None, Some(ts(5)));
        assert!(upper_only.contains(r#""start_date" < "#));
        assert!(!upper_only.contains(">="));

        // No bounds, no restriction
        assert!(!window_sql(None, None).contains("WHERE"));
    }

    #[tokio::test]
    async fn order_groups_restricted_to_patient() -> Result<(), anyhow::Error> {
        // Pins the patient restriction: another patient's groups must never
        // show up in the listing.
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = match get_db().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skipping, database unavailable: {e}");
                return Ok(());
            }
        };

        let mine = create_order_group(&db, OrderGroupKind::DrugRegimen, 9001, None, Some(1)).await?;
        let other = create_order_group(&db, OrderGroupKind::DrugRegimen, 9002, None, Some(1)).await?;
        let voided = create_order_group(&db, OrderGroupKind::DrugRegimen, 9001, None, Some(2)).await?;
        void_order_group(&db, voided.id, Some("cancelled")).await?;
        let plain = create_order_group(&db, OrderGroupKind::OrderGroup, 9001, None, None).await?;

        let groups = get_order_groups_for_patient(&db, 9001, OrderGroupKind::DrugRegimen).await?;
        let ids: Vec<i32> = groups.iter().map(|g| g.id).collect();
        assert!(ids.contains(&mine.id));
        assert!(!ids.contains(&other.id), "other patient's group leaked in");
        assert!(!ids.contains(&voided.id));
        assert!(!ids.contains(&plain.id));

        for id in [mine.id, other.id, voided.id, plain.id] {
            order_group::Entity::delete_by_id(id).exec(&db).await?;
        }
        Ok(())
    }

    #[tokio::test]
    async fn drug_order_date_windows() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = match get_db().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skipping, database unavailable: {e}");
                return Ok(());
            }
        };
        let patient = 9100;

        let early = create_drug_order(&db, patient, 1, None, None, None, ts(-10), None).await?;
        let mid = create_drug_order(&db, patient, 2, None, Some(77), None, ts(0), None).await?;
        let late = create_drug_order(&db, patient, 3, None, None, None, ts(10), None).await?;
        let gone = create_drug_order(&db, patient, 4, None, None, None, ts(0), None).await?;
        void_drug_order(&db, gone.id, None).await?;

        // Lower bound only: start_date >= bound
        let from_mid = get_drug_orders_for_patient(&db, patient, None, Some(ts(-1)), None).await?;
        let ids: Vec<i32> = from_mid.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![mid.id, late.id]);

        // Upper bound only: start_date < bound, strictly
        let before_mid = get_drug_orders_for_patient(&db, patient, None, None, Some(ts(-1))).await?;
        assert_eq!(before_mid.iter().map(|o| o.id).collect::<Vec<_>>(), vec![early.id]);

        // Both bounds: inclusive lower, exclusive upper
        let window = get_drug_orders_for_patient(&db, patient, None, Some(mid.start_date), Some(ts(5))).await?;
        assert_eq!(window.iter().map(|o| o.id).collect::<Vec<_>>(), vec![mid.id]);

        // Indication filter composes with the window
        let by_indication = get_drug_orders_for_patient(&db, patient, Some(77), None, None).await?;
        assert_eq!(by_indication.iter().map(|o| o.id).collect::<Vec<_>>(), vec![mid.id]);

        // Voided orders never appear in listings but stay fetchable by id
        let all = get_drug_orders_for_patient(&db, patient, None, None, None).await?;
        assert!(all.iter().all(|o| o.id != gone.id));
        assert!(get_drug_order(&db, gone.id).await?.map(|o| o.voided).unwrap_or(false));
        assert!(get_drug_order(&db, i32::MAX).await?.is_none());

        for id in [early.id, mid.id, late.id, gone.id] {
            drug_order::Entity::delete_by_id(id).exec(&db).await?;
        }
        Ok(())
    }

    #[tokio::test]
    async fn max_cycle_number_aggregate() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = match get_db().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skipping, database unavailable: {e}");
                return Ok(());
            }
        };
        let patient = 9200;

        let set = create_order_set(&db, Some("FOLFOX"), None, None, true, Some(14)).await?;

        // Three cycles of the same protocol; cycle 1 started first
        let c1 = create_order_group(&db, OrderGroupKind::DrugRegimen, patient, Some(set.id), Some(1)).await?;
        let c2 = create_order_group(&db, OrderGroupKind::DrugRegimen, patient, Some(set.id), Some(2)).await?;
        let c3 = create_order_group(&db, OrderGroupKind::DrugRegimen, patient, Some(set.id), Some(3)).await?;
        let o1 = create_drug_order(&db, patient, 10, Some(c1.id), None, None, ts(-28), None).await?;
        let o2 = create_drug_order(&db, patient, 10, Some(c2.id), None, None, ts(-14), None).await?;
        let o3 = create_drug_order(&db, patient, 10, Some(c3.id), None, None, ts(0), None).await?;

        // Another patient on the same protocol must not leak in
        let foreign = create_order_group(&db, OrderGroupKind::DrugRegimen, 9201, Some(set.id), Some(9)).await?;
        let of = create_drug_order(&db, 9201, 10, Some(foreign.id), None, None, ts(0), None).await?;

        let max = get_max_cycle_number(&db, patient, &c1).await?;
        assert_eq!(max, Some(3));

        // Anchored at cycle 2's first order, cycle 1 falls outside the window
        let max_from_c2 = get_max_cycle_number(&db, patient, &c2).await?;
        assert_eq!(max_from_c2, Some(3));

        // A regimen with no orders has no anchor date
        let empty = create_order_group(&db, OrderGroupKind::DrugRegimen, patient, Some(set.id), Some(4)).await?;
        assert_eq!(get_max_cycle_number(&db, patient, &empty).await?, None);

        // A regimen detached from any order set is a caller error
        let detached = create_order_group(&db, OrderGroupKind::DrugRegimen, patient, None, Some(1)).await?;
        assert!(get_max_cycle_number(&db, patient, &detached).await.is_err());

        for id in [o1.id, o2.id, o3.id, of.id] {
            drug_order::Entity::delete_by_id(id).exec(&db).await?;
        }
        for id in [c1.id, c2.id, c3.id, foreign.id, empty.id, detached.id] {
            order_group::Entity::delete_by_id(id).exec(&db).await?;
        }
        purge_order_set(&db, set.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn drug_regimen_subtype_fetch() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = match get_db().await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skipping, database unavailable: {e}");
                return Ok(());
            }
        };

        let plain = create_order_group(&db, OrderGroupKind::OrderGroup, 9300, None, None).await?;
        let regimen = create_order_group(&db, OrderGroupKind::DrugRegimen, 9300, None, Some(1)).await?;

        assert!(get_drug_regimen(&db, plain.id).await?.is_none());
        assert_eq!(get_drug_regimen(&db, regimen.id).await?.map(|g| g.id), Some(regimen.id));
        assert_eq!(get_order_group(&db, plain.id).await?.map(|g| g.id), Some(plain.id));

        for id in [plain.id, regimen.id] {
            order_group::Entity::delete_by_id(id).exec(&db).await?;
        }
        Ok(())
    }
}
