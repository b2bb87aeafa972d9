use crate::db::connect;
use crate::{drug_order, order_group, order_set, order_set_member};
use anyhow::Result;
use chrono::{Duration, Utc};
use migration::MigratorTrait;
use sea_orm::{DatabaseConnection, EntityTrait};

use order_group::OrderGroupKind;

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::test]
async fn test_order_set_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = match setup_test_db().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skipping, database unavailable: {e}");
            return Ok(());
        }
    };

    let created = order_set::create(&db, Some("CHOP Protocol"), Some("21 day cycle"), Some(105), true, Some(21)).await?;
    assert!(created.id > 0);
    assert_eq!(created.name.as_deref(), Some("CHOP Protocol"));
    assert!(!created.retired);

    // Fetch by id
    let found = order_set::Entity::find_by_id(created.id).one(&db).await?;
    assert_eq!(found.as_ref().map(|m| m.uuid), Some(created.uuid));

    // Retire then unretire
    let retired = order_set::retire(&db, created.id, Some("superseded")).await?;
    assert!(retired.retired);
    assert_eq!(retired.retired_reason.as_deref(), Some("superseded"));
    assert!(retired.retired_at.is_some());
    let unretired = order_set::unretire(&db, created.id).await?;
    assert!(!unretired.retired);
    assert!(unretired.retired_at.is_none());

    // Hard delete
    order_set::Entity::delete_by_id(created.id).exec(&db).await?;
    let after = order_set::Entity::find_by_id(created.id).one(&db).await?;
    assert!(after.is_none());
    Ok(())
}

#[tokio::test]
async fn test_blank_order_set_name_rejected() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = match setup_test_db().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skipping, database unavailable: {e}");
            return Ok(());
        }
    };
    let res = order_set::create(&db, Some("   "), None, None, false, None).await;
    assert!(res.is_err());
    Ok(())
}

#[tokio::test]
async fn test_nested_membership() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = match setup_test_db().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skipping, database unavailable: {e}");
            return Ok(());
        }
    };

    let parent = order_set::create(&db, Some("Induction"), None, None, false, None).await?;
    let child = order_set::create(&db, Some("Premedication"), None, None, false, None).await?;

    let drug = order_set_member::add_drug_member(&db, parent.id, 2001, Some(1)).await?;
    assert_eq!(drug.member_type, order_set_member::MEMBER_TYPE_DRUG);

    let nested = order_set_member::add_nested_member(&db, parent.id, child.id, Some(2)).await?;
    assert_eq!(nested.nested_order_set_id, Some(child.id));

    // A set cannot nest itself
    assert!(order_set_member::add_nested_member(&db, parent.id, parent.id, None).await.is_err());

    // Cascade: deleting the parent removes its members
    order_set::Entity::delete_by_id(parent.id).exec(&db).await?;
    let gone = order_set_member::Entity::find_by_id(drug.id).one(&db).await?;
    assert!(gone.is_none());
    order_set::Entity::delete_by_id(child.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_order_group_void() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = match setup_test_db().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skipping, database unavailable: {e}");
            return Ok(());
        }
    };

    let set = order_set::create(&db, Some("R-CHOP"), None, None, true, Some(21)).await?;
    let group = order_group::create(&db, OrderGroupKind::DrugRegimen, 42, Some(set.id), Some(1)).await?;
    assert_eq!(group.group_type, "drug_regimen");
    assert_eq!(group.cycle_number, Some(1));

    // cycle_number only applies to regimens
    assert!(order_group::create(&db, OrderGroupKind::OrderGroup, 42, None, Some(3)).await.is_err());

    let voided = order_group::void(&db, group.id, Some("entered in error")).await?;
    assert!(voided.voided);
    assert!(voided.voided_at.is_some());

    order_group::Entity::delete_by_id(group.id).exec(&db).await?;
    order_set::Entity::delete_by_id(set.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_drug_order_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = match setup_test_db().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skipping, database unavailable: {e}");
            return Ok(());
        }
    };

    let start = Utc::now().into();
    let order = drug_order::create(&db, 7, 5001, None, Some(105), Some("with food"), start, None).await?;
    assert!(!order.voided);

    // end before start is rejected
    let bad_end = (Utc::now() - Duration::days(1)).into();
    assert!(drug_order::create(&db, 7, 5001, None, None, None, Utc::now().into(), Some(bad_end)).await.is_err());

    let voided = drug_order::void(&db, order.id, None).await?;
    assert!(voided.voided);

    drug_order::Entity::delete_by_id(order.id).exec(&db).await?;
    Ok(())
}
