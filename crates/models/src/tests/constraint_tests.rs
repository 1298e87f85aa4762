use crate::{category, store, errors::ModelError};
use sea_orm::EntityTrait;
use anyhow::Result;
use uuid::Uuid;

use super::{setup_test_db, scratch_order_number};

/// Both category indexes report their own name so callers can tell which field collided.
#[tokio::test]
async fn test_category_unique_violations_are_named() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let name = format!("dup_{}", Uuid::new_v4());
    let order = scratch_order_number();
    let first = category::create(&db, &name, &name, None, order, None).await?;

    let err = category::create(&db, &format!("{name}-other"), &format!("{name}-other"), None, order, None)
        .await
        .unwrap_err();
    match err {
        ModelError::UniqueViolation { constraint } => {
            assert_eq!(constraint.as_deref(), Some(category::ORDER_CONSTRAINT));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }

    let err = category::create(&db, &name, &name, None, scratch_order_number(), None)
        .await
        .unwrap_err();
    match err {
        ModelError::UniqueViolation { constraint } => {
            assert_eq!(constraint.as_deref(), Some(category::NAME_CONSTRAINT));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }

    category::Entity::delete_by_id(first.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_store_order_unique_per_category() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let a = format!("part_a_{}", Uuid::new_v4());
    let b = format!("part_b_{}", Uuid::new_v4());
    let cat_a = category::create(&db, &a, &a, None, scratch_order_number(), None).await?;
    let cat_b = category::create(&db, &b, &b, None, scratch_order_number(), None).await?;

    let mk = |n: &str| store::NewStore { name: n.into(), slug: format!("{n}-{}", Uuid::new_v4()), ..Default::default() };
    let s1 = store::create(&db, cat_a.id, &mk("one"), 1).await?;
    // Same ordinal in another category is fine
    let s2 = store::create(&db, cat_b.id, &mk("two"), 1).await?;
    let err = store::create(&db, cat_a.id, &mk("three"), 1).await.unwrap_err();
    assert!(matches!(
        err,
        ModelError::UniqueViolation { constraint: Some(ref c) } if c == store::ORDER_CONSTRAINT
    ));

    store::hard_delete(&db, s1.id).await?;
    store::hard_delete(&db, s2.id).await?;
    category::Entity::delete_by_id(cat_a.id).exec(&db).await?;
    category::Entity::delete_by_id(cat_b.id).exec(&db).await?;
    Ok(())
}
