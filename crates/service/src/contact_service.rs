use uuid::Uuid;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use models::site_contact::{self, NewContact};
use models::errors::ModelError;
use crate::errors::ServiceError;
use crate::ordering::errors::from_model_error;
use crate::ordering::repo::{service_for, ContactTable, SeaOrmOrdinalRepository};
use crate::ordering::{OrderingError, OrderingPolicy, OrderingService, PartitionKey, Placement, Relocation, Slot, SlotWrite};

type ContactRepo = SeaOrmOrdinalRepository<ContactTable>;

/// Fields left as `None` are not touched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContactPatch {
    pub store_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
    pub order_number: Option<i32>,
}

/// Create a contact at `order_number` (next free from there) or after the last one.
#[instrument(skip(db, policy, input))]
pub async fn create_contact(
    db: &DatabaseConnection,
    policy: &OrderingPolicy,
    input: &NewContact,
    order_number: Option<i32>,
) -> Result<site_contact::Model, ServiceError> {
    let placement = order_number.map_or(Placement::End, Placement::At);
    let created = service_for::<ContactTable>(db, policy)
        .create_with_retry(PartitionKey::Global, None, placement, |cand| async move {
            site_contact::create(db, input, cand.ordinal)
                .await
                .map_err(|e| from_model_error(e, site_contact::ORDER_CONSTRAINT, None))
        })
        .await?;
    info!(id = %created.id, order = created.order_number, "contact_created");
    Ok(created)
}

pub async fn get_contact(db: &DatabaseConnection, id: Uuid) -> Result<Option<site_contact::Model>, ServiceError> {
    Ok(site_contact::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?)
}

/// Swap a contact into `order_number`.
pub async fn update_contact_order(
    db: &DatabaseConnection,
    policy: &OrderingPolicy,
    id: Uuid,
    order_number: i32,
) -> Result<Relocation, ServiceError> {
    Ok(service_for::<ContactTable>(db, policy).relocate(id, Some(order_number), None).await?)
}

/// Apply a patch; a new position swaps with the contact holding it. Column changes and the swap
/// commit together.
#[instrument(skip(db, policy, patch), fields(id = %id))]
pub async fn update_contact(
    db: &DatabaseConnection,
    policy: &OrderingPolicy,
    id: Uuid,
    patch: &ContactPatch,
) -> Result<site_contact::Model, ServiceError> {
    if get_contact(db, id).await?.is_none() {
        return Err(ServiceError::not_found("contact"));
    }
    if let Some(email) = patch.email.as_deref() {
        if !email.is_empty() && !email.contains('@') {
            return Err(ServiceError::Validation("invalid email".into()));
        }
    }
    let svc = service_for::<ContactTable>(db, policy);
    let updated = svc
        .with_retry("update_contact", || update_contact_once(db, &svc, id, patch))
        .await?;
    info!(order = updated.order_number, "contact_updated");
    Ok(updated)
}

async fn update_contact_once(
    db: &DatabaseConnection,
    svc: &OrderingService<ContactRepo>,
    id: Uuid,
    patch: &ContactPatch,
) -> Result<site_contact::Model, OrderingError> {
    let current = find_contact(db, id).await?;
    let writes = match patch.order_number {
        Some(n) => svc.plan_relocation(id, Some(n), None).await?.1,
        None => Vec::new(),
    };

    let mut am: site_contact::ActiveModel = current.into();
    if let Some(v) = patch.store_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        am.store_name = Set(v.to_string());
    }
    if let Some(v) = &patch.phone {
        am.phone = Set(v.clone());
    }
    if let Some(v) = &patch.email {
        am.email = Set(v.clone());
    }
    if let Some(v) = &patch.address {
        am.address = Set(v.clone());
    }
    if let Some(v) = patch.is_active {
        am.is_active = Set(v);
    }
    am.updated_at = Set(Utc::now().into());

    let txn = ContactRepo::begin(db).await?;
    let res = write_contact(&txn, am, &writes).await;
    ContactRepo::settle(txn, res).await?;
    debug!(statements = writes.len(), "contact_update_committed");
    find_contact(db, id).await
}

async fn find_contact(db: &DatabaseConnection, id: Uuid) -> Result<site_contact::Model, OrderingError> {
    site_contact::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ContactRepo::map_err)?
        .ok_or_else(|| OrderingError::not_found("contact", id))
}

async fn write_contact(
    txn: &DatabaseTransaction,
    am: site_contact::ActiveModel,
    writes: &[SlotWrite],
) -> Result<(), OrderingError> {
    am.update(txn)
        .await
        .map_err(|e| from_model_error(ModelError::from_db(e), site_contact::ORDER_CONSTRAINT, None))?;
    ContactRepo::apply_in(txn, writes).await
}

/// Renumber all contacts to `1..=N`.
pub async fn reindex_contacts(db: &DatabaseConnection, policy: &OrderingPolicy) -> Result<Vec<Slot>, ServiceError> {
    Ok(service_for::<ContactTable>(db, policy).compact(PartitionKey::Global).await?)
}

/// Contacts in display order.
pub async fn list_contacts(db: &DatabaseConnection, active_only: bool) -> Result<Vec<site_contact::Model>, ServiceError> {
    let mut q = site_contact::Entity::find();
    if active_only {
        q = q.filter(site_contact::Column::IsActive.eq(true));
    }
    q.order_by_asc(site_contact::Column::OrderNumber)
        .order_by_asc(site_contact::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Hard delete.
pub async fn delete_contact(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = site_contact::Entity::delete_by_id(id).exec(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("contact"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, policy, scratch_ordinal};

    fn contact(name: &str) -> NewContact {
        NewContact { store_name: Some(name.into()), phone: "020000000".into(), email: "hi@example.com".into(), ..Default::default() }
    }

    #[tokio::test]
    async fn contacts_swap_positions() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let a = create_contact(&db, &policy(), &contact("a"), Some(scratch_ordinal())).await?;
        let b = create_contact(&db, &policy(), &contact("b"), Some(scratch_ordinal())).await?;

        let moved = update_contact_order(&db, &policy(), a.id, b.order_number).await?;
        assert_eq!(moved.slot.ordinal, b.order_number);
        assert_eq!(get_contact(&db, b.id).await?.unwrap().order_number, a.order_number);

        delete_contact(&db, a.id).await?;
        delete_contact(&db, b.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn appended_contact_goes_last() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let anchor = create_contact(&db, &policy(), &contact("anchor"), Some(scratch_ordinal())).await?;
        let c = create_contact(&db, &policy(), &contact("last"), None).await?;
        assert!(c.order_number > anchor.order_number);

        delete_contact(&db, anchor.id).await?;
        delete_contact(&db, c.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn patch_updates_fields_and_filter() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let c = create_contact(&db, &policy(), &contact("patch"), Some(scratch_ordinal())).await?;
        let patch = ContactPatch { is_active: Some(false), address: Some("1 Main Rd".into()), ..Default::default() };
        let updated = update_contact(&db, &policy(), c.id, &patch).await?;
        assert!(!updated.is_active);
        assert_eq!(updated.address, "1 Main Rd");
        assert!(!list_contacts(&db, true).await?.iter().any(|x| x.id == c.id));

        let bad = ContactPatch { email: Some("nope".into()), ..Default::default() };
        assert!(matches!(update_contact(&db, &policy(), c.id, &bad).await, Err(ServiceError::Validation(_))));

        delete_contact(&db, c.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn failed_field_write_keeps_positions() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let a = create_contact(&db, &policy(), &contact("a"), Some(scratch_ordinal())).await?;
        let b = create_contact(&db, &policy(), &contact("b"), Some(scratch_ordinal())).await?;

        // phone column holds 64 characters
        let patch = ContactPatch { phone: Some("9".repeat(100)), order_number: Some(b.order_number), ..Default::default() };
        assert!(update_contact(&db, &policy(), a.id, &patch).await.is_err());
        let a_after = get_contact(&db, a.id).await?.unwrap();
        assert_eq!(a_after.order_number, a.order_number);
        assert_eq!(a_after.phone, a.phone);
        assert_eq!(get_contact(&db, b.id).await?.unwrap().order_number, b.order_number);

        delete_contact(&db, a.id).await?;
        delete_contact(&db, b.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn non_positive_order_is_invalid() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let err = create_contact(&db, &policy(), &contact("zero"), Some(0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Ordering(OrderingError::InvalidInput(_))));
        Ok(())
    }
}
