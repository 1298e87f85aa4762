use uuid::Uuid;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{info, instrument};

use models::{store, store_image};
use crate::errors::ServiceError;
use crate::ordering::errors::from_model_error;
use crate::ordering::repo::{service_for, StoreImageTable};
use crate::ordering::{OrderingPolicy, PartitionKey, Placement};

async fn require_store(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    store::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("store"))?;
    Ok(())
}

/// Append an image to a store's gallery.
#[instrument(skip(db, policy, alt_text), fields(store = %store_id))]
pub async fn add_store_image(
    db: &DatabaseConnection,
    policy: &OrderingPolicy,
    store_id: Uuid,
    image_url: &str,
    alt_text: Option<&str>,
) -> Result<store_image::Model, ServiceError> {
    store_image::validate_image_url(image_url)?;
    require_store(db, store_id).await?;
    let created = service_for::<StoreImageTable>(db, policy)
        .create_with_retry(PartitionKey::Scoped(store_id), None, Placement::End, |cand| async move {
            store_image::create(db, store_id, image_url, alt_text, cand.ordinal)
                .await
                .map_err(|e| from_model_error(e, store_image::ORDER_CONSTRAINT, None))
        })
        .await?;
    info!(id = %created.id, order = created.order_number, "store_image_added");
    Ok(created)
}

/// Gallery in display order.
pub async fn list_store_images(db: &DatabaseConnection, store_id: Uuid) -> Result<Vec<store_image::Model>, ServiceError> {
    store_image::Entity::find()
        .filter(store_image::Column::StoreId.eq(store_id))
        .order_by_asc(store_image::Column::OrderNumber)
        .order_by_asc(store_image::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Set explicit positions for some or all images of a store in one transaction.
///
/// Targets must be positive, distinct, and not held by an image left out of `orders`.
#[instrument(skip(db, policy, orders), fields(store = %store_id, count = orders.len()))]
pub async fn reorder_store_images(
    db: &DatabaseConnection,
    policy: &OrderingPolicy,
    store_id: Uuid,
    orders: &[(Uuid, i32)],
) -> Result<Vec<store_image::Model>, ServiceError> {
    require_store(db, store_id).await?;
    service_for::<StoreImageTable>(db, policy)
        .reorder(PartitionKey::Scoped(store_id), orders)
        .await?;
    list_store_images(db, store_id).await
}
