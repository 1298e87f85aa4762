use uuid::Uuid;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::{category, store};
use models::errors::ModelError;
use crate::category_service::ensure_default_category;
use crate::errors::ServiceError;
use crate::ordering::errors::from_model_error;
use crate::ordering::repo::{service_for, StoreTable};
use crate::ordering::{OrderingError, OrderingPolicy, PartitionKey, Placement, Relocation, Slot};
use crate::slug::to_slug;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreateStore {
    pub name: String,
    /// Derived from `name` when absent.
    pub slug: Option<String>,
    pub description: String,
    pub address: String,
    pub phone: Option<String>,
    /// Falls back to the `uncategorized` category.
    pub category_id: Option<Uuid>,
    /// Preferred position inside the category; appended after the last store when absent.
    pub order_number: Option<i32>,
}

fn store_write_error(e: ModelError) -> OrderingError {
    match e {
        ModelError::UniqueViolation { constraint: Some(ref c) } if c == store::SLUG_CONSTRAINT => {
            OrderingError::InvalidInput("slug already in use".into())
        }
        other => from_model_error(other, store::ORDER_CONSTRAINT, None),
    }
}

async fn require_category(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("category"))?;
    Ok(())
}

async fn slug_taken(db: &DatabaseConnection, slug: &str) -> Result<bool, ServiceError> {
    let found = store::Entity::find()
        .filter(store::Column::Slug.eq(slug))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found.is_some())
}

/// Create a store inside its category's ordering.
#[instrument(skip(db, policy, input), fields(name = %input.name))]
pub async fn create_store(
    db: &DatabaseConnection,
    policy: &OrderingPolicy,
    input: &CreateStore,
) -> Result<store::Model, ServiceError> {
    if input.name.trim().is_empty() {
        return Err(ServiceError::Validation("name required".into()));
    }
    let category_id = match input.category_id {
        Some(id) => {
            require_category(db, id).await?;
            id
        }
        None => ensure_default_category(db, policy).await?.id,
    };

    let mut slug = to_slug(input.slug.as_deref().unwrap_or(&input.name));
    if slug.is_empty() {
        slug = format!("store-{}", Utc::now().timestamp_millis());
    }
    if slug_taken(db, &slug).await? {
        return Err(ServiceError::Conflict(format!("slug {slug} already in use")));
    }

    let row = store::NewStore {
        name: input.name.trim().to_string(),
        slug,
        description: input.description.clone(),
        address: input.address.clone(),
        phone: input.phone.clone(),
    };
    let placement = input.order_number.map_or(Placement::End, Placement::At);
    let svc = service_for::<StoreTable>(db, policy);
    let row = &row;
    let created = svc
        .create_with_retry(PartitionKey::Scoped(category_id), None, placement, |cand| async move {
            store::create(db, category_id, row, cand.ordinal).await.map_err(store_write_error)
        })
        .await?;
    info!(id = %created.id, category = %category_id, order = created.order_number, "store_created");
    Ok(created)
}

pub async fn get_store(db: &DatabaseConnection, id: Uuid) -> Result<Option<store::Model>, ServiceError> {
    Ok(store::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?)
}

/// Move a store to another position and/or category.
///
/// Within a category a taken position is swapped. Moving to another category keeps the current
/// number unless `order_number` is given, and fails when that number is taken there.
#[instrument(skip(db, policy), fields(id = %id))]
pub async fn update_store_order(
    db: &DatabaseConnection,
    policy: &OrderingPolicy,
    id: Uuid,
    order_number: Option<i32>,
    category_id: Option<Uuid>,
) -> Result<Relocation, ServiceError> {
    if let Some(cat) = category_id {
        require_category(db, cat).await?;
    }
    let moved = service_for::<StoreTable>(db, policy)
        .relocate(id, order_number, category_id.map(PartitionKey::Scoped))
        .await?;
    Ok(moved)
}

/// Stores of one category in display order.
pub async fn list_stores_in_category(
    db: &DatabaseConnection,
    category_id: Uuid,
    active_only: bool,
) -> Result<Vec<store::Model>, ServiceError> {
    let mut q = store::Entity::find().filter(store::Column::CategoryId.eq(category_id));
    if active_only {
        q = q.filter(store::Column::IsActive.eq(true));
    }
    q.order_by_asc(store::Column::OrderNumber)
        .order_by_asc(store::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Renumber the stores of a category to `1..=N`.
pub async fn compact_category_stores(
    db: &DatabaseConnection,
    policy: &OrderingPolicy,
    category_id: Uuid,
) -> Result<Vec<Slot>, ServiceError> {
    require_category(db, category_id).await?;
    Ok(service_for::<StoreTable>(db, policy).compact(PartitionKey::Scoped(category_id)).await?)
}

/// Hard delete; images go with the store. Remaining positions are left as they are.
#[instrument(skip(db), fields(id = %id))]
pub async fn delete_store(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if get_store(db, id).await?.is_none() {
        return Err(ServiceError::not_found("store"));
    }
    store::hard_delete(db, id).await?;
    info!("store_deleted");
    Ok(())
}
