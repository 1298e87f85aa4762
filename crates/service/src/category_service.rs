use uuid::Uuid;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use models::{category, store};
use models::errors::ModelError;
use crate::errors::ServiceError;
use crate::ordering::errors::from_model_error;
use crate::ordering::names::{name_key, normalize_name, resolve_name};
use crate::ordering::repo::{service_for, CategoryTable, SeaOrmOrdinalRepository};
use crate::ordering::{OrderingError, OrderingPolicy, OrderingService, PartitionKey, Placement, Slot, SlotWrite};

/// Display name of the fallback category.
pub const DEFAULT_NAME: &str = "Uncategorized";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    /// Preferred position; taken positions move the category to the next free one.
    pub order_number: Option<i32>,
    pub cover_image: Option<String>,
}

/// Fields left as `None` are not touched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub order_number: Option<i32>,
    pub cover_image: Option<String>,
}

type CategoryRepo = SeaOrmOrdinalRepository<CategoryTable>;

fn category_write_error(e: ModelError) -> OrderingError {
    match e {
        // only the default category carries a slug; losing that race is not worth a retry
        ModelError::UniqueViolation { constraint: Some(ref c) } if c == category::SLUG_CONSTRAINT => {
            OrderingError::InvalidInput("slug already in use".into())
        }
        other => from_model_error(other, category::ORDER_CONSTRAINT, Some(category::NAME_CONSTRAINT)),
    }
}

async fn insert_category(
    db: &DatabaseConnection,
    policy: &OrderingPolicy,
    name: &str,
    slug: Option<&str>,
    placement: Placement,
    cover_image: Option<&str>,
) -> Result<category::Model, ServiceError> {
    let svc = service_for::<CategoryTable>(db, policy);
    let created = svc
        .create_with_retry(PartitionKey::Global, Some(name), placement, |cand| async move {
            let name = cand.name.unwrap_or_default();
            category::create(db, &name, &name_key(&name), slug, cand.ordinal, cover_image)
                .await
                .map_err(category_write_error)
        })
        .await?;
    Ok(created)
}

/// Create a category, renaming to `"<name> (n)"` and moving to the next free position on collision.
#[instrument(skip(db, policy, input))]
pub async fn create_category(
    db: &DatabaseConnection,
    policy: &OrderingPolicy,
    input: &NewCategory,
) -> Result<category::Model, ServiceError> {
    category::validate_name(&normalize_name(&input.name))?;
    let created = insert_category(
        db,
        policy,
        &input.name,
        None,
        Placement::from(input.order_number),
        input.cover_image.as_deref(),
    )
    .await?;
    info!(id = %created.id, name = %created.name, order = created.order_number, "category_created");
    Ok(created)
}

/// Get category by id.
pub async fn get_category(db: &DatabaseConnection, id: Uuid) -> Result<Option<category::Model>, ServiceError> {
    Ok(category::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?)
}

/// Apply a patch. A new position swaps with the category holding it; a new name is de-duplicated
/// against the other categories. Column changes and the swap commit together.
#[instrument(skip(db, policy, patch), fields(id = %id))]
pub async fn update_category(
    db: &DatabaseConnection,
    policy: &OrderingPolicy,
    id: Uuid,
    patch: &CategoryPatch,
) -> Result<category::Model, ServiceError> {
    if let Some(raw) = patch.name.as_deref() {
        category::validate_name(&normalize_name(raw))?;
    }
    if get_category(db, id).await?.is_none() {
        return Err(ServiceError::not_found("category"));
    }
    let svc = service_for::<CategoryTable>(db, policy);
    let updated = svc
        .with_retry("update_category", || update_category_once(db, policy, &svc, id, patch))
        .await?;
    info!(name = %updated.name, order = updated.order_number, "category_updated");
    Ok(updated)
}

async fn update_category_once(
    db: &DatabaseConnection,
    policy: &OrderingPolicy,
    svc: &OrderingService<CategoryRepo>,
    id: Uuid,
    patch: &CategoryPatch,
) -> Result<category::Model, OrderingError> {
    let current = find_category(db, id).await?;
    let writes = match patch.order_number.filter(|n| *n != current.order_number) {
        Some(n) => svc.plan_relocation(id, Some(n), None).await?.1,
        None => Vec::new(),
    };

    let mut am: category::ActiveModel = current.clone().into();
    let mut changed = false;
    if let Some(raw) = patch.name.as_deref() {
        if normalize_name(raw) != normalize_name(&current.name) {
            let others: Vec<String> = category::Entity::find()
                .filter(category::Column::Id.ne(id))
                .all(db)
                .await
                .map_err(CategoryRepo::map_err)?
                .into_iter()
                .map(|c| c.name)
                .collect();
            let name = resolve_name(raw, &others, policy.name_suffix_limit)?;
            am.name_key = Set(name_key(&name));
            am.name = Set(name);
            changed = true;
        }
    }
    if let Some(cover) = patch.cover_image.as_deref() {
        am.cover_image = Set(Some(cover.to_string()));
        changed = true;
    }
    if !changed && writes.is_empty() {
        return Ok(current);
    }
    if changed {
        am.updated_at = Set(Utc::now().into());
    }

    let txn = CategoryRepo::begin(db).await?;
    let res = write_category(&txn, changed.then_some(am), &writes).await;
    CategoryRepo::settle(txn, res).await?;
    debug!(statements = writes.len(), renamed = changed, "category_update_committed");
    find_category(db, id).await
}

async fn find_category(db: &DatabaseConnection, id: Uuid) -> Result<category::Model, OrderingError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(CategoryRepo::map_err)?
        .ok_or_else(|| OrderingError::not_found("category", id))
}

async fn write_category(
    txn: &DatabaseTransaction,
    columns: Option<category::ActiveModel>,
    writes: &[SlotWrite],
) -> Result<(), OrderingError> {
    if let Some(am) = columns {
        am.update(txn).await.map_err(|e| category_write_error(ModelError::from_db(e)))?;
    }
    CategoryRepo::apply_in(txn, writes).await
}

/// Delete a category that no store references.
#[instrument(skip(db), fields(id = %id))]
pub async fn delete_category(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let in_use = store::Entity::find()
        .filter(store::Column::CategoryId.eq(id))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if in_use > 0 {
        return Err(ServiceError::Conflict(format!("category still has {in_use} stores")));
    }
    let res = category::Entity::delete_by_id(id).exec(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("category"));
    }
    info!("category_deleted");
    Ok(())
}

/// All categories in display order.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>, ServiceError> {
    category::Entity::find()
        .order_by_asc(category::Column::OrderNumber)
        .order_by_asc(category::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Renumber categories to `1..=N`.
pub async fn reindex_categories(db: &DatabaseConnection, policy: &OrderingPolicy) -> Result<Vec<Slot>, ServiceError> {
    Ok(service_for::<CategoryTable>(db, policy).compact(PartitionKey::Global).await?)
}

async fn find_default(db: &DatabaseConnection) -> Result<Option<category::Model>, ServiceError> {
    category::Entity::find()
        .filter(category::Column::Slug.eq(category::DEFAULT_SLUG))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// The `uncategorized` category, created after the last category when missing.
#[instrument(skip(db, policy))]
pub async fn ensure_default_category(db: &DatabaseConnection, policy: &OrderingPolicy) -> Result<category::Model, ServiceError> {
    if let Some(found) = find_default(db).await? {
        return Ok(found);
    }
    match insert_category(db, policy, DEFAULT_NAME, Some(category::DEFAULT_SLUG), Placement::End, None).await {
        Ok(created) => {
            info!(id = %created.id, "default_category_created");
            Ok(created)
        }
        Err(e) => {
            // another writer may have created it first
            warn!(error = %e, "default_category_create_failed");
            find_default(db).await?.ok_or(e)
        }
    }
}
