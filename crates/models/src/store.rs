use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, category, store_image};

/// Unique index over `(category_id, order_number)`.
pub const ORDER_CONSTRAINT: &str = "uniq_store_category_order";
/// Postgres-generated name of the `slug` unique key.
pub const SLUG_CONSTRAINT: &str = "store_slug_key";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "store")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: String,
    pub address: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub order_number: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Category, Image }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Category => Entity::belongs_to(category::Entity).from(Column::CategoryId).to(category::Column::Id).into(),
            Relation::Image => Entity::has_many(store_image::Entity).into(),
        }
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef { Relation::Category.def() }
}

impl Related<store_image::Entity> for Entity {
    fn to() -> RelationDef { Relation::Image.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields supplied by the caller when creating a store; ordering fields are resolved separately.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewStore {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub address: String,
    pub phone: Option<String>,
}

pub fn validate(input: &NewStore) -> Result<(), errors::ModelError> {
    if input.name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    if input.slug.trim().is_empty() { return Err(errors::ModelError::Validation("slug required".into())); }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    category_id: Uuid,
    input: &NewStore,
    order_number: i32,
) -> Result<Model, errors::ModelError> {
    validate(input)?;
    crate::validate_order_number(order_number)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(category_id),
        name: Set(input.name.clone()),
        slug: Set(input.slug.clone()),
        description: Set(input.description.clone()),
        address: Set(input.address.clone()),
        phone: Set(input.phone.clone()),
        is_active: Set(true),
        order_number: Set(order_number),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(errors::ModelError::from_db)
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id).exec(db).await.map_err(errors::ModelError::from_db)?;
    Ok(())
}
