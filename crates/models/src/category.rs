use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, store};

/// Unique index over `order_number`.
pub const ORDER_CONSTRAINT: &str = "uniq_category_order";
/// Unique index over `name_key`.
pub const NAME_CONSTRAINT: &str = "uniq_category_name_key";
/// Slug of the fallback category used by stores created without one.
pub const DEFAULT_SLUG: &str = "uncategorized";
/// Postgres-generated name of the `slug` unique key.
pub const SLUG_CONSTRAINT: &str = "category_slug_key";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Lowercased normalized form of `name`, backing the case-insensitive unique index.
    pub name_key: String,
    pub slug: Option<String>,
    pub order_number: i32,
    pub cover_image: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Store }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Store => Entity::has_many(store::Entity).into(),
        }
    }
}

impl Related<store::Entity> for Entity {
    fn to() -> RelationDef { Relation::Store.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Width of the `name` and `name_key` columns, in characters.
pub const NAME_COLUMN_CHARS: usize = 191;
/// Longest accepted name: the column width minus room for a ` (<millis>)` collision suffix.
pub const NAME_MAX_CHARS: usize = NAME_COLUMN_CHARS - 16;

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    let name = name.trim();
    if name.is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(errors::ModelError::Validation(format!("name longer than {NAME_MAX_CHARS} characters")));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    name_key: &str,
    slug: Option<&str>,
    order_number: i32,
    cover_image: Option<&str>,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    crate::validate_order_number(order_number)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        name_key: Set(name_key.to_string()),
        slug: Set(slug.map(str::to_string)),
        order_number: Set(order_number),
        cover_image: Set(cover_image.map(str::to_string)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(errors::ModelError::from_db)
}
