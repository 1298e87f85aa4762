use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, store};

/// Unique index over `(store_id, order_number)`.
pub const ORDER_CONSTRAINT: &str = "uniq_store_image_order";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "store_image")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub store_id: Uuid,
    pub image_url: String,
    pub alt_text: Option<String>,
    pub order_number: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Store }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Store => Entity::belongs_to(store::Entity).from(Column::StoreId).to(store::Column::Id).into(),
        }
    }
}

impl Related<store::Entity> for Entity {
    fn to() -> RelationDef { Relation::Store.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_image_url(u: &str) -> Result<(), errors::ModelError> {
    if !(u.starts_with("http://") || u.starts_with("https://")) {
        return Err(errors::ModelError::Validation("image_url must start with http(s)".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    store_id: Uuid,
    image_url: &str,
    alt_text: Option<&str>,
    order_number: i32,
) -> Result<Model, errors::ModelError> {
    validate_image_url(image_url)?;
    crate::validate_order_number(order_number)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        store_id: Set(store_id),
        image_url: Set(image_url.to_string()),
        alt_text: Set(alt_text.map(str::to_string)),
        order_number: Set(order_number),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(errors::ModelError::from_db)
}
