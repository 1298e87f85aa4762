use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

/// Unique index over `order_number`.
pub const ORDER_CONSTRAINT: &str = "uniq_site_contact_order";
/// Display name used when a contact is created without one.
pub const DEFAULT_STORE_NAME: &str = "New store";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_contact")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub store_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub is_active: bool,
    pub order_number: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewContact {
    pub store_name: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub is_active: Option<bool>,
}

pub async fn create(db: &DatabaseConnection, input: &NewContact, order_number: i32) -> Result<Model, errors::ModelError> {
    crate::validate_order_number(order_number)?;
    if !input.email.is_empty() && !input.email.contains('@') {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    let store_name = input
        .store_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_STORE_NAME);
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        store_name: Set(store_name.to_string()),
        phone: Set(input.phone.clone()),
        email: Set(input.email.clone()),
        address: Set(input.address.clone()),
        is_active: Set(input.is_active.unwrap_or(true)),
        order_number: Set(order_number),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(errors::ModelError::from_db)
}
