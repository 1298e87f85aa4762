//! [`OrderedTable`] descriptions of the directory tables.

use models::{category, site_contact, store, store_image};

use super::seaorm::{utc, OrderedTable};
use crate::ordering::domain::{PartitionKey, Slot};

/// Categories: one global partition, unique names.
pub struct CategoryTable;

impl OrderedTable for CategoryTable {
    type Entity = category::Entity;

    const LABEL: &'static str = "category";
    const ORDER_CONSTRAINT: &'static str = category::ORDER_CONSTRAINT;
    const NAME_CONSTRAINT: Option<&'static str> = Some(category::NAME_CONSTRAINT);

    fn id_column() -> category::Column { category::Column::Id }
    fn order_column() -> category::Column { category::Column::OrderNumber }
    fn created_column() -> category::Column { category::Column::CreatedAt }
    fn partition_column() -> Option<category::Column> { None }

    fn to_slot(m: &category::Model) -> Slot {
        Slot { id: m.id, partition: PartitionKey::Global, ordinal: m.order_number, created_at: utc(&m.created_at) }
    }

    fn name_of(m: &category::Model) -> Option<String> { Some(m.name.clone()) }
}

/// Stores, partitioned by category.
pub struct StoreTable;

impl OrderedTable for StoreTable {
    type Entity = store::Entity;

    const LABEL: &'static str = "store";
    const ORDER_CONSTRAINT: &'static str = store::ORDER_CONSTRAINT;

    fn id_column() -> store::Column { store::Column::Id }
    fn order_column() -> store::Column { store::Column::OrderNumber }
    fn created_column() -> store::Column { store::Column::CreatedAt }
    fn partition_column() -> Option<store::Column> { Some(store::Column::CategoryId) }

    fn to_slot(m: &store::Model) -> Slot {
        Slot { id: m.id, partition: PartitionKey::Scoped(m.category_id), ordinal: m.order_number, created_at: utc(&m.created_at) }
    }
}

/// Site contacts: one global partition.
pub struct ContactTable;

impl OrderedTable for ContactTable {
    type Entity = site_contact::Entity;

    const LABEL: &'static str = "site_contact";
    const ORDER_CONSTRAINT: &'static str = site_contact::ORDER_CONSTRAINT;

    fn id_column() -> site_contact::Column { site_contact::Column::Id }
    fn order_column() -> site_contact::Column { site_contact::Column::OrderNumber }
    fn created_column() -> site_contact::Column { site_contact::Column::CreatedAt }
    fn partition_column() -> Option<site_contact::Column> { None }

    fn to_slot(m: &site_contact::Model) -> Slot {
        Slot { id: m.id, partition: PartitionKey::Global, ordinal: m.order_number, created_at: utc(&m.created_at) }
    }
}

/// Store gallery images, partitioned by store.
pub struct StoreImageTable;

impl OrderedTable for StoreImageTable {
    type Entity = store_image::Entity;

    const LABEL: &'static str = "store_image";
    const ORDER_CONSTRAINT: &'static str = store_image::ORDER_CONSTRAINT;

    fn id_column() -> store_image::Column { store_image::Column::Id }
    fn order_column() -> store_image::Column { store_image::Column::OrderNumber }
    fn created_column() -> store_image::Column { store_image::Column::CreatedAt }
    fn partition_column() -> Option<store_image::Column> { Some(store_image::Column::StoreId) }

    fn to_slot(m: &store_image::Model) -> Slot {
        Slot { id: m.id, partition: PartitionKey::Scoped(m.store_id), ordinal: m.order_number, created_at: utc(&m.created_at) }
    }
}
