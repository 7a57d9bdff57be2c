// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Food item repository.
//!
//! Every accessor except `create` takes the caller's `UserId` and goes
//! through [`OwnershipCheck`], so an item owned by someone else is
//! indistinguishable from a missing one.

use chrono::{DateTime, Utc};
use redb::ReadableTable;

use crate::models::{FoodId, FoodItem, FoodItemId, JoinedFoodItem, UserId};
use crate::storage::database::{
    encode_row, next_id, read_row, DietDatabase, StoreError, StoreResult, FOODS, FOOD_ITEMS,
    FOOD_ITEMS_BY_USER,
};
use crate::storage::ownership::OwnershipCheck;

// =============================================================================
// Index Key Helpers
// =============================================================================

const KEY_LEN: usize = 8 + 8 + 8;

/// Map an i64 onto u64 so that big-endian byte order matches numeric order.
fn order_preserving(millis: i64) -> u64 {
    (millis as u64) ^ (1 << 63)
}

/// Build a composite key for the food_items_by_user table.
///
/// Format: `user_id_be | timestamp_millis (sign flipped)_be | item_id_be`
fn make_index_key(user_id: UserId, timestamp: DateTime<Utc>, item_id: FoodItemId) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    key[..8].copy_from_slice(&user_id.get().to_be_bytes());
    key[8..16].copy_from_slice(&order_preserving(timestamp.timestamp_millis()).to_be_bytes());
    key[16..].copy_from_slice(&item_id.to_be_bytes());
    key
}

fn item_id_from_key(key: &[u8]) -> StoreResult<FoodItemId> {
    let bytes: [u8; 8] = key
        .get(16..KEY_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| StoreError::Corrupt(format!("food item index key of length {}", key.len())))?;
    Ok(u64::from_be_bytes(bytes))
}

// =============================================================================
// FoodItemRepository
// =============================================================================

/// Repository for per-user food items.
pub struct FoodItemRepository<'a> {
    db: &'a DietDatabase,
}

impl<'a> FoodItemRepository<'a> {
    pub fn new(db: &'a DietDatabase) -> Self {
        Self { db }
    }

    /// Log a new item for `user_id`. The food must exist.
    pub fn create(
        &self,
        user_id: UserId,
        food_id: FoodId,
        quantity: u64,
        timestamp: DateTime<Utc>,
    ) -> StoreResult<FoodItem> {
        let write_txn = self.db.begin_write()?;
        let item = {
            let foods = write_txn.open_table(FOODS)?;
            if foods.get(food_id)?.is_none() {
                return Err(StoreError::NotFound(format!("Food {food_id}")));
            }

            let item = FoodItem {
                id: next_id(&write_txn, "food_items")?,
                user_id,
                food_id,
                quantity,
                timestamp,
            };
            let json = encode_row(&item)?;
            let mut items = write_txn.open_table(FOOD_ITEMS)?;
            items.insert(item.id, json.as_slice())?;

            let mut index = write_txn.open_table(FOOD_ITEMS_BY_USER)?;
            let key = make_index_key(user_id, timestamp, item.id);
            index.insert(key.as_slice(), ())?;
            item
        };
        write_txn.commit()?;

        tracing::debug!(user_id = %user_id, item_id = item.id, "food item created");
        Ok(item)
    }

    /// Fetch an item owned by `user_id`, joined with its food.
    pub fn get_owned(&self, id: FoodItemId, user_id: UserId) -> StoreResult<JoinedFoodItem> {
        let read_txn = self.db.begin_read()?;
        let items = read_txn.open_table(FOOD_ITEMS)?;
        let foods = read_txn.open_table(FOODS)?;

        let item: FoodItem =
            read_row::<FoodItem, _>(&items, id).verify_owner(user_id, &format!("Food item {id}"))?;
        let food = read_row(&foods, item.food_id)?.ok_or_else(|| {
            StoreError::Corrupt(format!("food item {id} references missing food {}", item.food_id))
        })?;
        Ok(JoinedFoodItem::new(item, &food))
    }

    /// Items of `user_id` with `from <= timestamp <= to`, oldest first.
    pub fn list_for_user_between(
        &self,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<JoinedFoodItem>> {
        if to < from {
            return Ok(Vec::new());
        }

        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(FOOD_ITEMS_BY_USER)?;
        let items = read_txn.open_table(FOOD_ITEMS)?;
        let foods = read_txn.open_table(FOODS)?;

        let start = make_index_key(user_id, from, 0);
        let end = make_index_key(user_id, to, u64::MAX);

        let mut results = Vec::new();
        for entry in index.range(start.as_slice()..=end.as_slice())? {
            let (key, _) = entry?;
            let item_id = item_id_from_key(key.value())?;

            let item: FoodItem = read_row(&items, item_id)?.ok_or_else(|| {
                StoreError::Corrupt(format!("index points at missing food item {item_id}"))
            })?;
            // Millisecond keys can include items a few nanoseconds outside the window
            if item.timestamp < from || item.timestamp > to {
                continue;
            }
            let food = read_row(&foods, item.food_id)?.ok_or_else(|| {
                StoreError::Corrupt(format!(
                    "food item {item_id} references missing food {}",
                    item.food_id
                ))
            })?;
            results.push(JoinedFoodItem::new(item, &food));
        }
        Ok(results)
    }

    /// Replace quantity and timestamp of an item owned by `user_id`.
    pub fn update_owned(
        &self,
        id: FoodItemId,
        user_id: UserId,
        quantity: u64,
        timestamp: DateTime<Utc>,
    ) -> StoreResult<FoodItem> {
        let write_txn = self.db.begin_write()?;
        let item = {
            let mut items = write_txn.open_table(FOOD_ITEMS)?;
            let mut item: FoodItem =
                read_row::<FoodItem, _>(&items, id).verify_owner(user_id, &format!("Food item {id}"))?;

            let mut index = write_txn.open_table(FOOD_ITEMS_BY_USER)?;
            index.remove(make_index_key(user_id, item.timestamp, id).as_slice())?;

            item.quantity = quantity;
            item.timestamp = timestamp;

            let json = encode_row(&item)?;
            items.insert(id, json.as_slice())?;
            index.insert(make_index_key(user_id, timestamp, id).as_slice(), ())?;
            item
        };
        write_txn.commit()?;
        Ok(item)
    }

    /// Delete an item owned by `user_id`.
    pub fn delete_owned(&self, id: FoodItemId, user_id: UserId) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut items = write_txn.open_table(FOOD_ITEMS)?;
            let item: FoodItem =
                read_row::<FoodItem, _>(&items, id).verify_owner(user_id, &format!("Food item {id}"))?;

            items.remove(id)?;
            let mut index = write_txn.open_table(FOOD_ITEMS_BY_USER)?;
            index.remove(make_index_key(user_id, item.timestamp, id).as_slice())?;
        }
        write_txn.commit()?;

        tracing::debug!(user_id = %user_id, item_id = id, "food item deleted");
        Ok(())
    }
}
