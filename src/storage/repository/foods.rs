// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Food catalog repository.
//!
//! The catalog is shared by all users. Names are unique, compared
//! case-insensitively through the `foods_by_name` index.

use std::path::Path;

use redb::{ReadableTable, WriteTransaction};

use crate::models::{Food, FoodId, NewFood};
use crate::storage::database::{
    encode_row, next_id, read_row, DietDatabase, StoreError, StoreResult, FOODS, FOODS_BY_NAME,
};

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Repository for the food catalog.
pub struct FoodRepository<'a> {
    db: &'a DietDatabase,
}

impl<'a> FoodRepository<'a> {
    pub fn new(db: &'a DietDatabase) -> Self {
        Self { db }
    }

    /// Insert a catalog entry. Fails with `Conflict` on a duplicate name.
    pub fn create(&self, new_food: &NewFood) -> StoreResult<Food> {
        let write_txn = self.db.begin_write()?;
        let food = insert_food(&write_txn, new_food)?
            .ok_or_else(|| StoreError::Conflict(format!("Food {} already exists", new_food.name)))?;
        write_txn.commit()?;
        Ok(food)
    }

    pub fn get(&self, id: FoodId) -> StoreResult<Option<Food>> {
        let read_txn = self.db.begin_read()?;
        let foods = read_txn.open_table(FOODS)?;
        read_row(&foods, id)
    }

    /// Foods whose name contains `name`, ignoring case, ordered by id.
    /// An empty query returns the whole catalog.
    pub fn search(&self, name: &str) -> StoreResult<Vec<Food>> {
        let needle = name.trim().to_lowercase();
        let read_txn = self.db.begin_read()?;
        let foods = read_txn.open_table(FOODS)?;

        let mut results = Vec::new();
        for entry in foods.iter()? {
            let (_, value) = entry?;
            let food: Food = serde_json::from_slice(value.value())?;
            if food.name.to_lowercase().contains(&needle) {
                results.push(food);
            }
        }
        Ok(results)
    }

    /// Insert every entry whose name is not in the catalog yet.
    ///
    /// Returns the number of foods inserted. Running it twice with the same
    /// input inserts nothing the second time.
    pub fn seed(&self, foods: &[NewFood]) -> StoreResult<usize> {
        let write_txn = self.db.begin_write()?;
        let mut inserted = 0;
        for new_food in foods {
            if insert_food(&write_txn, new_food)?.is_some() {
                inserted += 1;
            }
        }
        write_txn.commit()?;
        Ok(inserted)
    }

    /// Load a JSON array of foods from disk and [`seed`](Self::seed) it.
    pub fn seed_from_file(&self, path: &Path) -> StoreResult<usize> {
        let bytes = std::fs::read(path)?;
        let foods: Vec<NewFood> = serde_json::from_slice(&bytes)?;
        let inserted = self.seed(&foods)?;
        tracing::info!(
            path = %path.display(),
            total = foods.len(),
            inserted,
            "food catalog seeded"
        );
        Ok(inserted)
    }
}

/// Insert inside an open transaction; `None` when the name is already taken.
fn insert_food(write_txn: &WriteTransaction, new_food: &NewFood) -> StoreResult<Option<Food>> {
    let key = name_key(&new_food.name);
    let mut by_name = write_txn.open_table(FOODS_BY_NAME)?;
    if by_name.get(key.as_str())?.is_some() {
        return Ok(None);
    }

    let food = Food {
        id: next_id(write_txn, "foods")?,
        name: new_food.name.trim().to_string(),
        calories: new_food.calories,
        portion: new_food.portion,
    };
    let json = encode_row(&food)?;
    let mut foods = write_txn.open_table(FOODS)?;
    foods.insert(food.id, json.as_slice())?;
    by_name.insert(key.as_str(), food.id)?;
    Ok(Some(food))
}
