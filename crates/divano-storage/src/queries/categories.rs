// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category read operations plus the insert used by seeding and tests.

use divano_core::{Category, DivanoError};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

fn map_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

/// All categories, by id.
pub async fn categories(db: &Database) -> Result<Vec<Category>, DivanoError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, description FROM categories ORDER BY id")?;
            let rows = stmt.query_map([], map_category)?;
            let mut categories = Vec::new();
            for row in rows {
                categories.push(row?);
            }
            Ok(categories)
        })
        .await
        .map_err(map_tr_err)
}

/// A category by primary key.
pub async fn category_by_id(db: &Database, id: i64) -> Result<Option<Category>, DivanoError> {
    db.connection()
        .call(move |conn| {
            match conn.query_row(
                "SELECT id, name, description FROM categories WHERE id = ?1",
                params![id],
                map_category,
            ) {
                Ok(category) => Ok(Some(category)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a category, returning it with its assigned id.
pub async fn insert_category(
    db: &Database,
    name: &str,
    description: Option<&str>,
) -> Result<Category, DivanoError> {
    let name = name.to_string();
    let description = description.map(String::from);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO categories (name, description) VALUES (?1, ?2)",
                params![name, description],
            )?;
            Ok(Category {
                id: conn.last_insert_rowid(),
                name,
                description,
            })
        })
        .await
        .map_err(map_tr_err)
}
