// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery city lookups.

use divano_core::{City, DivanoError};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

/// All delivery cities, by id.
pub async fn cities(db: &Database) -> Result<Vec<City>, DivanoError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, region FROM cities ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                Ok(City {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    region: row.get(2)?,
                })
            })?;
            let mut cities = Vec::new();
            for row in rows {
                cities.push(row?);
            }
            Ok(cities)
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a city, returning it with its assigned id.
pub async fn insert_city(
    db: &Database,
    name: &str,
    region: Option<&str>,
) -> Result<City, DivanoError> {
    let name = name.to_string();
    let region = region.map(String::from);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO cities (name, region) VALUES (?1, ?2)",
                params![name, region],
            )?;
            Ok(City {
                id: conn.last_insert_rowid(),
                name,
                region,
            })
        })
        .await
        .map_err(map_tr_err)
}
