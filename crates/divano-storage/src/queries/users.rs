// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User row CRUD operations.

use chrono::{DateTime, Utc};
use divano_core::{DivanoError, SubscriptionStatus, User, UserProfile};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

const USER_COLUMNS: &str = "id, telegram_id, username, first_name, last_name, phone_number, \
     email, registration_date, last_activity, subscription_status, subscription_expiry, is_active";

pub(crate) fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        telegram_id: row.get(1)?,
        username: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        phone_number: row.get(5)?,
        email: row.get(6)?,
        registration_date: row.get(7)?,
        last_activity: row.get(8)?,
        subscription_status: super::parse_status(row.get(9)?, 9)?,
        subscription_expiry: row.get(10)?,
        is_active: row.get(11)?,
    })
}

/// Create a user with status FREE and both timestamps set to `now`.
pub async fn create_user(
    db: &Database,
    profile: &UserProfile,
    now: DateTime<Utc>,
) -> Result<User, DivanoError> {
    let profile = profile.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (telegram_id, username, first_name, last_name, phone_number, \
                 email, registration_date, last_activity, subscription_status, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1)",
                params![
                    profile.telegram_id,
                    profile.username,
                    profile.first_name,
                    profile.last_name,
                    profile.phone_number,
                    profile.email,
                    now,
                    now,
                    SubscriptionStatus::Free.to_string(),
                ],
            )?;
            Ok(User {
                id: conn.last_insert_rowid(),
                telegram_id: profile.telegram_id,
                username: profile.username,
                first_name: profile.first_name,
                last_name: profile.last_name,
                phone_number: profile.phone_number,
                email: profile.email,
                registration_date: now,
                last_activity: now,
                subscription_status: SubscriptionStatus::Free,
                subscription_expiry: None,
                is_active: true,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Look up a user by the external platform identity key.
pub async fn user_by_telegram_id(
    db: &Database,
    telegram_id: &str,
) -> Result<Option<User>, DivanoError> {
    let telegram_id = telegram_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE telegram_id = ?1"
            ))?;
            match stmt.query_row(params![telegram_id], map_user) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Look up a user by primary key.
pub async fn user_by_id(db: &Database, id: i64) -> Result<Option<User>, DivanoError> {
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
            match stmt.query_row(params![id], map_user) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Persist the profile fields and `last_activity` of a merged user row.
pub async fn update_user_profile(db: &Database, user: &User) -> Result<(), DivanoError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE users SET username = ?1, first_name = ?2, last_name = ?3, \
                 phone_number = ?4, email = ?5, last_activity = ?6 WHERE id = ?7",
                params![
                    user.username,
                    user.first_name,
                    user.last_name,
                    user.phone_number,
                    user.email,
                    user.last_activity,
                    user.id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Update the denormalized subscription status/expiry of a user.
pub async fn set_subscription_state(
    db: &Database,
    user_id: i64,
    status: SubscriptionStatus,
    expiry: Option<DateTime<Utc>>,
) -> Result<(), DivanoError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE users SET subscription_status = ?1, subscription_expiry = ?2 WHERE id = ?3",
                params![status.to_string(), expiry, user_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
