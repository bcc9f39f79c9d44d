// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscription history operations.
//!
//! The history is append-only: activation and renewal insert new rows, and
//! every write path syncs the owning user's denormalized status/expiry in
//! the same transaction.

use chrono::{DateTime, Utc};
use divano_core::{DivanoError, NewSubscription, Subscription, SubscriptionStatus};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

const SUBSCRIPTION_COLUMNS: &str =
    "id, user_id, status, period, start_date, end_date, payment_id, payment_amount, payment_date";

pub(crate) fn map_subscription(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subscription> {
    Ok(Subscription {
        id: row.get(0)?,
        user_id: row.get(1)?,
        status: super::parse_status(row.get(2)?, 2)?,
        period: super::parse_period(row.get(3)?, 3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        payment_id: row.get(6)?,
        payment_amount: row.get(7)?,
        payment_date: row.get(8)?,
    })
}

/// The current subscription: latest-by-`end_date` row still ending after `now`.
pub async fn current_subscription(
    db: &Database,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<Option<Subscription>, DivanoError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
                 WHERE user_id = ?1 AND end_date > ?2 ORDER BY end_date DESC LIMIT 1"
            ))?;
            match stmt.query_row(params![user_id, now], map_subscription) {
                Ok(sub) => Ok(Some(sub)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Full history for a user, newest end date first.
pub async fn subscription_history(
    db: &Database,
    user_id: i64,
) -> Result<Vec<Subscription>, DivanoError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
                 WHERE user_id = ?1 ORDER BY end_date DESC"
            ))?;
            let rows = stmt.query_map(params![user_id], map_subscription)?;
            let mut subs = Vec::new();
            for row in rows {
                subs.push(row?);
            }
            Ok(subs)
        })
        .await
        .map_err(map_tr_err)
}

/// Append a subscription row and sync the user's denormalized fields to it,
/// atomically.
pub async fn activate_subscription(
    db: &Database,
    record: &NewSubscription,
) -> Result<Subscription, DivanoError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO subscriptions (user_id, status, period, start_date, end_date, \
                 payment_id, payment_amount, payment_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.user_id,
                    record.status.to_string(),
                    record.period.map(|p| p.to_string()),
                    record.start_date,
                    record.end_date,
                    record.payment_id,
                    record.payment_amount,
                    record.payment_date,
                ],
            )?;
            let id = tx.last_insert_rowid();
            tx.execute(
                "UPDATE users SET subscription_status = ?1, subscription_expiry = ?2 WHERE id = ?3",
                params![
                    record.status.to_string(),
                    record.end_date,
                    record.user_id,
                ],
            )?;
            tx.commit()?;
            Ok(Subscription {
                id,
                user_id: record.user_id,
                status: record.status,
                period: record.period,
                start_date: record.start_date,
                end_date: record.end_date,
                payment_id: record.payment_id,
                payment_amount: record.payment_amount,
                payment_date: record.payment_date,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Mark the current subscription EXPIRED with `end_date = now` and sync the
/// user, atomically. Returns `false` (writing nothing) when no current
/// subscription exists.
pub async fn cancel_current_subscription(
    db: &Database,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<bool, DivanoError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let current_id: Option<i64> = match tx.query_row(
                "SELECT id FROM subscriptions WHERE user_id = ?1 AND end_date > ?2 \
                 ORDER BY end_date DESC LIMIT 1",
                params![user_id, now],
                |row| row.get(0),
            ) {
                Ok(id) => Some(id),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e.into()),
            };

            let Some(id) = current_id else {
                return Ok(false);
            };

            tx.execute(
                "UPDATE subscriptions SET status = ?1, end_date = ?2 WHERE id = ?3",
                params![SubscriptionStatus::Expired.to_string(), now, id],
            )?;
            tx.execute(
                "UPDATE users SET subscription_status = ?1, subscription_expiry = ?2 WHERE id = ?3",
                params![SubscriptionStatus::Expired.to_string(), now, user_id],
            )?;
            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(map_tr_err)
}
