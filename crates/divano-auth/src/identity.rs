// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User registration and profile merging.

use chrono::Utc;
use divano_core::{DivanoError, User, UserProfile};
use tracing::debug;

use crate::AccountService;

impl AccountService {
    /// Registers a new user or updates an existing one.
    ///
    /// A new user starts with status FREE and both timestamps set to now.
    /// An existing user gets non-empty profile fields merged in and
    /// `last_activity` refreshed. Returns the user and whether it was
    /// newly created. Idempotent modulo timestamp drift.
    pub async fn register_or_update(
        &self,
        profile: &UserProfile,
    ) -> Result<(User, bool), DivanoError> {
        let now = Utc::now();
        match self.store().user_by_telegram_id(&profile.telegram_id).await? {
            None => {
                let user = self.store().create_user(profile, now).await?;
                debug!(telegram_id = %profile.telegram_id, user_id = user.id, "registered user");
                Ok((user, true))
            }
            Some(mut user) => {
                merge_profile(&mut user, profile);
                user.last_activity = now;
                self.store().update_user_profile(&user).await?;
                Ok((user, false))
            }
        }
    }

    /// Looks up a user by the external platform identity key.
    pub async fn get_user(&self, telegram_id: &str) -> Result<Option<User>, DivanoError> {
        self.store().user_by_telegram_id(telegram_id).await
    }
}

/// Merge-on-update profile semantics: a stored field is overwritten only
/// when the incoming value is non-empty. A client omitting a field never
/// erases previously known data.
fn merge_profile(user: &mut User, profile: &UserProfile) {
    merge_field(&mut user.username, &profile.username);
    merge_field(&mut user.first_name, &profile.first_name);
    merge_field(&mut user.last_name, &profile.last_name);
    merge_field(&mut user.phone_number, &profile.phone_number);
    merge_field(&mut user.email, &profile.email);
}

fn merge_field(current: &mut Option<String>, incoming: &Option<String>) {
    if let Some(value) = incoming
        && !value.is_empty()
    {
        *current = Some(value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use divano_core::SubscriptionStatus;

    fn user_with(username: Option<&str>, first_name: Option<&str>) -> User {
        User {
            id: 1,
            telegram_id: "tg".into(),
            username: username.map(String::from),
            first_name: first_name.map(String::from),
            last_name: None,
            phone_number: None,
            email: None,
            registration_date: DateTime::UNIX_EPOCH,
            last_activity: DateTime::UNIX_EPOCH,
            subscription_status: SubscriptionStatus::Free,
            subscription_expiry: None,
            is_active: true,
        }
    }

    #[test]
    fn non_empty_fields_overwrite() {
        let mut user = user_with(Some("old"), Some("Пётр"));
        let profile = UserProfile {
            telegram_id: "tg".into(),
            username: Some("new".into()),
            ..Default::default()
        };
        merge_profile(&mut user, &profile);
        assert_eq!(user.username.as_deref(), Some("new"));
        assert_eq!(user.first_name.as_deref(), Some("Пётр"));
    }

    #[test]
    fn absent_fields_never_erase() {
        let mut user = user_with(Some("keep"), Some("Мария"));
        let profile = UserProfile {
            telegram_id: "tg".into(),
            ..Default::default()
        };
        merge_profile(&mut user, &profile);
        assert_eq!(user.username.as_deref(), Some("keep"));
        assert_eq!(user.first_name.as_deref(), Some("Мария"));
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let mut user = user_with(Some("keep"), None);
        let profile = UserProfile {
            telegram_id: "tg".into(),
            username: Some(String::new()),
            first_name: Some("Олег".into()),
            ..Default::default()
        };
        merge_profile(&mut user, &profile);
        assert_eq!(user.username.as_deref(), Some("keep"));
        assert_eq!(user.first_name.as_deref(), Some("Олег"));
    }
}
