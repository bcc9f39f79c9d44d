// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message routing and conversion.
//!
//! Maps Telegram updates into channel-agnostic [`InboundEvent`]s: slash
//! commands, callback payloads, and free text.

use divano_core::{ActionKind, InboundEvent, UserProfile};
use teloxide::types::{CallbackQuery, ChatKind, Message};

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Builds the per-contact profile from a Telegram user.
///
/// Phone number and email are never supplied by the platform; the stored
/// values survive merges untouched.
pub fn profile_from_user(user: &teloxide::types::User) -> UserProfile {
    UserProfile {
        telegram_id: user.id.0.to_string(),
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()),
        last_name: user.last_name.clone(),
        phone_number: None,
        email: None,
    }
}

/// Classifies message text as a command or free text.
///
/// `/start@botname` strips the bot mention; command names are lowercased.
pub fn action_from_text(text: &str) -> ActionKind {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix('/') {
        let name = rest
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .split('@')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        ActionKind::Command(name)
    } else {
        ActionKind::Text(trimmed.to_string())
    }
}

/// Converts a text message into an inbound event, or `None` for
/// non-text messages.
pub fn event_from_message(msg: &Message) -> Option<InboundEvent> {
    let user = msg.from.as_ref()?;
    let text = msg.text()?;
    Some(InboundEvent {
        conversation_id: msg.chat.id.0.to_string(),
        profile: profile_from_user(user),
        action: action_from_text(text),
        message_id: None,
    })
}

/// Converts a callback query into an inbound event, or `None` when the
/// query carries no payload.
pub fn event_from_callback(q: &CallbackQuery) -> Option<InboundEvent> {
    let data = q.data.as_ref()?;
    let (conversation_id, message_id) = match q.message.as_ref() {
        Some(message) => (
            message.chat().id.0.to_string(),
            Some(message.id().0.to_string()),
        ),
        // Inaccessible or missing message: fall back to the sender's DM.
        None => (q.from.id.0.to_string(), None),
    };
    Some(InboundEvent {
        conversation_id,
        profile: profile_from_user(&q.from),
        action: ActionKind::Button(data.clone()),
        message_id,
    })
}
