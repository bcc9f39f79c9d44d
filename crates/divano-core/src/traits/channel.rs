// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the chat transport (Telegram in the reference
//! deployment).

use async_trait::async_trait;

use crate::error::DivanoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundEvent, MessageId, OutboundScreen};

/// Adapter for the bidirectional chat transport.
///
/// The core only requires delivery of rendered screens (text, button rows,
/// optional image) and receipt of the three inbound action kinds; everything
/// platform-specific stays behind this seam.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), DivanoError>;

    /// Delivers a rendered screen to a conversation.
    async fn send(&self, screen: OutboundScreen) -> Result<MessageId, DivanoError>;

    /// Receives the next inbound action from the platform.
    async fn receive(&self) -> Result<InboundEvent, DivanoError>;
}
