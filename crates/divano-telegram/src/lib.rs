// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Divano storefront bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide:
//! long polling, DM-only routing, inline keyboards, edit-in-place screen
//! delivery, and photo detail views degrading to text when the image
//! cannot be sent.

pub mod handler;

use async_trait::async_trait;
use divano_config::TelegramConfig;
use divano_core::{
    AdapterType, Button, ChannelAdapter, DivanoError, HealthStatus, InboundEvent, MessageId,
    OutboundScreen, PluginAdapter,
};
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode, Recipient,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Connects via long polling and converts updates into channel-agnostic
/// inbound events.
pub struct TelegramChannel {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set and non-empty.
    pub fn new(config: TelegramConfig) -> Result<Self, DivanoError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            DivanoError::Config("telegram.bot_token is required for the Telegram adapter".into())
        })?;
        if token.is_empty() {
            return Err(DivanoError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, DivanoError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), DivanoError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), DivanoError> {
        if self.polling_handle.is_some() {
            return Ok(()); // Already connected
        }

        let bot = self.bot.clone();
        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let message_branch = Update::filter_message().endpoint(move |msg: Message| {
                let tx = message_tx.clone();
                async move {
                    if !handler::is_dm(&msg) {
                        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                        return respond(());
                    }
                    match handler::event_from_message(&msg) {
                        Some(event) => {
                            if tx.send(event).await.is_err() {
                                warn!("inbound channel closed, dropping message");
                            }
                        }
                        None => {
                            debug!(msg_id = msg.id.0, "ignoring unsupported message type");
                        }
                    }
                    respond(())
                }
            });

            let callback_branch =
                Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                    let tx = callback_tx.clone();
                    async move {
                        // Stop the client-side spinner regardless of outcome.
                        if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                            debug!(error = %e, "failed to answer callback query");
                        }
                        if let Some(event) = handler::event_from_callback(&q) {
                            if tx.send(event).await.is_err() {
                                warn!("inbound channel closed, dropping callback");
                            }
                        }
                        respond(())
                    }
                });

            let dispatch_tree = dptree::entry()
                .branch(message_branch)
                .branch(callback_branch);

            Dispatcher::builder(bot, dispatch_tree)
                .default_handler(|_| async {}) // Silently ignore other updates
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, screen: OutboundScreen) -> Result<MessageId, DivanoError> {
        let chat_id = parse_chat_id(&screen.conversation_id)?;
        let markup = keyboard_markup(&screen.view.keyboard);

        // Photo first; degrade to text with a note when it cannot be sent.
        if let Some(ref image) = screen.view.image {
            match self
                .bot
                .send_photo(Recipient::Id(chat_id), InputFile::file(image))
                .caption(screen.view.text.clone())
                .parse_mode(ParseMode::Markdown)
                .reply_markup(markup.clone())
                .await
            {
                Ok(sent) => {
                    // The button-carrying message is superseded by the photo.
                    if let Some(old) = parse_message_id(screen.edit_message_id.as_deref()) {
                        let _ = self.bot.delete_message(chat_id, old).await;
                    }
                    return Ok(MessageId(sent.id.0.to_string()));
                }
                Err(e) => {
                    warn!(error = %e, image = %image, "photo send failed, degrading to text");
                    let degraded = OutboundScreen {
                        view: divano_core::ScreenView {
                            text: format!(
                                "{}\n\n(Изображение недоступно)",
                                screen.view.text
                            ),
                            keyboard: screen.view.keyboard.clone(),
                            image: None,
                        },
                        ..screen
                    };
                    return self.deliver_text(chat_id, degraded, markup).await;
                }
            }
        }

        self.deliver_text(chat_id, screen, markup).await
    }

    async fn receive(&self) -> Result<InboundEvent, DivanoError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| DivanoError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}

impl TelegramChannel {
    /// Sends or edits a text screen, trying Markdown first and falling back
    /// to plain text when the formatting is rejected.
    async fn deliver_text(
        &self,
        chat_id: ChatId,
        screen: OutboundScreen,
        markup: InlineKeyboardMarkup,
    ) -> Result<MessageId, DivanoError> {
        if let Some(message_id) = parse_message_id(screen.edit_message_id.as_deref()) {
            let result = self
                .bot
                .edit_message_text(chat_id, message_id, screen.view.text.clone())
                .parse_mode(ParseMode::Markdown)
                .reply_markup(markup.clone())
                .await;
            return match result {
                Ok(_) => Ok(MessageId(message_id.0.to_string())),
                Err(e) => {
                    let detail = e.to_string();
                    if detail.contains("message is not modified") {
                        return Ok(MessageId(message_id.0.to_string()));
                    }
                    if detail.contains("can't parse entities") {
                        warn!(error = %e, "Markdown edit failed, retrying as plain text");
                        self.bot
                            .edit_message_text(chat_id, message_id, screen.view.text.clone())
                            .reply_markup(markup)
                            .await
                            .map_err(channel_err)?;
                        return Ok(MessageId(message_id.0.to_string()));
                    }
                    // Editing an old or deleted message: send fresh instead.
                    warn!(error = %e, "edit failed, sending a new message");
                    let sent = self
                        .bot
                        .send_message(Recipient::Id(chat_id), screen.view.text.clone())
                        .parse_mode(ParseMode::Markdown)
                        .reply_markup(markup)
                        .await
                        .map_err(channel_err)?;
                    Ok(MessageId(sent.id.0.to_string()))
                }
            };
        }

        match self
            .bot
            .send_message(Recipient::Id(chat_id), screen.view.text.clone())
            .parse_mode(ParseMode::Markdown)
            .reply_markup(markup.clone())
            .await
        {
            Ok(sent) => Ok(MessageId(sent.id.0.to_string())),
            Err(e) => {
                warn!(error = %e, "Markdown send failed, sending as plain text");
                let sent = self
                    .bot
                    .send_message(Recipient::Id(chat_id), screen.view.text.clone())
                    .reply_markup(markup)
                    .await
                    .map_err(channel_err)?;
                Ok(MessageId(sent.id.0.to_string()))
            }
        }
    }
}

fn channel_err(e: teloxide::RequestError) -> DivanoError {
    DivanoError::Channel {
        message: format!("telegram request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

fn parse_chat_id(conversation_id: &str) -> Result<ChatId, DivanoError> {
    conversation_id
        .parse::<i64>()
        .map(ChatId)
        .map_err(|e| DivanoError::Channel {
            message: format!("invalid conversation id `{conversation_id}`: {e}"),
            source: None,
        })
}

fn parse_message_id(message_id: Option<&str>) -> Option<teloxide::types::MessageId> {
    message_id?.parse::<i32>().ok().map(teloxide::types::MessageId)
}

fn keyboard_markup(rows: &[Vec<Button>]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()))
            .collect::<Vec<_>>()
    }))
}
