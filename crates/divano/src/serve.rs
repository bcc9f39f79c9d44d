// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot wiring and the serve loop.
//!
//! One inbound action is processed to completion before the next is taken,
//! so each conversation sees strictly ordered screens and the single-writer
//! store never interleaves a request's writes.

use std::sync::Arc;

use divano_auth::AccountService;
use divano_catalog::CatalogService;
use divano_config::DivanoConfig;
use divano_core::{
    ActionKind, CatalogStore, ChannelAdapter, DivanoError, OutboundScreen, PluginAdapter,
};
use divano_dialog::Navigator;
use divano_storage::SqliteStorage;
use divano_telegram::TelegramChannel;
use tracing::{error, info};

/// Run the bot until interrupted.
pub async fn run(config: DivanoConfig) -> Result<(), DivanoError> {
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let store: Arc<dyn CatalogStore> = storage.clone();
    let accounts = AccountService::new(store.clone(), config.auth.clone(), config.pricing.clone());
    let catalog = CatalogService::new(store);
    let navigator = Navigator::new(accounts, catalog);

    let mut channel = TelegramChannel::new(config.telegram.clone())?;
    channel.connect().await?;
    info!(name = %config.agent.name, "bot started");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            inbound = channel.receive() => {
                let event = match inbound {
                    Ok(event) => event,
                    Err(err) => {
                        error!(error = %err, "inbound channel failed");
                        break;
                    }
                };

                let view = navigator.handle_event(&event).await;

                // Button presses edit their message in place; commands and
                // free text get a fresh message.
                let edit_message_id = match event.action {
                    ActionKind::Button(_) => event.message_id.clone(),
                    _ => None,
                };
                let outbound = OutboundScreen {
                    conversation_id: event.conversation_id.clone(),
                    view,
                    edit_message_id,
                };
                if let Err(err) = channel.send(outbound).await {
                    // Scoped to this conversation; keep serving the rest.
                    error!(error = %err, conversation = %event.conversation_id,
                        "screen delivery failed");
                }
            }
        }
    }

    channel.shutdown().await?;
    storage.shutdown().await?;
    Ok(())
}
