// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation navigator for the Divano storefront bot.
//!
//! A request-driven finite-state dialogue controller: inbound actions
//! (commands, button presses, free text) are validated against the current
//! screen and answered with the next screen plus a rendered view. The state
//! table lives in [`Navigator::transition`] and is directly unit-testable
//! without a live transport.

pub mod action;
pub mod navigator;
pub mod render;
pub mod screen;

pub use action::{Action, ButtonAction, Command};
pub use navigator::Navigator;
pub use screen::{ProductOrigin, Screen};
