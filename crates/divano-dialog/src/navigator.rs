// SPDX-FileCopyrightText: 2026 Divano Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation navigator: an explicit state table over
//! `(screen, action)` pairs.
//!
//! Every inbound action is registered against the user, resolved through
//! [`Navigator::transition`], and answered with a rendered screen. Anything
//! unrecognized for the current screen redisplays that screen unchanged.
//! Recoverable failures (missing entities, bad input, wrong code, nothing
//! to cancel) become user-facing screens with a path back to the main menu;
//! only storage failures surface as a generic error message, with the
//! conversation state left untouched.

use std::collections::HashMap;
use std::sync::Mutex;

use divano_auth::AccountService;
use divano_catalog::CatalogService;
use divano_core::{
    Button, DivanoError, InboundEvent, ScreenView, SearchKind, SubscriptionPeriod, UserProfile,
};
use tracing::{debug, error};
use uuid::Uuid;

use crate::action::{Action, ButtonAction, Command};
use crate::render;
use crate::screen::{ProductOrigin, Screen};

/// Per-conversation dialogue controller.
pub struct Navigator {
    accounts: AccountService,
    catalog: CatalogService,
    sessions: Mutex<HashMap<String, Screen>>,
}

impl Navigator {
    pub fn new(accounts: AccountService, catalog: CatalogService) -> Self {
        Self {
            accounts,
            catalog,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The screen a conversation is currently on, if any.
    pub fn current_screen(&self, conversation_id: &str) -> Option<Screen> {
        self.sessions.lock().unwrap().get(conversation_id).cloned()
    }

    /// Handles one inbound action to completion and returns the screen to
    /// deliver. Never fails toward the user.
    pub async fn handle_event(&self, event: &InboundEvent) -> ScreenView {
        let action = Action::parse(&event.action);

        // Register on first contact, refresh profile and activity on every
        // subsequent one.
        if let Err(err) = self.accounts.register_or_update(&event.profile).await {
            error!(error = %err, conversation = %event.conversation_id, "registration failed");
            return render::store_failure();
        }

        let current = self.current_screen(&event.conversation_id);
        let current = match current {
            Some(screen) => screen,
            None => match self.entry_screen(&event.profile.telegram_id).await {
                Ok(screen) => screen,
                Err(err) => {
                    error!(error = %err, "entry state resolution failed");
                    return render::store_failure();
                }
            },
        };

        match self.transition(current, &action, &event.profile).await {
            Ok((next, view)) => {
                debug!(conversation = %event.conversation_id, next = ?next, "screen transition");
                self.sessions
                    .lock()
                    .unwrap()
                    .insert(event.conversation_id.clone(), next);
                view
            }
            Err(err) => {
                // The in-flight write aborted atomically; state is kept.
                error!(error = %err, conversation = %event.conversation_id, "transition failed");
                render::store_failure()
            }
        }
    }

    /// Initial state: straight to the main menu when access is already
    /// active, the code gate otherwise.
    pub async fn entry_screen(&self, telegram_id: &str) -> Result<Screen, DivanoError> {
        if self.accounts.has_active_access(telegram_id).await? {
            Ok(Screen::MainMenu)
        } else {
            Ok(Screen::AwaitingAuthCode)
        }
    }

    /// The transition function: `(screen, action) -> (next screen, view)`.
    pub async fn transition(
        &self,
        current: Screen,
        action: &Action,
        profile: &UserProfile,
    ) -> Result<(Screen, ScreenView), DivanoError> {
        // The code gate only consumes free text and /start.
        if current == Screen::AwaitingAuthCode {
            return match action {
                Action::Command(Command::Start) => self.start_flow(profile).await,
                Action::Text(code) => self.redeem_flow(profile, code).await,
                _ => Ok((
                    Screen::AwaitingAuthCode,
                    render::auth_prompt(profile.first_name.as_deref()),
                )),
            };
        }

        // Commands jump to their flow from any screen.
        if let Action::Command(command) = action {
            return match command {
                Command::Start => self.start_flow(profile).await,
                Command::Catalog => self.enter_catalog(profile).await,
                Command::Search => self.enter_search(profile).await,
                Command::Subscription => self.enter_subscription(profile).await,
                Command::Profile => self.show_profile(profile).await,
                Command::About => Ok((Screen::MainMenu, render::about())),
                Command::Cancel => Ok((
                    Screen::MainMenu,
                    render::main_menu(Some(
                        "Операция отменена. Возвращаемся в главное меню.",
                    )),
                )),
            };
        }

        // Back-to-results from a search-opened detail view re-runs the
        // stored search; from anywhere else it falls through to the search
        // menu below.
        if let (
            Screen::ProductDetail {
                origin: ProductOrigin::Search { kind, value },
                ..
            },
            Action::Button(ButtonAction::BackToResults),
        ) = (&current, action)
        {
            return self.run_search(*kind, value.clone()).await;
        }

        // Navigation buttons accepted on every screen past the code gate.
        if let Action::Button(button) = action {
            match button {
                ButtonAction::BackToMenu => {
                    return Ok((Screen::MainMenu, render::main_menu(None)));
                }
                ButtonAction::Catalog => return self.enter_catalog(profile).await,
                ButtonAction::Search | ButtonAction::BackToResults => {
                    return self.enter_search(profile).await;
                }
                ButtonAction::About => return Ok((Screen::MainMenu, render::about())),
                ButtonAction::Profile => return self.show_profile(profile).await,
                ButtonAction::Subscription => return self.enter_subscription(profile).await,
                ButtonAction::CancelSubscription => {
                    return Ok((Screen::CancelConfirm, render::cancel_confirm()));
                }
                ButtonAction::ConfirmCancel => return self.cancel_flow(profile).await,
                _ => {}
            }
        }

        // Screen-specific transitions.
        match (current, action) {
            (Screen::CatalogCategories, Action::Button(ButtonAction::Category(id))) => {
                self.enter_category(*id).await
            }
            (Screen::CategoryActions { .. }, Action::Button(ButtonAction::ShowAll(id))) => {
                self.enter_product_list(*id).await
            }
            (
                Screen::CategoryActions { .. },
                Action::Button(ButtonAction::SearchInCategory(_)),
            ) => self.enter_search(profile).await,
            (Screen::ProductList { .. }, Action::Button(ButtonAction::Category(id))) => {
                self.enter_category(*id).await
            }
            (
                Screen::ProductList { category_id },
                Action::Button(ButtonAction::Product(id)),
            ) => {
                self.enter_product_detail(*id, ProductOrigin::Category(category_id))
                    .await
            }
            (Screen::ProductDetail { .. }, Action::Button(ButtonAction::ShowAll(id))) => {
                self.enter_product_list(*id).await
            }
            (Screen::SearchMenu, Action::Button(ButtonAction::QuickSearch(kind))) => {
                self.enter_quick_search(*kind).await
            }
            (
                Screen::QuickSearchChoice {
                    kind: SearchKind::Price,
                },
                Action::Button(ButtonAction::PriceLimit(limit)),
            ) => {
                let value = match limit {
                    Some(price) => price.to_string(),
                    None => "any".to_string(),
                };
                self.run_search(SearchKind::Price, value).await
            }
            (
                Screen::QuickSearchChoice { .. },
                Action::Button(ButtonAction::Manufacturer(value)),
            ) => self.run_search(SearchKind::Manufacturer, value.clone()).await,
            (Screen::QuickSearchChoice { .. }, Action::Button(ButtonAction::City(value))) => {
                self.run_search(SearchKind::City, value.clone()).await
            }
            (Screen::QuickSearchValueInput { kind }, Action::Text(value)) => {
                self.run_search(kind, value.clone()).await
            }
            (
                Screen::SearchResults { kind, value },
                Action::Button(ButtonAction::Product(id)),
            ) => {
                self.enter_product_detail(*id, ProductOrigin::Search { kind, value })
                    .await
            }
            (Screen::SubscriptionMenu, Action::Button(ButtonAction::Subscribe(period))) => {
                Ok((
                    Screen::PaymentMethodChoice { period: *period },
                    render::payment_method_choice(*period, self.accounts.price_for(*period)),
                ))
            }
            (
                Screen::PaymentMethodChoice { period },
                Action::Button(ButtonAction::Payment(method)),
            ) => Ok((
                Screen::PaymentPending {
                    period,
                    method: *method,
                },
                render::payment_pending(),
            )),
            (
                Screen::PaymentPending { period, .. },
                Action::Button(ButtonAction::PaymentConfirmed),
            ) => self.confirm_payment_flow(profile, period).await,

            // Everything else is a no-op: redisplay the current screen.
            (screen, _) => {
                let view = self.render_screen(&screen, profile).await?;
                Ok((screen, view))
            }
        }
    }

    /// Re-render any screen from scratch (used for no-op redisplay).
    pub async fn render_screen(
        &self,
        screen: &Screen,
        profile: &UserProfile,
    ) -> Result<ScreenView, DivanoError> {
        match screen {
            Screen::AwaitingAuthCode => {
                Ok(render::auth_prompt(profile.first_name.as_deref()))
            }
            Screen::MainMenu => Ok(render::main_menu(None)),
            Screen::CatalogCategories => {
                let categories = self.catalog.categories().await?;
                Ok(render::catalog_categories(&categories))
            }
            Screen::CategoryActions { category_id } => {
                match self.catalog.category_by_id(*category_id).await? {
                    Some(category) => Ok(render::category_actions(&category)),
                    None => Ok(render::category_not_found()),
                }
            }
            Screen::ProductList { category_id } => {
                match self.catalog.category_by_id(*category_id).await? {
                    Some(category) => {
                        let products =
                            self.catalog.products_by_category(*category_id).await?;
                        Ok(render::product_list(&category, &products))
                    }
                    None => Ok(render::category_not_found()),
                }
            }
            Screen::ProductDetail { product_id, origin } => {
                match self.catalog.product_by_id(*product_id).await? {
                    Some(product) => Ok(self.detail_view(&product, origin).await?),
                    None => Ok(render::product_not_found()),
                }
            }
            Screen::SearchMenu => Ok(render::search_menu()),
            Screen::QuickSearchChoice { kind } => match kind {
                SearchKind::Price => Ok(render::price_choice()),
                SearchKind::Manufacturer => {
                    let values = self.catalog.manufacturers().await?;
                    Ok(render::value_choice(*kind, &values))
                }
                SearchKind::City => {
                    let values = self.catalog.product_cities().await?;
                    Ok(render::value_choice(*kind, &values))
                }
                SearchKind::Name | SearchKind::Code => Ok(render::value_input(*kind)),
            },
            Screen::QuickSearchValueInput { kind } => Ok(render::value_input(*kind)),
            Screen::SearchResults { kind, value } => {
                match self.catalog.quick_search(*kind, value).await {
                    Ok(products) => Ok(render::search_results(&products)),
                    Err(DivanoError::InvalidInput(_)) => Ok(render::invalid_search_value()),
                    Err(err) => Err(err),
                }
            }
            Screen::SubscriptionMenu => self.subscription_view(profile).await,
            Screen::PaymentMethodChoice { period } => Ok(render::payment_method_choice(
                *period,
                self.accounts.price_for(*period),
            )),
            Screen::PaymentPending { .. } => Ok(render::payment_pending()),
            Screen::PaymentConfirmed { period, end_date } => {
                Ok(render::payment_confirmed(*period, *end_date))
            }
            Screen::CancelConfirm => Ok(render::cancel_confirm()),
        }
    }

    // --- Flow steps ---

    async fn start_flow(
        &self,
        profile: &UserProfile,
    ) -> Result<(Screen, ScreenView), DivanoError> {
        if self.accounts.has_active_access(&profile.telegram_id).await? {
            Ok((Screen::MainMenu, render::main_menu(None)))
        } else {
            Ok((
                Screen::AwaitingAuthCode,
                render::auth_prompt(profile.first_name.as_deref()),
            ))
        }
    }

    async fn redeem_flow(
        &self,
        profile: &UserProfile,
        code: &str,
    ) -> Result<(Screen, ScreenView), DivanoError> {
        match self.accounts.redeem_code(&profile.telegram_id, code).await {
            Ok(subscription) => {
                let notice = format!(
                    "✅ Код активирован! Ваша подписка действительна до {}.",
                    subscription.end_date.format("%d.%m.%Y")
                );
                Ok((Screen::MainMenu, render::main_menu(Some(&notice))))
            }
            Err(DivanoError::InvalidCode) => Ok((
                Screen::AwaitingAuthCode,
                render::auth_retry("❌ Неверный код авторизации."),
            )),
            Err(DivanoError::NotFound { .. }) => Ok((
                Screen::AwaitingAuthCode,
                render::auth_retry(
                    "❌ Пользователь не найден. Пожалуйста, начните с команды /start.",
                ),
            )),
            Err(err) => Err(err),
        }
    }

    async fn enter_catalog(
        &self,
        profile: &UserProfile,
    ) -> Result<(Screen, ScreenView), DivanoError> {
        if !self.accounts.has_active_access(&profile.telegram_id).await? {
            return Ok((Screen::MainMenu, render::no_access()));
        }
        let categories = self.catalog.categories().await?;
        Ok((
            Screen::CatalogCategories,
            render::catalog_categories(&categories),
        ))
    }

    async fn enter_search(
        &self,
        profile: &UserProfile,
    ) -> Result<(Screen, ScreenView), DivanoError> {
        if !self.accounts.has_active_access(&profile.telegram_id).await? {
            return Ok((Screen::MainMenu, render::no_access()));
        }
        Ok((Screen::SearchMenu, render::search_menu()))
    }

    async fn enter_category(&self, id: i64) -> Result<(Screen, ScreenView), DivanoError> {
        match self.catalog.category_by_id(id).await? {
            Some(category) => Ok((
                Screen::CategoryActions { category_id: id },
                render::category_actions(&category),
            )),
            None => Ok((Screen::CatalogCategories, render::category_not_found())),
        }
    }

    async fn enter_product_list(
        &self,
        category_id: i64,
    ) -> Result<(Screen, ScreenView), DivanoError> {
        match self.catalog.category_by_id(category_id).await? {
            Some(category) => {
                let products = self.catalog.products_by_category(category_id).await?;
                Ok((
                    Screen::ProductList { category_id },
                    render::product_list(&category, &products),
                ))
            }
            None => Ok((Screen::CatalogCategories, render::category_not_found())),
        }
    }

    async fn enter_product_detail(
        &self,
        product_id: i64,
        origin: ProductOrigin,
    ) -> Result<(Screen, ScreenView), DivanoError> {
        match self.catalog.product_by_id(product_id).await? {
            Some(product) => {
                let view = self.detail_view(&product, &origin).await?;
                Ok((Screen::ProductDetail { product_id, origin }, view))
            }
            // Fall back to where the user came from.
            None => {
                let fallback = match origin {
                    ProductOrigin::Category(category_id) => {
                        Screen::ProductList { category_id }
                    }
                    ProductOrigin::Search { kind, value } => {
                        Screen::SearchResults { kind, value }
                    }
                };
                Ok((fallback, render::product_not_found()))
            }
        }
    }

    async fn detail_view(
        &self,
        product: &divano_core::Product,
        origin: &ProductOrigin,
    ) -> Result<ScreenView, DivanoError> {
        let category_name = self
            .catalog
            .category_by_id(product.category_id)
            .await?
            .map(|c| c.name)
            .unwrap_or_else(|| "Неизвестная категория".to_string());
        let back = match origin {
            ProductOrigin::Category(category_id) => Button::new(
                "⬅️ Назад к товарам",
                format!("show_all_{category_id}"),
            ),
            ProductOrigin::Search { .. } => {
                Button::new("⬅️ Назад к результатам", "back_to_results")
            }
        };
        Ok(render::product_detail(product, &category_name, back))
    }

    async fn enter_quick_search(
        &self,
        kind: SearchKind,
    ) -> Result<(Screen, ScreenView), DivanoError> {
        match kind {
            SearchKind::Price => Ok((
                Screen::QuickSearchChoice { kind },
                render::price_choice(),
            )),
            SearchKind::Manufacturer => {
                let values = self.catalog.manufacturers().await?;
                Ok((
                    Screen::QuickSearchChoice { kind },
                    render::value_choice(kind, &values),
                ))
            }
            SearchKind::City => {
                let values = self.catalog.product_cities().await?;
                Ok((
                    Screen::QuickSearchChoice { kind },
                    render::value_choice(kind, &values),
                ))
            }
            SearchKind::Name | SearchKind::Code => Ok((
                Screen::QuickSearchValueInput { kind },
                render::value_input(kind),
            )),
        }
    }

    async fn run_search(
        &self,
        kind: SearchKind,
        value: String,
    ) -> Result<(Screen, ScreenView), DivanoError> {
        match self.catalog.quick_search(kind, &value).await {
            Ok(products) => Ok((
                Screen::SearchResults { kind, value },
                render::search_results(&products),
            )),
            Err(DivanoError::InvalidInput(_)) => Ok((
                Screen::QuickSearchValueInput { kind },
                render::invalid_search_value(),
            )),
            Err(err) => Err(err),
        }
    }

    async fn enter_subscription(
        &self,
        profile: &UserProfile,
    ) -> Result<(Screen, ScreenView), DivanoError> {
        let view = self.subscription_view(profile).await?;
        Ok((Screen::SubscriptionMenu, view))
    }

    async fn subscription_view(
        &self,
        profile: &UserProfile,
    ) -> Result<ScreenView, DivanoError> {
        let user = self
            .accounts
            .get_user(&profile.telegram_id)
            .await?
            .ok_or_else(|| DivanoError::not_found("user"))?;
        let info = self.accounts.summary(user.id).await?;
        Ok(render::subscription_menu(
            &info,
            self.accounts.price_for(SubscriptionPeriod::Month),
            self.accounts.price_for(SubscriptionPeriod::Year),
        ))
    }

    async fn show_profile(
        &self,
        profile: &UserProfile,
    ) -> Result<(Screen, ScreenView), DivanoError> {
        let user = self
            .accounts
            .get_user(&profile.telegram_id)
            .await?
            .ok_or_else(|| DivanoError::not_found("user"))?;
        Ok((Screen::MainMenu, render::profile(&user)))
    }

    async fn confirm_payment_flow(
        &self,
        profile: &UserProfile,
        period: SubscriptionPeriod,
    ) -> Result<(Screen, ScreenView), DivanoError> {
        let user = self
            .accounts
            .get_user(&profile.telegram_id)
            .await?
            .ok_or_else(|| DivanoError::not_found("user"))?;
        // Simulated gateway: the payment reference is generated locally.
        let payment_id = format!("sim-{}", Uuid::new_v4());
        let subscription = self
            .accounts
            .extend_or_create(user.id, period, Some(payment_id))
            .await?;
        Ok((
            Screen::PaymentConfirmed {
                period,
                end_date: subscription.end_date,
            },
            render::payment_confirmed(period, subscription.end_date),
        ))
    }

    async fn cancel_flow(
        &self,
        profile: &UserProfile,
    ) -> Result<(Screen, ScreenView), DivanoError> {
        let user = self
            .accounts
            .get_user(&profile.telegram_id)
            .await?
            .ok_or_else(|| DivanoError::not_found("user"))?;
        match self.accounts.cancel(user.id).await {
            Ok(()) => Ok((Screen::MainMenu, render::cancel_result(true))),
            Err(DivanoError::NoActiveSubscription) => {
                Ok((Screen::MainMenu, render::cancel_result(false)))
            }
            Err(err) => Err(err),
        }
    }
}
