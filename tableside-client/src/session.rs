//! Ordering session
//!
//! One `OrderSession` per patron browsing session. It owns the catalog
//! read model, the current category view and the cart, and drives the two
//! remote calls (menu load, order submission) through a [`MenuApi`].
//!
//! # Submission in flight
//!
//! Submitting is split into [`OrderSession::begin_submission`] and
//! [`OrderSession::finish_submission`]; [`OrderSession::submit`] runs both
//! around the network call. Between the two, cart mutations are queued
//! instead of applied and replayed in issue order once the result is known,
//! so a line added while an order is in flight is neither sent with it nor
//! lost when the cart is cleared.

use crate::catalog::{self, Catalog, CategorySelector};
use crate::{Cart, ClientConfig, ClientError, ClientResult, MenuApi};
use shared::{Decimal, MenuItem, MenuItemId, OrderRequest, TableId};

/// Cart mutation deferred while a submission is in flight
#[derive(Debug, Clone, PartialEq)]
enum PendingMutation {
    Add(MenuItem),
    SetNote(MenuItemId, String),
    Decrement(MenuItemId),
    Remove(MenuItemId),
}

impl PendingMutation {
    /// Cart line the mutation requires, if any
    fn target(&self) -> Option<MenuItemId> {
        match self {
            PendingMutation::Add(_) => None,
            PendingMutation::SetNote(id, _)
            | PendingMutation::Decrement(id)
            | PendingMutation::Remove(id) => Some(*id),
        }
    }

    fn apply_to(self, cart: &mut Cart) -> ClientResult<()> {
        match self {
            PendingMutation::Add(item) => {
                cart.add_item(&item);
                Ok(())
            }
            PendingMutation::SetNote(id, note) => cart.set_note(id, note),
            PendingMutation::Decrement(id) => cart.decrement_item(id).map(|_| ()),
            PendingMutation::Remove(id) => cart.remove_item(id).map(|_| ()),
        }
    }
}

/// Summary of an accepted order
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub table_id: TableId,
    /// Number of distinct lines sent
    pub line_count: usize,
    /// Number of units sent
    pub item_count: u64,
    pub total: Decimal,
}

impl SubmissionReceipt {
    fn from_order(order: &OrderRequest) -> Self {
        Self {
            table_id: order.table_id.clone(),
            line_count: order.items.len(),
            item_count: order.items.iter().map(|i| u64::from(i.quantity)).sum(),
            total: order.total(),
        }
    }
}

/// Patron session state
pub struct OrderSession<A: MenuApi> {
    api: A,
    config: ClientConfig,
    catalog: Catalog,
    selector: CategorySelector,
    visible: Vec<MenuItem>,
    cart: Cart,
    in_flight: Option<OrderRequest>,
    pending: Vec<PendingMutation>,
}

impl<A: MenuApi> OrderSession<A> {
    pub fn new(api: A, config: ClientConfig) -> Self {
        Self {
            api,
            config,
            catalog: Catalog::default(),
            selector: CategorySelector::All,
            visible: Vec::new(),
            cart: Cart::new(),
            in_flight: None,
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ========== Catalog ==========

    /// Fetch the menu and replace the catalog with it
    ///
    /// On success the view is reset to every item. On failure the previous
    /// catalog and view are kept and `CatalogUnavailable` is returned; no
    /// retry is attempted.
    pub async fn load_catalog(&mut self) -> ClientResult<&[MenuItem]> {
        let loaded = self.api.fetch_menu().await.and_then(Catalog::new);
        match loaded {
            Ok(catalog) => {
                tracing::info!(items = catalog.len(), "Menu loaded");
                self.catalog = catalog;
                self.selector = CategorySelector::All;
                self.visible = catalog::filter(&self.catalog, &self.selector);
                Ok(self.visible.as_slice())
            }
            Err(e) => {
                tracing::warn!(error = %e, kept = self.catalog.len(), "Menu load failed");
                Err(match e {
                    ClientError::CatalogUnavailable(_) => e,
                    other => ClientError::CatalogUnavailable(other.to_string()),
                })
            }
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Items currently shown
    pub fn visible(&self) -> &[MenuItem] {
        &self.visible
    }

    pub fn selector(&self) -> &CategorySelector {
        &self.selector
    }

    /// Switch the category view
    ///
    /// A tag the configured layout does not offer empties the view and
    /// returns `UnknownCategory`.
    pub fn select_category(&mut self, selector: &str) -> ClientResult<&[MenuItem]> {
        let parsed = CategorySelector::from_tag(selector);
        let supported = self.config.supports(&parsed);
        self.visible = if supported {
            catalog::filter(&self.catalog, &parsed)
        } else {
            Vec::new()
        };
        self.selector = parsed;

        if !supported {
            tracing::warn!(category = %self.selector, "Unsupported category selected");
            return Err(ClientError::UnknownCategory(self.selector.to_string()));
        }
        Ok(self.visible.as_slice())
    }

    // ========== Cart ==========

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    /// Add one unit of a menu item
    pub fn add_item(&mut self, item: &MenuItem) {
        if self.is_submitting() {
            tracing::debug!(item = item.id, "Submission in flight, queueing add");
            self.pending.push(PendingMutation::Add(item.clone()));
            return;
        }
        self.cart.add_item(item);
        tracing::debug!(item = item.id, total = %self.cart.total(), "Item added");
    }

    /// Add one unit of the catalog item with this id
    pub fn add_item_by_id(&mut self, id: MenuItemId) -> ClientResult<()> {
        let item = self
            .catalog
            .item(id)
            .cloned()
            .ok_or(ClientError::InvalidReference(id))?;
        self.add_item(&item);
        Ok(())
    }

    /// Replace the note of a cart line
    pub fn set_note(&mut self, id: MenuItemId, note: impl Into<String>) -> ClientResult<()> {
        self.mutate(PendingMutation::SetNote(id, note.into()))
    }

    /// Take one unit off a cart line, dropping the line at zero
    pub fn decrement_item(&mut self, id: MenuItemId) -> ClientResult<()> {
        self.mutate(PendingMutation::Decrement(id))
    }

    /// Drop a cart line
    pub fn remove_item(&mut self, id: MenuItemId) -> ClientResult<()> {
        self.mutate(PendingMutation::Remove(id))
    }

    fn mutate(&mut self, mutation: PendingMutation) -> ClientResult<()> {
        if self.is_submitting() {
            // Validate against the cart as it will look after the queue replays
            let mut projected = self.cart.clone();
            for queued in &self.pending {
                let _ = queued.clone().apply_to(&mut projected);
            }
            if let Some(id) = mutation.target()
                && projected.line(id).is_none()
            {
                tracing::warn!(item = id, "Queued mutation targets no cart line");
                return Err(ClientError::InvalidReference(id));
            }
            tracing::debug!(?mutation, "Submission in flight, queueing mutation");
            self.pending.push(mutation);
            return Ok(());
        }
        self.apply(mutation)
    }

    fn apply(&mut self, mutation: PendingMutation) -> ClientResult<()> {
        let result = mutation.apply_to(&mut self.cart);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Cart mutation rejected");
        }
        result
    }

    // ========== Submission ==========

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Freeze the cart into an order and mark the session in flight
    pub fn begin_submission(&mut self, table_id: impl Into<TableId>) -> ClientResult<OrderRequest> {
        if self.is_submitting() {
            return Err(ClientError::SubmissionInFlight);
        }
        if self.cart.is_empty() {
            tracing::info!("Submission refused: cart is empty");
            return Err(ClientError::EmptyCart);
        }
        let order = self.cart.to_order_request(table_id.into());
        tracing::info!(
            table = %order.table_id,
            lines = order.items.len(),
            total = %order.total(),
            "Submitting order"
        );
        self.in_flight = Some(order.clone());
        Ok(order)
    }

    /// Apply the outcome of the in-flight submission
    ///
    /// Accepted: the cart is cleared. Failed: the cart is left exactly as it
    /// was and `SubmissionFailed` is returned. Either way, mutations queued
    /// meanwhile are then replayed in order.
    pub fn finish_submission(
        &mut self,
        outcome: ClientResult<()>,
    ) -> ClientResult<SubmissionReceipt> {
        let order = self.in_flight.take().ok_or(ClientError::NoSubmissionInFlight)?;

        let result = match outcome {
            Ok(()) => {
                self.cart.clear();
                tracing::info!(table = %order.table_id, "Order accepted");
                Ok(SubmissionReceipt::from_order(&order))
            }
            Err(e) => {
                tracing::error!(table = %order.table_id, error = %e, "Order submission failed");
                Err(match e {
                    ClientError::SubmissionFailed(_) => e,
                    other => ClientError::SubmissionFailed(other.to_string()),
                })
            }
        };

        let pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), "Replaying queued cart mutations");
        }
        for mutation in pending {
            // Only lines cleared by an accepted order can be missing here;
            // rejections are logged in apply
            let _ = self.apply(mutation);
        }

        result
    }

    /// Send the cart to order intake for `table_id`
    ///
    /// Fails fast with `EmptyCart` without any network call. No retry is
    /// made: order intake has no idempotency key, so a resend is a new order.
    ///
    /// This borrows the session mutably until the result arrives, so nothing
    /// can change the cart meanwhile. Embedders that must keep accepting cart
    /// changes while the order is in flight call `begin_submission`, send the
    /// returned `OrderRequest` themselves, then call `finish_submission`.
    pub async fn submit(&mut self, table_id: impl Into<TableId>) -> ClientResult<SubmissionReceipt> {
        let order = self.begin_submission(table_id)?;
        let outcome = self.api.submit_order(&order).await;
        self.finish_submission(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorded {
        menu_calls: usize,
        orders: Vec<OrderRequest>,
    }

    /// In-memory stand-in for the menu API
    #[derive(Clone)]
    struct MockApi {
        menu: Option<Vec<MenuItem>>,
        accept_orders: bool,
        recorded: Arc<Mutex<Recorded>>,
    }

    impl MockApi {
        fn new(menu: Option<Vec<MenuItem>>, accept_orders: bool) -> Self {
            Self {
                menu,
                accept_orders,
                recorded: Arc::new(Mutex::new(Recorded::default())),
            }
        }
    }

    #[async_trait]
    impl MenuApi for MockApi {
        async fn fetch_menu(&self) -> ClientResult<Vec<MenuItem>> {
            self.recorded.lock().unwrap().menu_calls += 1;
            self.menu.clone().ok_or_else(|| ClientError::Status {
                status: 503,
                body: "down".into(),
            })
        }

        async fn submit_order(&self, order: &OrderRequest) -> ClientResult<()> {
            self.recorded.lock().unwrap().orders.push(order.clone());
            if self.accept_orders {
                Ok(())
            } else {
                Err(ClientError::Status {
                    status: 500,
                    body: "kitchen offline".into(),
                })
            }
        }
    }

    fn item(id: MenuItemId, name: &str, price: i64, category: &str) -> MenuItem {
        MenuItem {
            id,
            name: name.to_string(),
            description: String::new(),
            price: Decimal::from(price),
            category: category.to_string(),
            image_url: String::new(),
        }
    }

    fn menu() -> Vec<MenuItem> {
        vec![item(1, "Pho", 50000, "food"), item(2, "Coke", 15000, "drink")]
    }

    async fn session_with_cart(accept: bool) -> (OrderSession<MockApi>, MockApi) {
        let api = MockApi::new(Some(menu()), accept);
        let mut session = OrderSession::new(api.clone(), ClientConfig::default());
        session.load_catalog().await.unwrap();
        session.add_item_by_id(1).unwrap();
        session.add_item_by_id(1).unwrap();
        session.add_item_by_id(2).unwrap();
        (session, api)
    }

    #[tokio::test]
    async fn test_load_catalog_populates_view() {
        let api = MockApi::new(Some(menu()), true);
        let mut session = OrderSession::new(api.clone(), ClientConfig::default());
        assert!(session.catalog().is_empty());

        let visible = session.load_catalog().await.unwrap();
        assert_eq!(visible.len(), 2);
        assert_eq!(session.catalog().len(), 2);
        assert_eq!(session.selector(), &CategorySelector::All);
        assert_eq!(api.recorded.lock().unwrap().menu_calls, 1);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_catalog() {
        let ok = MockApi::new(Some(menu()), true);
        let mut session = OrderSession::new(ok, ClientConfig::default());
        session.load_catalog().await.unwrap();
        session.select_category("drink").unwrap();

        let mut failing = OrderSession::new(MockApi::new(None, true), ClientConfig::default());
        let err = failing.load_catalog().await.unwrap_err();
        assert!(matches!(err, ClientError::CatalogUnavailable(_)));
        assert!(failing.catalog().is_empty());
        assert!(failing.visible().is_empty());

        // Swap in a failing transport on a populated session
        let mut session = OrderSession {
            api: MockApi::new(None, true),
            ..session
        };
        let err = session.load_catalog().await.unwrap_err();
        assert!(matches!(err, ClientError::CatalogUnavailable(_)));
        assert_eq!(session.catalog().len(), 2);
        assert_eq!(session.visible().len(), 1);
        assert_eq!(session.selector(), &CategorySelector::Category("drink".into()));
    }

    #[tokio::test]
    async fn test_load_rejects_unusable_menu() {
        let bad = vec![item(1, "Pho", 50000, "food"), item(1, "Pho again", 1, "food")];
        let mut session = OrderSession::new(MockApi::new(Some(bad), true), ClientConfig::default());
        let err = session.load_catalog().await.unwrap_err();
        assert!(matches!(err, ClientError::CatalogUnavailable(_)));
        assert!(session.catalog().is_empty());
    }

    #[tokio::test]
    async fn test_reload_resets_view_to_all() {
        let mut session = OrderSession::new(MockApi::new(Some(menu()), true), ClientConfig::default());
        session.load_catalog().await.unwrap();
        session.select_category("food").unwrap();
        assert_eq!(session.visible().len(), 1);

        session.load_catalog().await.unwrap();
        assert_eq!(session.selector(), &CategorySelector::All);
        assert_eq!(session.visible().len(), 2);
    }

    #[tokio::test]
    async fn test_select_category() {
        let mut session = OrderSession::new(MockApi::new(Some(menu()), true), ClientConfig::default());
        session.load_catalog().await.unwrap();

        let drinks = session.select_category("drink").unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].name, "Coke");

        // Supported but unused tag: empty, not an error
        assert!(session.select_category("combo").unwrap().is_empty());

        let all = session.select_category("all").unwrap().to_vec();
        assert_eq!(all, session.catalog().items());
    }

    #[tokio::test]
    async fn test_unknown_category_empties_view() {
        let mut session = OrderSession::new(MockApi::new(Some(menu()), true), ClientConfig::default());
        session.load_catalog().await.unwrap();

        let err = session.select_category("dessert").unwrap_err();
        assert!(matches!(err, ClientError::UnknownCategory(ref c) if c == "dessert"));
        assert!(session.visible().is_empty());
        assert_eq!(session.catalog().len(), 2);
    }

    #[tokio::test]
    async fn test_add_unknown_id_is_invalid_reference() {
        let (mut session, _api) = session_with_cart(true).await;
        let before = session.cart().clone();
        assert!(matches!(
            session.add_item_by_id(42),
            Err(ClientError::InvalidReference(42))
        ));
        assert_eq!(session.cart(), &before);
    }

    #[tokio::test]
    async fn test_note_scenario() {
        let (mut session, _api) = session_with_cart(true).await;
        session.set_note(1, "no onions").unwrap();
        assert_eq!(session.cart().line(1).unwrap().note, "no onions");
        assert_eq!(session.cart().line(2).unwrap().note, "");
        assert_eq!(session.total(), Decimal::from(115000));

        assert!(matches!(
            session.set_note(9, "x"),
            Err(ClientError::InvalidReference(9))
        ));
        assert_eq!(session.cart().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_empty_cart_makes_no_call() {
        let api = MockApi::new(Some(menu()), true);
        let mut session = OrderSession::new(api.clone(), ClientConfig::default());
        let err = session.submit(7i64).await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyCart));
        assert!(api.recorded.lock().unwrap().orders.is_empty());
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_submit_success_clears_cart() {
        let (mut session, api) = session_with_cart(true).await;
        session.set_note(1, "no onions").unwrap();

        let receipt = session.submit(7i64).await.unwrap();
        assert_eq!(receipt.table_id, TableId::Number(7));
        assert_eq!(receipt.line_count, 2);
        assert_eq!(receipt.item_count, 3);
        assert_eq!(receipt.total, Decimal::from(115000));

        assert!(session.cart().is_empty());
        assert_eq!(session.total(), Decimal::ZERO);
        assert!(!session.is_submitting());

        let recorded = api.recorded.lock().unwrap();
        assert_eq!(recorded.orders.len(), 1);
        let sent = &recorded.orders[0];
        assert_eq!(sent.items[0].menu_item_id, 1);
        assert_eq!(sent.items[0].quantity, 2);
        assert_eq!(sent.items[0].note, "no onions");
        assert_eq!(sent.items[1].menu_item_id, 2);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_cart() {
        let (mut session, api) = session_with_cart(false).await;
        let before = session.cart().clone();

        let err = session.submit(7i64).await.unwrap_err();
        assert!(matches!(err, ClientError::SubmissionFailed(_)));
        assert_eq!(session.cart(), &before);
        assert_eq!(session.total(), Decimal::from(115000));
        assert!(!session.is_submitting());
        assert_eq!(api.recorded.lock().unwrap().orders.len(), 1);
    }

    #[tokio::test]
    async fn test_second_begin_is_rejected() {
        let (mut session, _api) = session_with_cart(true).await;
        session.begin_submission(7i64).unwrap();
        assert!(matches!(
            session.begin_submission(7i64),
            Err(ClientError::SubmissionInFlight)
        ));
    }

    #[tokio::test]
    async fn test_finish_without_begin() {
        let (mut session, _api) = session_with_cart(true).await;
        assert!(matches!(
            session.finish_submission(Ok(())),
            Err(ClientError::NoSubmissionInFlight)
        ));
        assert_eq!(session.cart().len(), 2);
    }

    #[tokio::test]
    async fn test_mutations_during_flight_apply_after_success() {
        let (mut session, _api) = session_with_cart(true).await;
        let order = session.begin_submission("T7").unwrap();
        assert_eq!(order.items.len(), 2);

        session.add_item_by_id(2).unwrap();
        session.add_item_by_id(2).unwrap();
        session.set_note(2, "no ice").unwrap();
        // Not applied yet
        assert_eq!(session.cart().line(2).unwrap().quantity, 1);
        assert_eq!(session.total(), Decimal::from(115000));

        session.finish_submission(Ok(())).unwrap();
        let lines = session.cart().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].menu_item_id, 2);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].note, "no ice");
        assert_eq!(session.total(), Decimal::from(30000));
    }

    #[tokio::test]
    async fn test_mutations_during_flight_apply_after_failure() {
        let (mut session, _api) = session_with_cart(false).await;
        session.begin_submission(7i64).unwrap();

        session.decrement_item(1).unwrap();
        session.add_item_by_id(2).unwrap();

        let err = session
            .finish_submission(Err(ClientError::Status {
                status: 502,
                body: String::new(),
            }))
            .unwrap_err();
        assert!(matches!(err, ClientError::SubmissionFailed(_)));

        assert_eq!(session.cart().line(1).unwrap().quantity, 1);
        assert_eq!(session.cart().line(2).unwrap().quantity, 2);
        assert_eq!(session.total(), Decimal::from(80000));
    }

    #[tokio::test]
    async fn test_in_flight_mutation_on_unknown_line_is_invalid_reference() {
        let (mut session, _api) = session_with_cart(true).await;
        session.begin_submission(7i64).unwrap();

        assert!(matches!(
            session.set_note(99, "ghost"),
            Err(ClientError::InvalidReference(99))
        ));
        assert!(matches!(
            session.decrement_item(99),
            Err(ClientError::InvalidReference(99))
        ));
        assert!(matches!(
            session.remove_item(99),
            Err(ClientError::InvalidReference(99))
        ));
        assert!(session.pending.is_empty());

        session.finish_submission(Ok(())).unwrap();
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_in_flight_mutation_sees_queued_changes() {
        let (mut session, _api) = session_with_cart(false).await;
        session.begin_submission(7i64).unwrap();

        // Line 2 is removed by an earlier queued call
        session.remove_item(2).unwrap();
        assert!(matches!(
            session.set_note(2, "no ice"),
            Err(ClientError::InvalidReference(2))
        ));

        // ...and brought back by a queued add
        session.add_item_by_id(2).unwrap();
        session.set_note(2, "no ice").unwrap();

        session
            .finish_submission(Err(ClientError::SubmissionFailed("timeout".into())))
            .unwrap_err();
        let line = session.cart().line(2).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.note, "no ice");
    }

    #[tokio::test]
    async fn test_queued_mutation_on_cleared_line_is_dropped() {
        let (mut session, _api) = session_with_cart(true).await;
        session.begin_submission(7i64).unwrap();
        session.set_note(1, "no onions").unwrap();
        session.remove_item(2).unwrap();

        session.finish_submission(Ok(())).unwrap();
        assert!(session.cart().is_empty());
    }
}
