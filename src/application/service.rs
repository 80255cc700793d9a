use crate::application::state::{Action, OrderBook, Transition, UpdateOutcome, UpdatePhase};
use crate::domain::actions::{RowAction, available_actions, is_bulk_status};
use crate::domain::grouping::{VendorGroup, group_by_vendor};
use crate::domain::order::{Order, StatusUpdate};
use crate::domain::ports::{OrderGatewayBox, OrderScope};
use crate::domain::query::OrderQuery;
use crate::domain::stats::OrderStats;
use crate::domain::status::{ItemStatus, OrderStatus};
use crate::error::{DashboardError, Result};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// An order as rendered in the table: the order, its derived status and the
/// actions it offers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    pub order: Order,
    pub status: OrderStatus,
    pub actions: Vec<RowAction>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            order: order.clone(),
            status: order.overall_status(),
            actions: available_actions(order),
        }
    }
}

/// Per-order results of a bulk update.
#[derive(Debug, Default)]
pub struct BulkReport {
    pub outcomes: Vec<UpdateOutcome>,
    /// Orders whose update could not be submitted, with the reason.
    pub failures: Vec<(String, DashboardError)>,
}

/// One dashboard session.
///
/// `DashboardService` owns the gateway to the order backend and the
/// session's [`OrderBook`]. Every change to the book goes through
/// [`OrderBook::dispatch`]; network calls never hold the book lock.
pub struct DashboardService {
    gateway: OrderGatewayBox,
    scope: OrderScope,
    book: RwLock<OrderBook>,
    fetches: AtomicU64,
    tickets: AtomicU64,
    closed: AtomicBool,
}

impl DashboardService {
    /// Creates a session working on `scope`. The book starts empty; call
    /// [`refresh`](Self::refresh) to load orders.
    pub fn new(gateway: OrderGatewayBox, scope: OrderScope) -> Self {
        Self {
            gateway,
            scope,
            book: RwLock::new(OrderBook::new()),
            fetches: AtomicU64::new(0),
            tickets: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    pub fn scope(&self) -> &OrderScope {
        &self.scope
    }

    /// Fetches the orders in scope and replaces the book's collection.
    ///
    /// On failure the book is left untouched. A response that arrives after a
    /// newer fetch has been applied is dropped.
    pub async fn refresh(&self) -> Result<usize> {
        self.ensure_open()?;
        let fetch = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;

        let orders = match self.gateway.list_orders(&self.scope).await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::warn!(error = %e, scope = %self.scope, "failed to fetch orders");
                return Err(e);
            }
        };
        self.ensure_open()?;

        let count = orders.len();
        let transition = self
            .book
            .write()
            .await
            .dispatch(Action::Loaded { fetch, orders });
        if transition == Transition::Ignored {
            tracing::debug!(fetch, "dropped stale order fetch");
        } else {
            tracing::info!(fetch, count, scope = %self.scope, "orders loaded");
        }
        Ok(count)
    }

    /// Moves the session vendor's items in `order_id` to `status`.
    pub async fn update_status(&self, order_id: &str, status: ItemStatus) -> Result<UpdateOutcome> {
        let vendor = self
            .scope
            .vendor()
            .cloned()
            .ok_or(DashboardError::MissingVendorScope)?;
        self.submit(StatusUpdate::for_order(order_id, status).by_vendor(vendor))
            .await
    }

    /// Moves a single item of `order_id` to `status`.
    pub async fn update_item_status(
        &self,
        order_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> Result<UpdateOutcome> {
        let vendor = self
            .scope
            .vendor()
            .cloned()
            .ok_or(DashboardError::MissingVendorScope)?;
        self.submit(
            StatusUpdate::for_order(order_id, status)
                .by_vendor(vendor)
                .on_item(item_id),
        )
        .await
    }

    /// Runs a row action, refusing actions the order does not currently offer.
    pub async fn perform(&self, order_id: &str, action: RowAction) -> Result<UpdateOutcome> {
        let offered = {
            let book = self.book.read().await;
            let order = book
                .order(order_id)
                .ok_or_else(|| DashboardError::UnknownOrder(order_id.to_string()))?;
            available_actions(order)
        };
        if !offered.contains(&action) {
            return Err(DashboardError::ActionNotAvailable {
                order_id: order_id.to_string(),
                action: action.to_string(),
            });
        }
        self.update_status(order_id, action.target_status()).await
    }

    /// Applies `status` to every selected order, clears the selection and
    /// refetches. An order that cannot be submitted is recorded in the report
    /// and does not stop the others. A failed refetch is logged.
    pub async fn bulk_update(&self, status: ItemStatus) -> Result<BulkReport> {
        if !is_bulk_status(&status) {
            return Err(DashboardError::InvalidBulkStatus(status.to_string()));
        }
        if self.scope.vendor().is_none() {
            return Err(DashboardError::MissingVendorScope);
        }

        let selected: Vec<String> = {
            let mut book = self.book.write().await;
            let selected = book.selection().iter().cloned().collect();
            book.dispatch(Action::ClearSelection);
            selected
        };

        let mut report = BulkReport::default();
        for order_id in selected {
            match self.update_status(&order_id, status.clone()).await {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(e) => {
                    tracing::warn!(order_id = %order_id, error = %e, "bulk update skipped order");
                    report.failures.push((order_id, e));
                }
            }
        }

        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "refresh after bulk update failed");
        }
        Ok(report)
    }

    async fn submit(&self, update: StatusUpdate) -> Result<UpdateOutcome> {
        self.ensure_open()?;
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut book = self.book.write().await;
            if book.order(&update.order_id).is_none() {
                return Err(DashboardError::UnknownOrder(update.order_id));
            }
            book.dispatch(Action::UpdateRequested {
                ticket,
                update: update.clone(),
            });
        }

        let result = self.gateway.update_status(&update).await;
        if self.closed.load(Ordering::SeqCst) {
            tracing::debug!(ticket, "session closed, dropping update response");
            self.book.write().await.dispatch(Action::UpdateFailed {
                ticket,
                reason: DashboardError::SessionClosed.to_string(),
            });
            return Err(DashboardError::SessionClosed);
        }

        let action = match result {
            Ok(()) => {
                tracing::info!(
                    ticket,
                    order_id = %update.order_id,
                    status = %update.status,
                    "order status updated"
                );
                Action::UpdateSucceeded { ticket }
            }
            Err(e) => {
                tracing::warn!(
                    ticket,
                    order_id = %update.order_id,
                    error = %e,
                    "order status update failed, rolling back"
                );
                Action::UpdateFailed {
                    ticket,
                    reason: e.to_string(),
                }
            }
        };

        match self.book.write().await.dispatch(action) {
            Transition::Settled(outcome) => Ok(outcome),
            _ => Ok(UpdateOutcome {
                ticket,
                update,
                phase: UpdatePhase::Pending,
            }),
        }
    }

    /// Orders matching `query`, in the order the backend returned them.
    pub async fn orders(&self, query: &OrderQuery) -> Vec<OrderView> {
        let book = self.book.read().await;
        book.orders()
            .iter()
            .filter(|order| query.matches(order))
            .map(OrderView::from)
            .collect()
    }

    pub async fn order(&self, order_id: &str) -> Option<OrderView> {
        let book = self.book.read().await;
        book.order(order_id).map(OrderView::from)
    }

    /// Runs `f` against one order without cloning it.
    pub async fn with_order<R>(&self, order_id: &str, f: impl FnOnce(&Order) -> R) -> Result<R> {
        let book = self.book.read().await;
        book.order(order_id)
            .map(f)
            .ok_or_else(|| DashboardError::UnknownOrder(order_id.to_string()))
    }

    /// Runs `f` against the vendor groups of one order.
    pub async fn vendor_groups<R>(
        &self,
        order_id: &str,
        f: impl FnOnce(&[VendorGroup<'_>]) -> R,
    ) -> Result<R> {
        self.with_order(order_id, |order| f(&group_by_vendor(&order.items)))
            .await
    }

    pub async fn stats(&self) -> OrderStats {
        let book = self.book.read().await;
        OrderStats::from_orders(book.orders())
    }

    pub async fn toggle_selection(&self, order_id: &str) {
        self.book
            .write()
            .await
            .dispatch(Action::Toggle(order_id.to_string()));
    }

    /// Selects every order matching `query`, or clears the selection when
    /// exactly those orders are already selected.
    pub async fn select_all(&self, query: &OrderQuery) {
        let mut book = self.book.write().await;
        let ids = book
            .orders()
            .iter()
            .filter(|order| query.matches(order))
            .map(|order| order.order_id.clone())
            .collect();
        book.dispatch(Action::SelectAll(ids));
    }

    pub async fn selection(&self) -> Vec<String> {
        self.book.read().await.selection().iter().cloned().collect()
    }

    /// Returns the last failure message once, then forgets it.
    pub async fn take_error(&self) -> Option<String> {
        let mut book = self.book.write().await;
        let error = book.last_error().map(str::to_string);
        book.dispatch(Action::DismissError);
        error
    }

    /// Tears the session down. Responses still in flight are not applied.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Consumes the service and returns the final state of the book.
    pub fn into_book(self) -> OrderBook {
        self.book.into_inner()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(DashboardError::SessionClosed)
        } else {
            Ok(())
        }
    }
}
