//! # Checkout Orchestrator
//!
//! The register: multi-ticket workflow plus the checkout sequence.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        complete_sale()                                  │
//! │                                                                         │
//! │  1. Acquire the in-flight guard (second submit → CheckoutInProgress)   │
//! │  2. Snapshot the active ticket (empty → EmptyTicket, nothing touched)  │
//! │  3. Price the ticket: subtotal − discount, clamped at S/ 0.00          │
//! │  4. Award points: one per whole sol of the final total                 │
//! │  5. Submit the SaleRequest to the Sales collaborator                   │
//! │       │                                                                 │
//! │       ├── Err ──► propagate; ticket stays open and unchanged           │
//! │       ▼                                                                 │
//! │  6. Accumulate client points (best effort; failure only logs)          │
//! │  7. Close the ticket (the book guarantees another one is active)       │
//! │  8. Return the receipt                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Double-Submit Protection
//! A cashier double-tapping "cobrar" must never produce two sales. The
//! register holds an atomic in-flight flag: the first submit wins, any
//! overlapping submit fails fast with [`RegisterError::CheckoutInProgress`].
//! The flag resets when the first checkout finishes, success or failure.
//!
//! While the flag is up, ticket mutation is rejected with the same
//! error. Checkout works on a snapshot taken at submit time, so an edit
//! accepted during the in-flight window would vanish when the ticket
//! closes; rejecting the edit keeps what was sold and what was rung up
//! identical.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use licoreria_core::{
    points, validation, CoreError, Money, PaymentMethod, Product, PurchaseType, Sale, SaleRequest,
    SaleRequestItem, SplitPayment, Ticket, TicketTotals,
};

use crate::error::{RegisterError, RegisterResult};
use crate::service::{ClientDirectory, SalesService};
use crate::state::TicketState;

// =============================================================================
// Checkout DTOs
// =============================================================================

/// Tender details supplied by the cashier at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Primary payment method.
    pub payment_method: PaymentMethod,

    /// Cashier ringing up the sale.
    pub cashier: String,

    /// Cash handed over, in céntimos. None means exact tender.
    pub amount_received_cents: Option<i64>,

    /// Split-tender breakdown, if the client pays with more than one
    /// method.
    pub split_payments: Option<Vec<SplitPayment>>,
}

/// What the cashier gets back after a successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// The persisted sale.
    pub sale: Sale,

    /// Points awarded to the client: one per whole sol of the total.
    pub points_earned: i64,

    /// The per-line loyalty badge shown on the ticket (points_per_unit ×
    /// quantity, summed). Reported separately from `points_earned`; the
    /// two formulas are independent and not reconciled.
    pub item_points: i64,

    /// Change due back, in céntimos.
    pub change_cents: i64,
}

// =============================================================================
// In-Flight Guard
// =============================================================================

/// RAII reset for the checkout in-flight flag.
///
/// Held across the await points of `complete_sale`; dropping it (on any
/// exit path, including early `?` returns) re-arms the register.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> RegisterResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RegisterError::CheckoutInProgress)?;
        Ok(InFlightGuard { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// =============================================================================
// Register
// =============================================================================

/// One physical register: its open tickets and its checkout pipeline.
///
/// Generic over the two collaborators so tests can substitute recording
/// fakes; production wires in the SQLite adapters.
pub struct Register<S, C> {
    state: TicketState,
    sales: S,
    clients: C,
    checkout_in_flight: AtomicBool,
}

impl<S, C> Register<S, C>
where
    S: SalesService,
    C: ClientDirectory,
{
    /// Creates a register with a fresh ticket book.
    pub fn new(sales: S, clients: C) -> Self {
        Register {
            state: TicketState::new(),
            sales,
            clients,
            checkout_in_flight: AtomicBool::new(false),
        }
    }

    // -------------------------------------------------------------------------
    // Ticket workflow
    // -------------------------------------------------------------------------

    /// Opens a new empty ticket and makes it active. Returns its id.
    pub fn create_ticket(&self) -> u64 {
        self.state.with_book_mut(|book| book.create_ticket())
    }

    /// Switches the active ticket. Unknown ids leave the state unchanged.
    pub fn switch_ticket(&self, id: u64) -> RegisterResult<()> {
        self.state
            .with_book_mut(|book| book.switch_ticket(id))
            .map_err(RegisterError::from)
    }

    /// Abandons a ticket without selling it.
    pub fn close_ticket(&self, id: u64) -> RegisterResult<()> {
        self.ensure_no_checkout_in_flight()?;
        self.state
            .with_book_mut(|book| book.close_ticket(id))
            .map_err(RegisterError::from)
    }

    /// Snapshot of the active ticket for display.
    pub fn active_ticket(&self) -> Ticket {
        self.state.with_book(|book| book.active().clone())
    }

    /// Id of the active ticket.
    pub fn active_ticket_id(&self) -> u64 {
        self.state.with_book(|book| book.active_id())
    }

    /// Snapshots of every open ticket, for the ticket-tab strip.
    pub fn open_tickets(&self) -> Vec<Ticket> {
        self.state.with_book(|book| book.tickets().to_vec())
    }

    /// Total of one ticket (None = active; unknown ids read as S/ 0.00).
    pub fn ticket_total(&self, id: Option<u64>) -> Money {
        self.state.with_book(|book| book.ticket_total(id))
    }

    /// Derived totals of the active ticket.
    pub fn active_totals(&self) -> TicketTotals {
        self.state.with_book(|book| TicketTotals::from(book.active()))
    }

    // -------------------------------------------------------------------------
    // Item mutation (always on the active ticket)
    // -------------------------------------------------------------------------

    /// Rejects ticket mutation while a checkout snapshot is in flight.
    fn ensure_no_checkout_in_flight(&self) -> RegisterResult<()> {
        if self.checkout_in_flight.load(Ordering::Acquire) {
            return Err(RegisterError::CheckoutInProgress);
        }
        Ok(())
    }

    /// Adds a product to the active ticket, freezing its price at the
    /// chosen tier. Returns the line id.
    pub fn add_item(&self, product: &Product, wholesale: bool) -> RegisterResult<u64> {
        self.ensure_no_checkout_in_flight()?;
        self.state
            .with_book_mut(|book| book.active_mut().add_item(product, wholesale))
            .map_err(RegisterError::from)
    }

    /// Adjusts a line's quantity by a signed delta (clamped at 1).
    pub fn adjust_quantity(&self, line_id: u64, delta: i64) -> RegisterResult<()> {
        self.ensure_no_checkout_in_flight()?;
        self.state
            .with_book_mut(|book| book.active_mut().adjust_quantity(line_id, delta))
            .map_err(RegisterError::from)
    }

    /// Removes a line from the active ticket.
    pub fn remove_item(&self, line_id: u64) -> RegisterResult<()> {
        self.ensure_no_checkout_in_flight()?;
        self.state
            .with_book_mut(|book| book.active_mut().remove_item(line_id))
            .map_err(RegisterError::from)
    }

    /// Attaches or detaches the loyalty client on the active ticket.
    pub fn set_client(
        &self,
        client_id: Option<i64>,
        client_name: Option<String>,
    ) -> RegisterResult<()> {
        self.ensure_no_checkout_in_flight()?;
        self.state
            .with_book_mut(|book| book.active_mut().set_client(client_id, client_name));
        Ok(())
    }

    /// Sets the free-text notes on the active ticket (trimmed, bounded).
    pub fn set_notes(&self, notes: impl Into<String>) -> RegisterResult<()> {
        self.ensure_no_checkout_in_flight()?;
        let notes = notes.into();
        self.state
            .with_book_mut(|book| book.active_mut().set_notes(notes))
            .map_err(RegisterError::from)
    }

    /// Applies a ticket-level discount (negative input clamps to zero).
    pub fn apply_discount(&self, discount: Money) -> RegisterResult<()> {
        self.ensure_no_checkout_in_flight()?;
        self.state
            .with_book_mut(|book| book.active_mut().apply_discount(discount));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Finalizes the active ticket as a sale.
    ///
    /// On success the ticket is closed and the receipt returned. On any
    /// failure the ticket is left open and unchanged, so the cashier can
    /// retry or fix it.
    pub async fn complete_sale(&self, request: CheckoutRequest) -> RegisterResult<Receipt> {
        if let Some(cents) = request.amount_received_cents {
            validation::validate_amount_received(cents).map_err(CoreError::from)?;
        }

        let _guard = InFlightGuard::acquire(&self.checkout_in_flight)?;

        let ticket = self.active_ticket();
        if ticket.is_empty() {
            return Err(RegisterError::EmptyTicket);
        }

        let total = ticket.total();
        let points_earned = points::points_for_total(total);
        let item_points = points::item_points(ticket.items());

        let received = request
            .amount_received_cents
            .map(Money::from_cents)
            .unwrap_or(total);
        let change = received.saturating_discount(total);

        let sale_request = SaleRequest {
            client_id: ticket.client_id,
            items: ticket
                .items()
                .iter()
                .map(|line| SaleRequestItem {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            discount_cents: ticket.discount().cents(),
            payment_method: request.payment_method,
            comment: ticket.notes.clone().unwrap_or_default(),
            purchase_type: PurchaseType::Local,
            cashier: request.cashier.clone(),
            amount_received_cents: received.cents(),
            points_used: 0,
            split_payments: request.split_payments.clone(),
        };

        info!(
            ticket_id = ticket.id,
            total_cents = total.cents(),
            points_earned,
            "Submitting sale"
        );

        let sale = self
            .sales
            .create(&sale_request)
            .await
            .map_err(RegisterError::SaleFailed)?;

        // Loyalty accumulation is best effort: the sale is already
        // persisted, so a directory failure must not fail the checkout.
        if let Some(client_id) = ticket.client_id {
            if let Err(e) = self.accumulate_points(client_id, points_earned).await {
                warn!(client_id, error = %e, "Failed to accumulate loyalty points");
            }
        }

        self.state.with_book_mut(|book| book.close_ticket(ticket.id))?;

        info!(sale_id = %sale.id, "Checkout complete");

        Ok(Receipt {
            sale,
            points_earned,
            item_points,
            change_cents: change.cents(),
        })
    }

    async fn accumulate_points(
        &self,
        client_id: i64,
        earned: i64,
    ) -> Result<(), crate::service::ServiceError> {
        if earned <= 0 {
            return Ok(());
        }
        let client = self.clients.get_by_id(client_id).await?;
        self.clients
            .set_accumulated_points(client_id, client.accumulated_points + earned)
            .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{ClientDirectory, SalesService, ServiceError};
    use async_trait::async_trait;
    use chrono::Utc;
    use licoreria_core::Client;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::sync::oneshot;

    // -------------------------------------------------------------------------
    // Recording fakes
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct MockSales {
        requests: Mutex<Vec<SaleRequest>>,
        fail: bool,
        // When set, create() parks until the sender fires. Lets tests
        // hold a checkout in flight deterministically.
        gate: Mutex<Option<oneshot::Receiver<()>>>,
    }

    impl MockSales {
        fn failing() -> Self {
            MockSales {
                fail: true,
                ..Default::default()
            }
        }

        fn gated() -> (Self, oneshot::Sender<()>) {
            let (tx, rx) = oneshot::channel();
            let mock = MockSales {
                gate: Mutex::new(Some(rx)),
                ..Default::default()
            };
            (mock, tx)
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SalesService for MockSales {
        async fn create(&self, request: &SaleRequest) -> Result<Sale, ServiceError> {
            let gate = self.gate.lock().unwrap().take();
            if let Some(rx) = gate {
                let _ = rx.await;
            }

            if self.fail {
                return Err(ServiceError::Storage("disk full".to_string()));
            }

            self.requests.lock().unwrap().push(request.clone());

            let total = request.amount_received_cents;
            Ok(Sale {
                id: "sale-1".to_string(),
                client_id: request.client_id,
                subtotal_cents: total + request.discount_cents,
                discount_cents: request.discount_cents,
                total_cents: total,
                points_earned: total / 100,
                payment_method: request.payment_method,
                purchase_type: request.purchase_type,
                comment: None,
                cashier: request.cashier.clone(),
                amount_received_cents: request.amount_received_cents,
                change_cents: 0,
                created_at: Utc::now(),
            })
        }
    }

    #[derive(Default)]
    struct MockClients {
        balances: Mutex<HashMap<i64, i64>>,
        set_calls: Mutex<Vec<(i64, i64)>>,
        get_calls: Mutex<Vec<i64>>,
        fail_set: bool,
    }

    impl MockClients {
        fn with_client(id: i64, points: i64) -> Self {
            let mock = MockClients::default();
            mock.balances.lock().unwrap().insert(id, points);
            mock
        }
    }

    #[async_trait]
    impl ClientDirectory for MockClients {
        async fn get_by_id(&self, id: i64) -> Result<Client, ServiceError> {
            self.get_calls.lock().unwrap().push(id);
            let points = self
                .balances
                .lock()
                .unwrap()
                .get(&id)
                .copied()
                .ok_or(ServiceError::NotFound {
                    entity: "client",
                    id: id.to_string(),
                })?;
            Ok(Client {
                id,
                name: "María Quispe".to_string(),
                phone: None,
                accumulated_points: points,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        }

        async fn set_accumulated_points(&self, id: i64, points: i64) -> Result<(), ServiceError> {
            if self.fail_set {
                return Err(ServiceError::Storage("loyalty backend down".to_string()));
            }
            self.set_calls.lock().unwrap().push((id, points));
            self.balances.lock().unwrap().insert(id, points);
            Ok(())
        }
    }

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------

    fn product(id: &str, description: &str, retail_cents: i64, points: i64) -> Product {
        Product {
            id: id.to_string(),
            barcode: None,
            description: description.to_string(),
            retail_price_cents: retail_cents,
            wholesale_price_cents: retail_cents - 50,
            points_per_unit: points,
            stock: 10,
            category: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn cash_request(received_cents: i64) -> CheckoutRequest {
        CheckoutRequest {
            payment_method: PaymentMethod::Cash,
            cashier: "Rosa".to_string(),
            amount_received_cents: Some(received_cents),
            split_payments: None,
        }
    }

    fn exact_request(method: PaymentMethod) -> CheckoutRequest {
        CheckoutRequest {
            payment_method: method,
            cashier: "Rosa".to_string(),
            amount_received_cents: None,
            split_payments: None,
        }
    }

    // -------------------------------------------------------------------------
    // Checkout behavior
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_empty_ticket_checkout_fails_without_side_effects() {
        let register = Register::new(MockSales::default(), MockClients::default());
        let ticket_id = register.active_ticket_id();

        let result = register.complete_sale(exact_request(PaymentMethod::Cash)).await;

        assert!(matches!(result, Err(RegisterError::EmptyTicket)));
        assert_eq!(register.sales.request_count(), 0);
        assert_eq!(register.active_ticket_id(), ticket_id);
    }

    #[tokio::test]
    async fn test_successful_checkout_closes_ticket_and_reports_points() {
        let register = Register::new(MockSales::default(), MockClients::default());

        // 2 × S/ 7.50 + 1 × S/ 32.00 = S/ 47.00
        let beer = product("p1", "Cerveza Cusqueña 620ml", 750, 1);
        let rum = product("p2", "Ron Cartavio 1L", 3200, 3);
        let line = register.add_item(&beer, false).unwrap();
        register.adjust_quantity(line, 1).unwrap();
        register.add_item(&rum, false).unwrap();
        register.set_notes("sin bolsa").unwrap();

        let ticket_id = register.active_ticket_id();
        let receipt = register.complete_sale(cash_request(5000)).await.unwrap();

        // One point per whole sol of the S/ 47.00 total.
        assert_eq!(receipt.points_earned, 47);
        // Badge formula: 2×1 + 1×3.
        assert_eq!(receipt.item_points, 5);
        assert_eq!(receipt.change_cents, 300);

        // The ticket is gone and a fresh one is active.
        assert_ne!(register.active_ticket_id(), ticket_id);
        assert!(register.active_ticket().is_empty());

        let requests = register.sales.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].items.len(), 2);
        assert_eq!(requests[0].comment, "sin bolsa");
        assert_eq!(requests[0].purchase_type, PurchaseType::Local);
        assert_eq!(requests[0].points_used, 0);
    }

    #[tokio::test]
    async fn test_failed_sale_leaves_ticket_open_and_unchanged() {
        let register = Register::new(MockSales::failing(), MockClients::default());

        let beer = product("p1", "Cerveza Pilsen 630ml", 700, 1);
        register.add_item(&beer, false).unwrap();
        let ticket_id = register.active_ticket_id();

        let result = register.complete_sale(cash_request(1000)).await;

        assert!(matches!(result, Err(RegisterError::SaleFailed(_))));
        assert_eq!(register.active_ticket_id(), ticket_id);
        assert_eq!(register.active_ticket().item_count(), 1);
        assert_eq!(register.active_ticket().total().cents(), 700);
    }

    #[tokio::test]
    async fn test_client_points_accumulate_on_top_of_balance() {
        let register = Register::new(MockSales::default(), MockClients::with_client(7, 10));

        // S/ 25.50 total → 25 points earned.
        let wine = product("p1", "Vino Tacama 750ml", 2550, 2);
        register.add_item(&wine, false).unwrap();
        register.set_client(Some(7), Some("María Quispe".to_string())).unwrap();

        let receipt = register.complete_sale(cash_request(2550)).await.unwrap();

        assert_eq!(receipt.points_earned, 25);
        let set_calls = register.clients.set_calls.lock().unwrap();
        assert_eq!(set_calls.as_slice(), &[(7, 35)]);
    }

    #[tokio::test]
    async fn test_points_failure_does_not_fail_checkout() {
        let clients = MockClients {
            fail_set: true,
            ..MockClients::with_client(7, 0)
        };
        let register = Register::new(MockSales::default(), clients);

        let pisco = product("p1", "Pisco Quebranta 750ml", 4500, 5);
        register.add_item(&pisco, false).unwrap();
        register.set_client(Some(7), None).unwrap();

        let receipt = register.complete_sale(cash_request(4500)).await.unwrap();

        assert_eq!(receipt.points_earned, 45);
        assert!(register.active_ticket().is_empty());
    }

    #[tokio::test]
    async fn test_walk_in_sale_never_touches_the_directory() {
        let register = Register::new(MockSales::default(), MockClients::default());

        let beer = product("p1", "Cerveza Cristal 650ml", 680, 1);
        register.add_item(&beer, false).unwrap();

        register.complete_sale(exact_request(PaymentMethod::Yape)).await.unwrap();

        assert!(register.clients.get_calls.lock().unwrap().is_empty());
        assert!(register.clients.set_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sub_sol_total_awards_no_points_and_skips_directory() {
        let register = Register::new(MockSales::default(), MockClients::with_client(7, 10));

        let water = product("p1", "Agua San Luis 625ml", 90, 0);
        register.add_item(&water, false).unwrap();
        register.set_client(Some(7), None).unwrap();

        let receipt = register.complete_sale(cash_request(100)).await.unwrap();

        assert_eq!(receipt.points_earned, 0);
        assert!(register.clients.get_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_discount_reduces_awarded_points() {
        let register = Register::new(MockSales::default(), MockClients::default());

        // S/ 20.00 − S/ 3.50 discount = S/ 16.50 → 16 points.
        let rum = product("p1", "Ron Flor de Caña 750ml", 2000, 3);
        register.add_item(&rum, false).unwrap();
        register.apply_discount(Money::from_cents(350)).unwrap();

        let receipt = register.complete_sale(cash_request(1650)).await.unwrap();

        assert_eq!(receipt.points_earned, 16);
        let requests = register.sales.requests.lock().unwrap();
        assert_eq!(requests[0].discount_cents, 350);
    }

    #[tokio::test]
    async fn test_double_submit_is_rejected_while_first_is_in_flight() {
        let (sales, release) = MockSales::gated();
        let register = Arc::new(Register::new(sales, MockClients::default()));

        let beer = product("p1", "Cerveza Corona 355ml", 850, 1);
        register.add_item(&beer, false).unwrap();

        // First submit parks inside the Sales collaborator.
        let first = {
            let register = Arc::clone(&register);
            tokio::spawn(async move { register.complete_sale(cash_request(850)).await })
        };

        // Wait until the in-flight flag is up.
        while !register.checkout_in_flight.load(Ordering::Acquire) {
            tokio::task::yield_now().await;
        }

        let second = register.complete_sale(cash_request(850)).await;
        assert!(matches!(second, Err(RegisterError::CheckoutInProgress)));

        release.send(()).unwrap();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.change_cents, 0);
        assert_eq!(register.sales.request_count(), 1);
    }

    #[tokio::test]
    async fn test_flag_resets_after_failed_checkout() {
        let register = Register::new(MockSales::failing(), MockClients::default());

        let beer = product("p1", "Cerveza Cusqueña 620ml", 750, 1);
        register.add_item(&beer, false).unwrap();

        assert!(register.complete_sale(cash_request(750)).await.is_err());
        // The guard dropped, so the next submit gets through to the
        // collaborator again.
        let result = register.complete_sale(cash_request(750)).await;
        assert!(matches!(result, Err(RegisterError::SaleFailed(_))));
    }

    // -------------------------------------------------------------------------
    // Ticket workflow through the register facade
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_multi_ticket_workflow() {
        let register = Register::new(MockSales::default(), MockClients::default());
        let first = register.active_ticket_id();

        let beer = product("p1", "Cerveza Cusqueña 620ml", 750, 1);
        register.add_item(&beer, false).unwrap();

        // Park the first ticket, serve another client on a second one.
        let second = register.create_ticket();
        assert_eq!(register.active_ticket_id(), second);
        assert!(register.active_ticket().is_empty());

        // The first ticket's total is still readable without switching.
        assert_eq!(register.ticket_total(Some(first)).cents(), 750);
        assert_eq!(register.ticket_total(Some(9999)).cents(), 0);

        register.switch_ticket(first).unwrap();
        assert_eq!(register.active_ticket().total().cents(), 750);

        assert!(matches!(
            register.switch_ticket(4242),
            Err(RegisterError::Core(_))
        ));
        assert_eq!(register.active_ticket_id(), first);
    }

    #[tokio::test]
    async fn test_checkout_of_switched_back_ticket() {
        let register = Register::new(MockSales::default(), MockClients::default());
        let first = register.active_ticket_id();

        let beer = product("p1", "Cerveza Pilsen 630ml", 700, 1);
        register.add_item(&beer, false).unwrap();

        let second = register.create_ticket();
        register.switch_ticket(first).unwrap();
        register.complete_sale(cash_request(700)).await.unwrap();

        // The parked second ticket survives and becomes active.
        assert_eq!(register.active_ticket_id(), second);
    }

    // -------------------------------------------------------------------------
    // Input validation at the checkout boundary
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_negative_amount_received_rejected_before_submit() {
        let register = Register::new(MockSales::default(), MockClients::default());

        let beer = product("p1", "Cerveza Cusqueña 620ml", 750, 1);
        register.add_item(&beer, false).unwrap();
        let ticket_id = register.active_ticket_id();

        let result = register.complete_sale(cash_request(-100)).await;

        assert!(matches!(result, Err(RegisterError::Core(_))));
        // Rejected before touching the collaborators or the ticket.
        assert_eq!(register.sales.request_count(), 0);
        assert_eq!(register.active_ticket_id(), ticket_id);
        assert_eq!(register.active_ticket().item_count(), 1);
    }

    #[tokio::test]
    async fn test_oversized_notes_rejected_through_register() {
        let register = Register::new(MockSales::default(), MockClients::default());

        register.set_notes("sin bolsa").unwrap();
        let result = register.set_notes("A".repeat(600));

        assert!(matches!(result, Err(RegisterError::Core(_))));
        assert_eq!(register.active_ticket().notes.as_deref(), Some("sin bolsa"));
    }

    // -------------------------------------------------------------------------
    // Mutation lockout during an in-flight checkout
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_mutations_rejected_while_checkout_in_flight() {
        let (sales, release) = MockSales::gated();
        let register = Arc::new(Register::new(sales, MockClients::default()));

        let beer = product("p1", "Cerveza Pilsen 630ml", 700, 1);
        let line = register.add_item(&beer, false).unwrap();

        let checkout = {
            let register = Arc::clone(&register);
            tokio::spawn(async move { register.complete_sale(cash_request(700)).await })
        };

        while !register.checkout_in_flight.load(Ordering::Acquire) {
            tokio::task::yield_now().await;
        }

        // Edits during the in-flight window would vanish when the
        // snapshot closes; every mutation path must refuse instead.
        let rum = product("p2", "Ron Cartavio 1L", 3200, 3);
        assert!(matches!(
            register.add_item(&rum, false),
            Err(RegisterError::CheckoutInProgress)
        ));
        assert!(matches!(
            register.adjust_quantity(line, 1),
            Err(RegisterError::CheckoutInProgress)
        ));
        assert!(matches!(
            register.remove_item(line),
            Err(RegisterError::CheckoutInProgress)
        ));
        assert!(matches!(
            register.set_client(Some(7), None),
            Err(RegisterError::CheckoutInProgress)
        ));
        assert!(matches!(
            register.set_notes("sin bolsa"),
            Err(RegisterError::CheckoutInProgress)
        ));
        assert!(matches!(
            register.apply_discount(Money::from_cents(100)),
            Err(RegisterError::CheckoutInProgress)
        ));
        assert!(matches!(
            register.close_ticket(register.active_ticket_id()),
            Err(RegisterError::CheckoutInProgress)
        ));

        release.send(()).unwrap();
        checkout.await.unwrap().unwrap();

        // Exactly what was rung up got sold; the register is usable again.
        let requests = register.sales.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].items.len(), 1);
        assert_eq!(requests[0].items[0].quantity, 1);
        drop(requests);

        register.add_item(&rum, false).unwrap();
        assert_eq!(register.active_ticket().item_count(), 1);
    }
}
