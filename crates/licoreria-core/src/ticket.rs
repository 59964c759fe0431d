//! # Tickets
//!
//! The multi-ticket shopping state for the register: line items, the
//! ticket itself, and the [`TicketBook`] that owns every open ticket.
//!
//! ## Ticket Book Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       TicketBook State                                  │
//! │                                                                         │
//! │  Frontend Action        Register Call          State Change             │
//! │  ───────────────        ─────────────          ────────────             │
//! │                                                                         │
//! │  "New ticket" tab ────► create_ticket() ─────► push Ticket, active=id  │
//! │                                                                         │
//! │  Click ticket tab ────► switch_ticket(id) ───► active=id               │
//! │                                                                         │
//! │  Close ticket tab ────► close_ticket(id) ────► remove; re-point active │
//! │                                                                         │
//! │  Click product ───────► active().add_item() ─► merge or append line    │
//! │                                                                         │
//! │  INVARIANTS:                                                            │
//! │  • At least one ticket is always open                                  │
//! │  • The active id always references an open ticket                      │
//! │  • Ticket ids are monotonic and never reused                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stable Line Ids
//! Lines are addressed by a synthetic `line_id` assigned at insertion,
//! never by array position. A stale index after a removal would silently
//! edit the wrong line; a stale line id fails loudly with
//! [`CoreError::LineNotFound`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::validate_notes;
use crate::{MAX_ITEM_QUANTITY, MAX_TICKET_ITEMS};

// =============================================================================
// Ticket Line Item
// =============================================================================

/// One product line within a ticket.
///
/// ## Price Freezing
/// `unit_price_cents` and `points_per_unit` are captured when the line is
/// added. Catalog changes after that moment never retroactively reprice
/// lines already in a ticket.
///
/// ## Derived Values
/// Subtotal and line points are computed on read (`subtotal()`,
/// `line_points()`), never stored, so they cannot drift from
/// `unit_price × quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TicketItem {
    /// Stable synthetic id, unique within the ticket, assigned at insert.
    pub line_id: u64,

    /// Product this line sells.
    pub product_id: String,

    /// Product description at time of add (frozen).
    pub description: String,

    /// Unit price in céntimos at time of add (frozen).
    pub unit_price_cents: i64,

    /// Quantity, always >= 1.
    pub quantity: i64,

    /// Loyalty points per unit at time of add (frozen, >= 0).
    pub points_per_unit: i64,

    /// True if the wholesale pricing tier was applied.
    pub wholesale: bool,
}

impl TicketItem {
    /// Line subtotal: `unit_price × quantity`, derived on every read.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }

    /// Line subtotal in céntimos.
    #[inline]
    pub fn subtotal_cents(&self) -> i64 {
        self.subtotal().cents()
    }

    /// Per-line loyalty badge: `points_per_unit × quantity`.
    #[inline]
    pub fn line_points(&self) -> i64 {
        self.points_per_unit * self.quantity
    }
}

// =============================================================================
// Ticket
// =============================================================================

/// One in-progress sale (a shopping cart).
///
/// ## Invariants
/// - At most one line per distinct `(product_id, wholesale)` pair;
///   adding the same product at the same tier increments quantity
/// - `quantity >= 1` on every line; decrements clamp at 1
/// - `discount_cents >= 0`; negative input clamps to 0
/// - `total()` is never negative
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Ticket {
    /// Ticket id, unique among open tickets, never reused.
    pub id: u64,

    /// Line items in insertion order.
    items: Vec<TicketItem>,

    /// Attached client, or None for a walk-in sale.
    pub client_id: Option<i64>,

    /// Denormalized client display name cached alongside `client_id`.
    pub client_name: Option<String>,

    /// Free-text notes, sent as the sale comment at checkout.
    pub notes: Option<String>,

    /// Ticket-level discount in céntimos, never negative.
    discount_cents: i64,

    /// Next synthetic line id to hand out.
    next_line_id: u64,
}

impl Ticket {
    /// Creates a new empty ticket with the given id.
    pub fn new(id: u64) -> Self {
        Ticket {
            id,
            items: Vec::new(),
            client_id: None,
            client_name: None,
            notes: None,
            discount_cents: 0,
            next_line_id: 1,
        }
    }

    /// Adds a product at the given pricing tier, merging with an
    /// existing line on the same `(product_id, wholesale)` pair.
    ///
    /// ## Behavior
    /// - Same product + same tier already present: quantity += 1
    /// - Otherwise: new line with quantity 1, price and points frozen
    ///
    /// ## Returns
    /// The line id of the merged-into or newly created line.
    pub fn add_item(&mut self, product: &Product, wholesale: bool) -> CoreResult<u64> {
        if !product.is_active {
            return Err(CoreError::ProductInactive(product.id.clone()));
        }

        // Merge: same product at the same pricing tier
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product.id && i.wholesale == wholesale)
        {
            if item.quantity + 1 > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: item.quantity + 1,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity += 1;
            return Ok(item.line_id);
        }

        if self.items.len() >= MAX_TICKET_ITEMS {
            return Err(CoreError::TicketTooLarge {
                max: MAX_TICKET_ITEMS,
            });
        }

        let line_id = self.next_line_id;
        self.next_line_id += 1;

        self.items.push(TicketItem {
            line_id,
            product_id: product.id.clone(),
            description: product.description.clone(),
            unit_price_cents: product.price_for_tier(wholesale).cents(),
            quantity: 1,
            points_per_unit: product.effective_points_per_unit(),
            wholesale,
        });

        Ok(line_id)
    }

    /// Adjusts a line's quantity by a signed delta.
    ///
    /// ## Behavior
    /// - New quantity = `max(1, quantity + delta)`: this operation can
    ///   never drop a line below 1 (removal is a separate explicit action)
    /// - Capped at the maximum quantity limit
    pub fn adjust_quantity(&mut self, line_id: u64, delta: i64) -> CoreResult<()> {
        let ticket_id = self.id;
        let item = self
            .items
            .iter_mut()
            .find(|i| i.line_id == line_id)
            .ok_or(CoreError::LineNotFound { ticket_id, line_id })?;

        let new_quantity = (item.quantity + delta).max(1);
        if new_quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: new_quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        item.quantity = new_quantity;
        Ok(())
    }

    /// Removes a line by its stable id.
    pub fn remove_item(&mut self, line_id: u64) -> CoreResult<()> {
        let before = self.items.len();
        self.items.retain(|i| i.line_id != line_id);

        if self.items.len() == before {
            return Err(CoreError::LineNotFound {
                ticket_id: self.id,
                line_id,
            });
        }
        Ok(())
    }

    /// Attaches or clears the client reference.
    ///
    /// Passing `None, None` clears the association (back to walk-in).
    pub fn set_client(&mut self, client_id: Option<i64>, client_name: Option<String>) {
        self.client_id = client_id;
        self.client_name = client_name;
    }

    /// Replaces the free-text notes wholesale.
    ///
    /// Input is trimmed and bounded at the notes length limit; an empty
    /// result clears the notes.
    pub fn set_notes(&mut self, notes: impl Into<String>) -> CoreResult<()> {
        let notes = validate_notes(&notes.into())?;
        self.notes = if notes.is_empty() { None } else { Some(notes) };
        Ok(())
    }

    /// Sets the ticket-level discount; negative input clamps to zero.
    pub fn apply_discount(&mut self, discount: Money) {
        self.discount_cents = discount.cents().max(0);
    }

    /// The stored discount (always >= 0).
    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    /// The line items, in insertion order.
    #[inline]
    pub fn items(&self) -> &[TicketItem] {
        &self.items
    }

    /// Sum of line subtotals, before discount.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(TicketItem::subtotal).sum()
    }

    /// Final total: `max(0, subtotal - discount)`.
    pub fn total(&self) -> Money {
        self.subtotal().saturating_discount(self.discount())
    }

    /// Number of distinct lines.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the ticket has no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Ticket Totals (UI summary)
// =============================================================================

/// Ticket totals summary for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TicketTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    /// The per-line loyalty badge sum (NOT the checkout award).
    pub item_points: i64,
}

impl From<&Ticket> for TicketTotals {
    fn from(ticket: &Ticket) -> Self {
        TicketTotals {
            item_count: ticket.item_count(),
            total_quantity: ticket.total_quantity(),
            subtotal_cents: ticket.subtotal().cents(),
            discount_cents: ticket.discount().cents(),
            total_cents: ticket.total().cents(),
            item_points: crate::points::item_points(ticket.items()),
        }
    }
}

// =============================================================================
// Ticket Book
// =============================================================================

/// Owns every open ticket, the active id, and the monotonic id counter.
///
/// ## Lifecycle
/// ```text
/// new() ──► ticket #1 open + active
///    │
///    ├── create_ticket() ──► ticket #2 open, becomes active
///    │
///    ├── switch_ticket(1) ──► #1 active (unknown id = error, no change)
///    │
///    └── close_ticket(1) ──► #1 removed
///            │
///            ├── active was #1? → first remaining becomes active
///            └── book empty?    → fresh ticket created and made active
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TicketBook {
    /// Open tickets, in the order they were opened.
    tickets: Vec<Ticket>,

    /// Id of the active ticket. Always references an entry in `tickets`.
    active_id: u64,

    /// Next ticket id to allocate. Never decremented, ids never reused.
    next_id: u64,
}

impl TicketBook {
    /// Creates a book with a single fresh ticket, already active.
    pub fn new() -> Self {
        let first = Ticket::new(1);
        TicketBook {
            active_id: first.id,
            tickets: vec![first],
            next_id: 2,
        }
    }

    /// Opens a new empty ticket and makes it active. Never fails.
    pub fn create_ticket(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.tickets.push(Ticket::new(id));
        self.active_id = id;
        id
    }

    /// Makes the given ticket active.
    ///
    /// Unknown ids are rejected and the active ticket is unchanged, so
    /// subsequent mutations keep a valid target.
    pub fn switch_ticket(&mut self, id: u64) -> CoreResult<()> {
        if !self.tickets.iter().any(|t| t.id == id) {
            return Err(CoreError::TicketNotFound(id));
        }
        self.active_id = id;
        Ok(())
    }

    /// Closes (removes) the given ticket.
    ///
    /// If the closed ticket was active, the first remaining ticket becomes
    /// active. If the book would become empty, a fresh ticket is created
    /// so at least one ticket always exists.
    pub fn close_ticket(&mut self, id: u64) -> CoreResult<()> {
        let before = self.tickets.len();
        self.tickets.retain(|t| t.id != id);

        if self.tickets.len() == before {
            return Err(CoreError::TicketNotFound(id));
        }

        if self.tickets.is_empty() {
            self.create_ticket();
        } else if self.active_id == id {
            self.active_id = self.tickets[0].id;
        }
        Ok(())
    }

    /// The active ticket.
    ///
    /// The book's invariant guarantees the active id always references an
    /// open ticket, so this cannot fail for callers.
    pub fn active(&self) -> &Ticket {
        self.tickets
            .iter()
            .find(|t| t.id == self.active_id)
            .expect("ticket book invariant: active id references an open ticket")
    }

    /// Mutable access to the active ticket.
    pub fn active_mut(&mut self) -> &mut Ticket {
        let active_id = self.active_id;
        self.tickets
            .iter_mut()
            .find(|t| t.id == active_id)
            .expect("ticket book invariant: active id references an open ticket")
    }

    /// Looks up an open ticket by id.
    pub fn get(&self, id: u64) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// The id of the active ticket.
    #[inline]
    pub fn active_id(&self) -> u64 {
        self.active_id
    }

    /// All open tickets, in the order they were opened.
    #[inline]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Number of open tickets.
    #[inline]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    /// Always false: the book never holds zero tickets. Provided for
    /// clippy's `len_without_is_empty`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Total for the given ticket, or the active one if `id` is None.
    /// Unknown ids read as zero.
    pub fn ticket_total(&self, id: Option<u64>) -> Money {
        match id {
            Some(id) => self.get(id).map(Ticket::total).unwrap_or_else(Money::zero),
            None => self.active().total(),
        }
    }
}

impl Default for TicketBook {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
