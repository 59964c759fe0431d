//! # Loyalty Points
//!
//! Pure derivation functions for the store's two loyalty rules.
//!
//! ## Two Independent Formulas
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Loyalty Point Rules                                   │
//! │                                                                         │
//! │  RULE 1: Per-line badge (what the ticket UI shows per item)            │
//! │     item_points = Σ points_per_unit × quantity                          │
//! │                                                                         │
//! │  RULE 2: Checkout award (what the client's balance receives)           │
//! │     points_for_total = floor(total in soles), never negative           │
//! │                                                                         │
//! │  Example: one item, 3 pts/unit, qty 2, total S/ 7.00                   │
//! │     badge shows 6 points  •  balance gains 7 points                    │
//! │                                                                         │
//! │  The two rules are NOT reconciled. The badge is a per-product          │
//! │  promotional figure; the balance award is a flat spend reward.         │
//! │  Surfaces must report each under its own name and never conflate       │
//! │  them.                                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::money::Money;
use crate::ticket::TicketItem;

/// Sums the per-line loyalty badge across all line items
/// (`points_per_unit × quantity` per line).
///
/// ## Example
/// ```rust
/// use licoreria_core::points::item_points;
/// # use licoreria_core::ticket::Ticket;
/// # use licoreria_core::types::Product;
/// # use chrono::Utc;
/// # let product = Product {
/// #     id: "p-1".into(), barcode: None, description: "Ron 1L".into(),
/// #     retail_price_cents: 3500, wholesale_price_cents: 3000,
/// #     points_per_unit: 3, stock: 10, category: None, is_active: true,
/// #     created_at: Utc::now(), updated_at: Utc::now(),
/// # };
/// let mut ticket = Ticket::new(1);
/// ticket.add_item(&product, false).unwrap();
/// ticket.add_item(&product, false).unwrap();
///
/// // 3 points per unit × quantity 2
/// assert_eq!(item_points(ticket.items()), 6);
/// ```
pub fn item_points(items: &[TicketItem]) -> i64 {
    items.iter().map(TicketItem::line_points).sum()
}

/// The checkout award: one point per whole sol of the final total,
/// clamped to zero for empty or fully-discounted tickets.
///
/// Thin wrapper over [`Money::whole_soles`] so callers reaching for
/// "points" find it next to [`item_points`].
#[inline]
pub fn points_for_total(total: Money) -> i64 {
    total.whole_soles()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::Ticket;
    use crate::types::Product;
    use chrono::Utc;

    fn product(points_per_unit: i64, retail_cents: i64) -> Product {
        Product {
            id: format!("p-{}", retail_cents),
            barcode: None,
            description: "Cerveza Pilsen 630ml".to_string(),
            retail_price_cents: retail_cents,
            wholesale_price_cents: retail_cents - 50,
            points_per_unit,
            stock: 100,
            category: Some("Cervezas".to_string()),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_item_points_sums_per_line() {
        let mut ticket = Ticket::new(1);
        let a = product(3, 350); // 3 pts/unit
        let b = product(0, 700); // no points

        ticket.add_item(&a, false).unwrap();
        ticket.add_item(&a, false).unwrap(); // qty 2
        ticket.add_item(&b, false).unwrap();

        assert_eq!(item_points(ticket.items()), 6);
    }

    #[test]
    fn test_points_for_total_floors_whole_soles() {
        assert_eq!(points_for_total(Money::from_cents(700)), 7);
        assert_eq!(points_for_total(Money::from_cents(799)), 7);
        assert_eq!(points_for_total(Money::from_cents(99)), 0);
        assert_eq!(points_for_total(Money::zero()), 0);
    }

    /// The two formulas are independent and may disagree; both values
    /// are legitimate under their own rule.
    #[test]
    fn test_formulas_are_not_reconciled() {
        let mut ticket = Ticket::new(1);
        let a = product(3, 350); // S/ 3.50, 3 pts/unit

        ticket.add_item(&a, false).unwrap();
        ticket.add_item(&a, false).unwrap(); // qty 2, total S/ 7.00

        let badge = item_points(ticket.items());
        let award = points_for_total(ticket.total());

        assert_eq!(badge, 6);
        assert_eq!(award, 7);
        assert_ne!(badge, award);
    }
}
