use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, NaiveDate, Utc};

use super::errors::DomainError;
use super::string_enum::string_enum;

/// Prefix shared by every tracking number.
pub const TRACKING_PREFIX: &str = "RCD";

/// Most units of one product a single order line may carry.
pub const MAX_LINE_QUANTITY: i32 = 10_000;

/// Totals are stored as `NUMERIC(12, 2)` and must stay below this.
const ORDER_TOTAL_LIMIT: i64 = 10_000_000_000;

string_enum! {
    OrderStatus {
        Pending => "PENDING",
        Paid => "PAID",
        Shipped => "SHIPPED",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
        Refunded => "REFUNDED",
    }
}

impl OrderStatus {
    /// Whether an order in `self` may move to `next`. Re-applying the current
    /// status is always allowed.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        self == next
            || matches!(
                (self, next),
                (Pending, Paid)
                    | (Pending, Cancelled)
                    | (Paid, Shipped)
                    | (Paid, Cancelled)
                    | (Paid, Refunded)
                    | (Shipped, Completed)
                    | (Shipped, Refunded)
                    | (Completed, Refunded)
            )
    }
}

/// A product and quantity requested for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    /// Current catalog price of the product.
    pub unit_price: BigDecimal,
    pub quantity: i32,
}

impl OrderLine {
    pub fn subtotal(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub tracking_number: String,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_amount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

/// Everything needed to persist a fresh order. The tracking sequence is
/// allocated by the repository inside the inserting transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: i64,
    pub user_name: String,
    pub placed_on: NaiveDate,
    pub lines: Vec<LineItem>,
}

/// Input of the upsert operation: `id == None` creates a new order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub id: Option<i64>,
    pub user_id: i64,
    pub status: Option<OrderStatus>,
    pub lines: Vec<LineItem>,
}

/// Sum of price × quantity over `lines`, rounded half-up to cents.
///
/// This is the only place an order total is computed.
pub fn order_total(lines: &[OrderLine]) -> BigDecimal {
    lines
        .iter()
        .map(OrderLine::subtotal)
        .fold(BigDecimal::from(0), |acc, subtotal| acc + subtotal)
        .with_scale_round(2, RoundingMode::HalfUp)
}

/// Rejects a total too large for the stored column.
pub fn check_total(total: &BigDecimal) -> Result<(), DomainError> {
    if *total >= BigDecimal::from(ORDER_TOTAL_LIMIT) {
        return Err(DomainError::validation(format!(
            "order total {} must be below {}",
            total, ORDER_TOTAL_LIMIT
        )));
    }
    Ok(())
}

/// Formats `RCD-{user:03}-{NAME}-{ddMMyy}-{sequence:03}`.
///
/// `NAME` is the first three ASCII letters of the user's name, upper-cased and
/// padded with `X` when the name has fewer letters.
pub fn tracking_number(
    user_id: i64,
    user_name: &str,
    placed_on: NaiveDate,
    sequence: i32,
) -> String {
    let mut initials: String = user_name
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(3)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    while initials.len() < 3 {
        initials.push('X');
    }

    format!(
        "{}-{:03}-{}-{}-{:03}",
        TRACKING_PREFIX,
        user_id,
        initials,
        placed_on.format("%d%m%y"),
        sequence
    )
}
