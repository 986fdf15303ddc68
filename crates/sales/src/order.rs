use serde::{Deserialize, Serialize};

use bookshop_core::{BookId, Entity, OrderId};

/// Order status lifecycle.
///
/// The usual path is `NotCreated -> Processing -> Delivering -> Done`, with
/// `Refunded` reachable from anywhere. [`Order`] does not enforce it; the
/// shop moves orders along at the right moments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    NotCreated,
    Processing,
    Delivering,
    Done,
    Refunded,
}

/// How a refunded order travels back to the shop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefundOption {
    #[serde(rename = "courier")]
    Courier,
    /// The consumer brings the books back in person.
    #[serde(rename = "self")]
    SelfReturn,
    /// The order never reached the consumer.
    #[serde(rename = "not_delivered")]
    NotDelivered,
    #[default]
    #[serde(rename = "none")]
    Unset,
}

/// Order line: book and number of copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderLine {
    pub book_id: BookId,
    pub quantity: u64,
}

impl OrderLine {
    pub fn new(book_id: BookId, quantity: u64) -> Self {
        Self { book_id, quantity }
    }
}

impl From<(BookId, u64)> for OrderLine {
    fn from((book_id, quantity): (BookId, u64)) -> Self {
        Self { book_id, quantity }
    }
}

/// An order: fixed lines plus a mutable status / refund option pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    lines: Vec<OrderLine>,
    status: OrderStatus,
    refund_option: RefundOption,
}

impl Order {
    pub fn new(id: OrderId, lines: impl IntoIterator<Item = OrderLine>) -> Self {
        Self {
            id,
            lines: lines.into_iter().collect(),
            status: OrderStatus::NotCreated,
            refund_option: RefundOption::Unset,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn refund_option(&self) -> RefundOption {
        self.refund_option
    }

    /// Total number of copies across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.lines
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Overwrite the status and return the previous one.
    pub fn change_status(&mut self, status: OrderStatus) -> OrderStatus {
        core::mem::replace(&mut self.status, status)
    }

    /// Overwrite the refund option and return the previous one.
    pub fn change_refund_option(&mut self, option: RefundOption) -> RefundOption {
        core::mem::replace(&mut self.refund_option, option)
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_order() -> Order {
        Order::new(
            OrderId::new(222),
            [
                OrderLine::new(BookId::new(1), 1),
                OrderLine::new(BookId::new(2), 1),
            ],
        )
    }

    #[test]
    fn new_order_is_not_created_without_refund_option() {
        let order = test_order();
        assert_eq!(order.lines().len(), 2);
        assert_eq!(order.lines()[0].book_id, BookId::new(1));
        assert_eq!(order.status(), OrderStatus::NotCreated);
        assert_eq!(order.refund_option(), RefundOption::Unset);
        assert_eq!(order.total_quantity(), 2);
    }

    #[test]
    fn change_status_accepts_any_transition() {
        let mut order = test_order();
        assert_eq!(
            order.change_status(OrderStatus::Processing),
            OrderStatus::NotCreated
        );
        assert_eq!(order.status(), OrderStatus::Processing);

        // Jumping backwards is allowed; the type does not police the lifecycle.
        assert_eq!(order.change_status(OrderStatus::Done), OrderStatus::Processing);
        assert_eq!(order.change_status(OrderStatus::NotCreated), OrderStatus::Done);
    }

    #[test]
    fn change_refund_option_overwrites() {
        let mut order = test_order();
        assert_eq!(
            order.change_refund_option(RefundOption::Courier),
            RefundOption::Unset
        );
        assert_eq!(
            order.change_refund_option(RefundOption::SelfReturn),
            RefundOption::Courier
        );
        assert_eq!(order.refund_option(), RefundOption::SelfReturn);
        // Lines are untouched by status bookkeeping.
        assert_eq!(order.lines(), test_order().lines());
    }

    #[test]
    fn wire_names_are_stable() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::NotCreated).unwrap(),
            "\"not_created\""
        );
        assert_eq!(
            serde_json::to_string(&RefundOption::SelfReturn).unwrap(),
            "\"self\""
        );
        assert_eq!(
            serde_json::to_string(&RefundOption::Unset).unwrap(),
            "\"none\""
        );
    }
}
