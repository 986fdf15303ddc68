use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bookshop_core::{BookId, OrderId};
use bookshop_events::Event;
use bookshop_sales::{OrderLine, RefundOption};

/// Event: BookStocked. A new catalog entry or a restock of an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookStocked {
    pub book_id: BookId,
    pub delta: u64,
    pub stock: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BookRemoved. The book left the catalog with `stock` copies unsold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRemoved {
    pub book_id: BookId,
    pub stock: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderPlaced. Stock for every line has been reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub lines: Vec<OrderLine>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderDelivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDelivered {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BookRefunded. Copies returned to the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRefunded {
    pub book_id: BookId,
    pub quantity: u64,
    pub stock: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderRefunded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRefunded {
    pub order_id: OrderId,
    pub refund_option: RefundOption,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopEvent {
    BookStocked(BookStocked),
    BookRemoved(BookRemoved),
    OrderPlaced(OrderPlaced),
    OrderDelivered(OrderDelivered),
    BookRefunded(BookRefunded),
    OrderRefunded(OrderRefunded),
}

impl Event for ShopEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ShopEvent::BookStocked(_) => "shop.book.stocked",
            ShopEvent::BookRemoved(_) => "shop.book.removed",
            ShopEvent::OrderPlaced(_) => "shop.order.placed",
            ShopEvent::OrderDelivered(_) => "shop.order.delivered",
            ShopEvent::BookRefunded(_) => "shop.book.refunded",
            ShopEvent::OrderRefunded(_) => "shop.order.refunded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ShopEvent::BookStocked(e) => e.occurred_at,
            ShopEvent::BookRemoved(e) => e.occurred_at,
            ShopEvent::OrderPlaced(e) => e.occurred_at,
            ShopEvent::OrderDelivered(e) => e.occurred_at,
            ShopEvent::BookRefunded(e) => e.occurred_at,
            ShopEvent::OrderRefunded(e) => e.occurred_at,
        }
    }
}
