//! Shop error model.

use thiserror::Error;

use crate::id::{BookId, OrderId};

/// Result type used across the bookshop crates.
pub type ShopResult<T> = Result<T, ShopError>;

/// Shop-level error.
///
/// Every variant is recoverable: the caller decides whether to retry, adjust
/// the request or give up. Nothing here is fatal to the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShopError {
    /// The catalog has no book with this id.
    #[error("unknown book: {0}")]
    UnknownBook(BookId),

    /// The shop has no order with this id.
    #[error("unknown order: {0}")]
    UnknownOrder(OrderId),

    /// An order asked for more units than the catalog holds.
    #[error("insufficient stock for book {book_id}: requested {requested}, available {available}")]
    InsufficientStock {
        book_id: BookId,
        requested: u64,
        available: u64,
    },

    /// A stock delta would take the count below zero or past `u64::MAX`.
    #[error("invalid stock delta {delta} for book {book_id} (stock: {stock})")]
    InvalidDelta {
        book_id: BookId,
        delta: i128,
        stock: u64,
    },

    /// An order with this id has already been accepted.
    #[error("order already exists: {0}")]
    DuplicateOrder(OrderId),

    /// The order was refunded before; its stock is already restored.
    #[error("order already refunded: {0}")]
    AlreadyRefunded(OrderId),

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl ShopError {
    pub fn insufficient_stock(book_id: BookId, requested: u64, available: u64) -> Self {
        Self::InsufficientStock {
            book_id,
            requested,
            available,
        }
    }

    pub fn invalid_delta(book_id: BookId, delta: impl Into<i128>, stock: u64) -> Self {
        Self::InvalidDelta {
            book_id,
            delta: delta.into(),
            stock,
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
