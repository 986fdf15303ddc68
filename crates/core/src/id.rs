//! Strongly-typed identifiers and the generator that hands them out.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::ShopError;

/// Identifier of a catalog book.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(u64);

/// Identifier of a consumer cart.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(u64);

/// Identifier of an order.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

/// Identifier of a consumer.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsumerId(u64);

macro_rules! impl_u64_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = ShopError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| ShopError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_u64_newtype!(BookId, "BookId");
impl_u64_newtype!(CartId, "CartId");
impl_u64_newtype!(OrderId, "OrderId");
impl_u64_newtype!(ConsumerId, "ConsumerId");

/// Monotonic id source, one counter per id kind.
///
/// Owned by whoever creates entities (normally the shop) instead of living in
/// process-wide statics, so two shops never share a sequence and tests can
/// start from a known value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    next_book: u64,
    next_cart: u64,
    next_order: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All counters start at `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next_book: first,
            next_cart: first,
            next_order: first,
        }
    }

    pub fn next_book_id(&mut self) -> BookId {
        BookId(bump(&mut self.next_book))
    }

    pub fn next_cart_id(&mut self) -> CartId {
        CartId(bump(&mut self.next_cart))
    }

    pub fn next_order_id(&mut self) -> OrderId {
        OrderId(bump(&mut self.next_order))
    }

    /// Make sure the order counter never hands out `taken` or anything below it.
    ///
    /// Order ids may also be supplied by callers; this keeps generated ids
    /// from colliding with those.
    pub fn observe_order_id(&mut self, taken: OrderId) {
        self.next_order = self.next_order.max(taken.0.saturating_add(1));
    }

    /// Same as [`IdGenerator::observe_order_id`] for book ids.
    pub fn observe_book_id(&mut self, taken: BookId) {
        self.next_book = self.next_book.max(taken.0.saturating_add(1));
    }
}

fn bump(counter: &mut u64) -> u64 {
    let id = *counter;
    *counter = counter.saturating_add(1);
    id
}
