use serde::{Deserialize, Serialize};

use bookshop_core::{BookId, Entity, ShopError, ShopResult};

/// Descriptive catalog fields of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetails {
    pub name: String,
    pub author: String,
    pub year: i32,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub publisher: String,
    pub genre: String,
}

/// Catalog record: a book and the number of copies on the shelf.
///
/// `stock` is unsigned, so "never negative" holds by construction; the
/// mutators below additionally refuse to wrap around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    details: BookDetails,
    stock: u64,
}

impl Book {
    pub fn new(id: BookId, details: BookDetails, stock: u64) -> Self {
        Self { id, details, stock }
    }

    pub fn id_typed(&self) -> BookId {
        self.id
    }

    pub fn details(&self) -> &BookDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn author(&self) -> &str {
        &self.details.author
    }

    pub fn year(&self) -> i32 {
        self.details.year
    }

    pub fn price(&self) -> u64 {
        self.details.price
    }

    pub fn publisher(&self) -> &str {
        &self.details.publisher
    }

    pub fn genre(&self) -> &str {
        &self.details.genre
    }

    pub fn stock(&self) -> u64 {
        self.stock
    }

    /// Whether `quantity` copies can be taken off the shelf right now.
    pub fn can_reserve(&self, quantity: u64) -> bool {
        self.stock >= quantity
    }

    /// Add a signed delta to the stock and return the new count.
    ///
    /// # Errors
    /// `InvalidDelta` when a negative delta is larger than the current stock
    /// or a positive one would overflow. The stock is left untouched.
    pub fn change_stock(&mut self, delta: i64) -> ShopResult<u64> {
        let magnitude = delta.unsigned_abs();
        let new_stock = if delta < 0 {
            self.stock.checked_sub(magnitude)
        } else {
            self.stock.checked_add(magnitude)
        };

        match new_stock {
            Some(stock) => {
                self.stock = stock;
                Ok(stock)
            }
            None => Err(ShopError::invalid_delta(self.id, delta, self.stock)),
        }
    }

    /// Put `quantity` copies back on the shelf and return the new count.
    ///
    /// # Errors
    /// `InvalidDelta` if the count would overflow.
    pub fn restock(&mut self, quantity: u64) -> ShopResult<u64> {
        let stock = self
            .stock
            .checked_add(quantity)
            .ok_or_else(|| ShopError::invalid_delta(self.id, quantity, self.stock))?;
        self.stock = stock;
        Ok(stock)
    }

    /// Take `quantity` copies off the shelf and return the new count.
    ///
    /// # Errors
    /// `InsufficientStock` if fewer than `quantity` copies are available.
    pub fn reserve(&mut self, quantity: u64) -> ShopResult<u64> {
        let stock = self
            .stock
            .checked_sub(quantity)
            .ok_or_else(|| ShopError::insufficient_stock(self.id, quantity, self.stock))?;
        self.stock = stock;
        Ok(stock)
    }
}

impl Entity for Book {
    type Id = BookId;

    fn id(&self) -> BookId {
        self.id
    }
}
