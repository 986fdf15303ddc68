use serde::{Deserialize, Serialize};

use bookshop_core::{BookId, CartId, Entity};
use bookshop_inventory::Book;

use crate::order::OrderLine;

/// Consumer-local staging list of book references.
///
/// Every entry stands for one copy; adding the same book twice yields two
/// entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    books: Vec<BookId>,
}

impl Cart {
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            books: Vec::new(),
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    pub fn add_book(&mut self, book: &Book) {
        self.books.push(book.id());
    }

    pub fn books_in_cart(&self) -> &[BookId] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn clear(&mut self) {
        self.books.clear();
    }

    /// One quantity-1 line per entry, in cart order.
    pub fn to_lines(&self) -> Vec<OrderLine> {
        self.books
            .iter()
            .map(|&book_id| OrderLine::new(book_id, 1))
            .collect()
    }
}

impl Entity for Cart {
    type Id = CartId;

    fn id(&self) -> CartId {
        self.id
    }
}
