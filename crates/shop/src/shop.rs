use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::Utc;
use tracing::{debug, info, warn};

use bookshop_core::{BookId, CartId, Entity, IdGenerator, OrderId, ShopError, ShopResult};
use bookshop_events::{EventBus, EventEnvelope};
use bookshop_inventory::Book;
use bookshop_sales::{Order, OrderLine, OrderStatus, RefundOption};

use crate::config::{RefundPolicy, ShopConfig};
use crate::event::{
    BookRefunded, BookRemoved, BookStocked, OrderDelivered, OrderPlaced, OrderRefunded, ShopEvent,
};

/// The bookshop: catalog, accepted orders and the id generator.
///
/// Every stock or order-status change goes through `&mut self`, which makes
/// the check-then-commit sequences below indivisible for single-owner use.
/// Successful mutations append a [`ShopEvent`] to an outbox drained with
/// [`Shop::take_events`] or [`Shop::publish_events`].
#[derive(Debug, Clone, Default)]
pub struct Shop {
    config: ShopConfig,
    ids: IdGenerator,
    books: HashMap<BookId, Book>,
    orders: HashMap<OrderId, Order>,
    outbox: Vec<EventEnvelope<ShopEvent>>,
    next_sequence: u64,
}

impl Shop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ShopConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace the id generator, e.g. to start numbering at a known value.
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    pub fn next_book_id(&mut self) -> BookId {
        self.ids.next_book_id()
    }

    pub fn next_cart_id(&mut self) -> CartId {
        self.ids.next_cart_id()
    }

    pub fn next_order_id(&mut self) -> OrderId {
        self.ids.next_order_id()
    }

    // ---- catalog ----

    /// Add a book to the catalog and return its resulting stock.
    ///
    /// A book whose id is already listed counts as a restock: its stock is
    /// added to the existing entry and the existing details are kept.
    pub fn add_book(&mut self, book: Book) -> ShopResult<u64> {
        let book_id = book.id();
        let delta = book.stock();

        let stock = match self.books.entry(book_id) {
            Entry::Occupied(mut entry) => entry.get_mut().restock(delta)?,
            Entry::Vacant(entry) => {
                self.ids.observe_book_id(book_id);
                entry.insert(book).stock()
            }
        };

        debug!(book_id = %book_id, delta, stock, "book stocked");
        self.record(ShopEvent::BookStocked(BookStocked {
            book_id,
            delta,
            stock,
            occurred_at: Utc::now(),
        }));
        Ok(stock)
    }

    /// Take a book out of the catalog. Orders that mention it are kept.
    pub fn remove_book(&mut self, book_id: BookId) -> ShopResult<Book> {
        let book = self
            .books
            .remove(&book_id)
            .ok_or(ShopError::UnknownBook(book_id))?;

        debug!(book_id = %book_id, stock = book.stock(), "book removed");
        self.record(ShopEvent::BookRemoved(BookRemoved {
            book_id,
            stock: book.stock(),
            occurred_at: Utc::now(),
        }));
        Ok(book)
    }

    pub fn has_book(&self, book_id: BookId) -> bool {
        self.books.contains_key(&book_id)
    }

    pub fn book_info(&self, book_id: BookId) -> ShopResult<&Book> {
        self.books.get(&book_id).ok_or(ShopError::UnknownBook(book_id))
    }

    pub fn book_info_mut(&mut self, book_id: BookId) -> ShopResult<&mut Book> {
        self.books
            .get_mut(&book_id)
            .ok_or(ShopError::UnknownBook(book_id))
    }

    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    // ---- orders ----

    pub fn has_order(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }

    pub fn order(&self, order_id: OrderId) -> ShopResult<&Order> {
        self.orders
            .get(&order_id)
            .ok_or(ShopError::UnknownOrder(order_id))
    }

    pub fn order_mut(&mut self, order_id: OrderId) -> ShopResult<&mut Order> {
        self.orders
            .get_mut(&order_id)
            .ok_or(ShopError::UnknownOrder(order_id))
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    /// Accept an order: reserve stock for every line, then store it as
    /// `Processing`.
    ///
    /// All lines are checked before any stock moves. Lines naming the same
    /// book are summed for the check. On error nothing changes.
    ///
    /// # Errors
    /// - `DuplicateOrder` if the id was accepted before
    /// - `UnknownBook` for a line whose book is not listed
    /// - `InsufficientStock` if a book has fewer copies than requested
    /// - `InvalidDelta` if the lines for one book add up past `u64::MAX`
    pub fn make_order(&mut self, mut order: Order) -> ShopResult<()> {
        let order_id = order.id();

        let totals = match self.check_order(&order) {
            Ok(totals) => totals,
            Err(err) => {
                warn!(order_id = %order_id, error = %err, "order rejected");
                return Err(err);
            }
        };

        for (book_id, quantity) in totals {
            // Availability was checked above.
            self.book_info_mut(book_id)?.reserve(quantity)?;
        }

        order.change_status(OrderStatus::Processing);
        self.ids.observe_order_id(order_id);

        info!(
            order_id = %order_id,
            lines = order.lines().len(),
            copies = order.total_quantity(),
            "order accepted"
        );
        self.record(ShopEvent::OrderPlaced(OrderPlaced {
            order_id,
            lines: order.lines().to_vec(),
            occurred_at: Utc::now(),
        }));
        self.orders.insert(order_id, order);
        Ok(())
    }

    /// Validate an order and return the per-book totals to reserve.
    fn check_order(&self, order: &Order) -> ShopResult<Vec<(BookId, u64)>> {
        if self.has_order(order.id()) {
            return Err(ShopError::DuplicateOrder(order.id()));
        }

        let totals = self.requested_quantities(order.lines())?;
        for &(book_id, quantity) in &totals {
            let book = self.book_info(book_id)?;
            if !book.can_reserve(quantity) {
                return Err(ShopError::insufficient_stock(book_id, quantity, book.stock()));
            }
        }
        Ok(totals)
    }

    /// Total quantity per book, in order of first appearance.
    ///
    /// A total past `u64::MAX` fails with `InvalidDelta` carrying the full
    /// total, or `UnknownBook` if the book is not listed.
    fn requested_quantities(&self, lines: &[OrderLine]) -> ShopResult<Vec<(BookId, u64)>> {
        let mut totals: Vec<(BookId, u64)> = Vec::with_capacity(lines.len());
        let mut index: HashMap<BookId, usize> = HashMap::with_capacity(lines.len());

        for line in lines {
            match index.entry(line.book_id) {
                Entry::Occupied(slot) => {
                    let total = &mut totals[*slot.get()].1;
                    *total = match total.checked_add(line.quantity) {
                        Some(sum) => sum,
                        None => {
                            let stock = self.book_info(line.book_id)?.stock();
                            let wide = i128::from(*total) + i128::from(line.quantity);
                            return Err(ShopError::invalid_delta(line.book_id, wide, stock));
                        }
                    };
                }
                Entry::Vacant(slot) => {
                    slot.insert(totals.len());
                    totals.push((line.book_id, line.quantity));
                }
            }
        }
        Ok(totals)
    }

    /// Mark an order as done. The current status is not checked, so
    /// delivering twice is fine.
    pub fn deliver_order(&mut self, order_id: OrderId) -> ShopResult<()> {
        let order = self.order_mut(order_id)?;
        let previous = order.change_status(OrderStatus::Done);

        info!(order_id = %order_id, ?previous, "order delivered");
        self.record(ShopEvent::OrderDelivered(OrderDelivered {
            order_id,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Put the copies of one line back on the shelf and return the new stock.
    pub fn refund_book(&mut self, line: OrderLine) -> ShopResult<u64> {
        let stock = self.book_info_mut(line.book_id)?.restock(line.quantity)?;
        self.record_book_refunded(book_refunded(line, stock));
        Ok(stock)
    }

    fn record_book_refunded(&mut self, event: BookRefunded) {
        debug!(
            book_id = %event.book_id,
            quantity = event.quantity,
            stock = event.stock,
            "book refunded"
        );
        self.record(ShopEvent::BookRefunded(event));
    }

    /// Refund an order: restore the stock of every line, record the refund
    /// option and mark the order `Refunded`.
    ///
    /// Lines whose book is no longer listed are handled per
    /// [`ShopConfig::refund_policy`].
    ///
    /// # Errors
    /// - `UnknownOrder` if the order was never accepted
    /// - `AlreadyRefunded` if the stock was already restored once
    /// - with `RefundPolicy::Atomic`, the first failing line's error; nothing
    ///   changes in that case
    pub fn refund_order(&mut self, order_id: OrderId, option: RefundOption) -> ShopResult<()> {
        let order = self.order(order_id)?;
        if order.status() == OrderStatus::Refunded {
            return Err(ShopError::AlreadyRefunded(order_id));
        }
        let lines = order.lines().to_vec();

        match self.config.refund_policy {
            RefundPolicy::Atomic => {
                let (restocked, refunded) = match self.stage_refund(&lines) {
                    Ok(staged) => staged,
                    Err(err) => {
                        warn!(order_id = %order_id, error = %err, "refund rejected");
                        return Err(err);
                    }
                };
                self.books.extend(restocked);
                for event in refunded {
                    self.record_book_refunded(event);
                }
            }
            RefundPolicy::BestEffort => {
                for line in lines {
                    if let Err(err) = self.refund_book(line) {
                        warn!(order_id = %order_id, book_id = %line.book_id, error = %err, "refund line skipped");
                    }
                }
            }
        }

        let order = self.order_mut(order_id)?;
        order.change_refund_option(option);
        order.change_status(OrderStatus::Refunded);

        info!(order_id = %order_id, ?option, "order refunded");
        self.record(ShopEvent::OrderRefunded(OrderRefunded {
            order_id,
            refund_option: option,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Restock copies of the books named by `lines` without touching the
    /// catalog. Returns the restocked copies and one event per line.
    fn stage_refund(
        &self,
        lines: &[OrderLine],
    ) -> ShopResult<(HashMap<BookId, Book>, Vec<BookRefunded>)> {
        let mut staged: HashMap<BookId, Book> = HashMap::new();
        let mut refunded = Vec::with_capacity(lines.len());

        for &line in lines {
            let book = match staged.entry(line.book_id) {
                Entry::Occupied(slot) => slot.into_mut(),
                Entry::Vacant(slot) => slot.insert(self.book_info(line.book_id)?.clone()),
            };
            let stock = book.restock(line.quantity)?;
            refunded.push(book_refunded(line, stock));
        }
        Ok((staged, refunded))
    }

    // ---- events ----

    pub fn pending_events(&self) -> &[EventEnvelope<ShopEvent>] {
        &self.outbox
    }

    /// Drain the outbox.
    pub fn take_events(&mut self) -> Vec<EventEnvelope<ShopEvent>> {
        std::mem::take(&mut self.outbox)
    }

    /// Publish the outbox to `bus` in order and return how many went out.
    ///
    /// If the bus fails, the failed event and everything after it stay in the
    /// outbox for the next attempt.
    pub fn publish_events<B>(&mut self, bus: &B) -> Result<usize, B::Error>
    where
        B: EventBus<EventEnvelope<ShopEvent>>,
    {
        let mut pending = std::mem::take(&mut self.outbox);
        let failure = pending
            .iter()
            .enumerate()
            .find_map(|(index, envelope)| bus.publish(envelope.clone()).err().map(|err| (index, err)));

        match failure {
            Some((published, err)) => {
                warn!(published, remaining = pending.len() - published, "event publish failed");
                pending.drain(..published);
                self.outbox = pending;
                Err(err)
            }
            None => Ok(pending.len()),
        }
    }

    fn record(&mut self, event: ShopEvent) {
        self.next_sequence += 1;
        self.outbox.push(EventEnvelope::wrap(self.next_sequence, event));
    }
}

fn book_refunded(line: OrderLine, stock: u64) -> BookRefunded {
    BookRefunded {
        book_id: line.book_id,
        quantity: line.quantity,
        stock,
        occurred_at: Utc::now(),
    }
}
