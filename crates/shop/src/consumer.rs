use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use bookshop_core::{BookId, CartId, ConsumerId, Entity, OrderId, ShopError, ShopResult};
use bookshop_inventory::Book;
use bookshop_sales::{Cart, Order, OrderStatus, RefundOption};

use crate::shop::Shop;

/// A shopper: a cart plus the ids of the orders they placed.
///
/// The consumer never holds on to a shop. Operations that need one take it
/// as a parameter, so any number of consumers can use the same shop one call
/// at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
    id: ConsumerId,
    cart: Cart,
    orders: Vec<OrderId>,
}

impl Consumer {
    pub fn new(id: ConsumerId, cart_id: CartId) -> Self {
        Self {
            id,
            cart: Cart::new(cart_id),
            orders: Vec::new(),
        }
    }

    /// Start over with an empty cart; whatever was staged is dropped.
    pub fn make_cart(&mut self, cart_id: CartId) {
        self.cart = Cart::new(cart_id);
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn books_in_cart(&self) -> &[BookId] {
        self.cart.books_in_cart()
    }

    /// Order ids in the order they were placed.
    pub fn orders(&self) -> &[OrderId] {
        &self.orders
    }

    /// Stage a book in the cart if `shop` lists it.
    pub fn add_book(&mut self, shop: &Shop, book: &Book) -> ShopResult<()> {
        if !shop.has_book(book.id()) {
            return Err(ShopError::UnknownBook(book.id()));
        }
        self.cart.add_book(book);
        Ok(())
    }

    /// Turn the cart into an order of one copy per entry and hand it to `shop`.
    ///
    /// With the default [`ShopConfig`](crate::ShopConfig) the cart is cleared
    /// and `order_id` is appended to [`Consumer::orders`] whether or not the
    /// shop accepts the order. Set `record_rejected_orders` to `false` to
    /// leave both untouched on rejection.
    pub fn make_order(&mut self, shop: &mut Shop, order_id: OrderId) -> ShopResult<OrderId> {
        let order = Order::new(order_id, self.cart.to_lines());
        let result = shop.make_order(order);

        if result.is_ok() || shop.config().record_rejected_orders {
            self.cart.clear();
            self.orders.push(order_id);
        }

        match result {
            Ok(()) => {
                debug!(consumer_id = %self.id, order_id = %order_id, "order placed");
                Ok(order_id)
            }
            Err(err) => {
                warn!(consumer_id = %self.id, order_id = %order_id, error = %err, "order not placed");
                Err(err)
            }
        }
    }

    /// Status of one of this consumer's orders.
    ///
    /// Ids this consumer never placed report `NotCreated`, even when the
    /// shop holds an order under that id for someone else.
    pub fn status(&self, shop: &Shop, order_id: OrderId) -> OrderStatus {
        if !self.orders.contains(&order_id) {
            return OrderStatus::NotCreated;
        }
        shop.order(order_id)
            .map(|order| order.status())
            .unwrap_or(OrderStatus::NotCreated)
    }

    /// Ask `shop` to refund an order.
    pub fn refund(
        &self,
        shop: &mut Shop,
        order_id: OrderId,
        option: RefundOption,
    ) -> ShopResult<()> {
        shop.refund_order(order_id, option)
    }
}

impl Entity for Consumer {
    type Id = ConsumerId;

    fn id(&self) -> ConsumerId {
        self.id
    }
}
