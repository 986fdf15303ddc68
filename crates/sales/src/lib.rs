//! Sales domain module: carts and orders.
//!
//! Carts stage book references for a consumer; orders are the immutable
//! line lists the shop reserves stock for. Neither checks stock; that is
//! the shop's job.

pub mod cart;
pub mod order;

pub use cart::Cart;
pub use order::{Order, OrderLine, OrderStatus, RefundOption};
