//! The shop: sole authority over stock and order status, and the consumer
//! façade that places orders against it.

pub mod config;
pub mod consumer;
pub mod event;
pub mod shop;

pub use config::{ConfigError, RefundPolicy, ShopConfig};
pub use consumer::Consumer;
pub use event::ShopEvent;
pub use shop::Shop;
