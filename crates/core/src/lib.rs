//! `bookshop-core` — identifiers, the id generator and the shared error type.
//!
//! This crate contains no shop behavior; it is the vocabulary the other
//! bookshop crates share.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{ShopError, ShopResult};
pub use id::{BookId, CartId, ConsumerId, IdGenerator, OrderId};
