//! Inventory domain module.
//!
//! Catalog records and their stock arithmetic, implemented purely as
//! deterministic domain logic (no IO, no storage).

pub mod book;

pub use book::{Book, BookDetails};
