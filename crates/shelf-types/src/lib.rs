//! Foundation types for Shelf.
//!
//! Shelf maps strongly-typed domain values onto a collection/key addressed
//! transactional store. This crate holds the vocabulary every other Shelf
//! crate shares.
//!
//! # Key Types
//!
//! - [`Index`] -- collection + key address of one stored item
//! - [`Persistable`] -- a type that can produce its own collection, key and index
//! - [`RawValue`] -- what a store actually holds in a payload or metadata slot

pub mod error;
pub mod index;
pub mod persistable;
pub mod raw;

pub use error::TypeError;
pub use index::Index;
pub use persistable::Persistable;
pub use raw::RawValue;
