//! Transactional key-value capabilities for Shelf.
//!
//! The typed persistence layer never talks to a concrete database. It works
//! against three capability traits defined here:
//!
//! - [`ReadTransaction`] -- point reads, metadata reads and key enumeration
//! - [`WriteTransaction`] -- puts and removals inside one atomic commit
//! - [`Connection`] -- opens transactions, synchronously or queued to a
//!   background writer with a completion on an [`ExecutionContext`]
//!
//! # Storage Backends
//!
//! - [`InMemoryDatabase`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. A write transaction commits all of its changes or none of them.
//! 2. One write transaction runs at a time per database.
//! 3. Reads inside a write transaction see that transaction's own changes.
//! 4. Queued transactions on one connection run in submission order.
//! 5. The store never interprets payloads or metadata.

pub mod config;
pub mod context;
pub mod error;
pub mod memory;
pub mod traits;
mod transaction;

// Re-export primary types at crate root for ergonomic imports.
pub use config::StoreConfig;
pub use context::{ExecutionContext, Inline, Job};
pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryDatabase, MemoryConnection};
pub use traits::{Connection, ReadTransaction, WriteTransaction};
