//! Typed persistence over a transactional key-value store.
//!
//! Application types describe where they live ([`Persistable`]) and how they
//! are stored ([`Storable`]); Shelf does the rest. The same read, write and
//! remove operations work for every shape:
//!
//! | `Codec` | `MetadataCodec` | Shape |
//! |---|---|---|
//! | `ObjectCodec` | `NoMetadata` | object payload, no metadata |
//! | `ObjectCodec` | `ObjectCodec` | object payload, object metadata |
//! | `ObjectCodec` | `ValueCodec` | object payload, value metadata |
//! | `ValueCodec` | `NoMetadata` | value payload, no metadata |
//! | `ValueCodec` | `ObjectCodec` | value payload, object metadata |
//! | `ValueCodec` | `ValueCodec` | value payload, value metadata |
//!
//! `JsonCodec` can stand in for `ValueCodec` anywhere.
//!
//! # Entry Points
//!
//! - [`Reader`] / [`Writer`] -- inside a transaction the caller already holds
//! - [`ConnectionReader`] / [`ConnectionWriter`] -- one transaction per call,
//!   with `async_*` variants completing on an [`ExecutionContext`]
//!
//! # Example
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use shelf::{
//!     ConnectionReader, ConnectionWriter, InMemoryDatabase, NoMetadata, Persistable, Storable,
//!     ValueCodec,
//! };
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Barcode {
//!     code: u64,
//! }
//!
//! impl Persistable for Barcode {
//!     const COLLECTION: &'static str = "barcodes";
//!
//!     fn key(&self) -> String {
//!         self.code.to_string()
//!     }
//! }
//!
//! impl Storable for Barcode {
//!     type Codec = ValueCodec;
//!     type Metadata = ();
//!     type MetadataCodec = NoMetadata;
//! }
//!
//! let db = InMemoryDatabase::new();
//! let conn = db.connection()?;
//! conn.write_item(Barcode { code: 42 })?;
//! assert_eq!(conn.read_by_key::<Barcode>("42")?, Some(Barcode { code: 42 }));
//! # Ok::<(), shelf::ShelfError>(())
//! ```

pub mod connection;
pub mod engine;
pub mod error;
pub mod read;
pub mod write;

#[cfg(test)]
mod fixtures;

pub use connection::{ConnectionReader, ConnectionWriter};
pub use engine::{decode_item, encode_item};
pub use error::{ShelfError, ShelfResult};
pub use read::Reader;
pub use write::Writer;

// Re-export the building blocks so applications need only this crate.
pub use shelf_codec::{
    shape_name, Codec, CodecError, JsonCodec, MetadataCodec, NoMetadata, ObjectCodec, Storable,
    ValueCodec,
};
pub use shelf_store::{
    Connection, ExecutionContext, InMemoryDatabase, Inline, MemoryConnection, ReadTransaction,
    StoreConfig, StoreError, WriteTransaction,
};
pub use shelf_types::{Index, Persistable, RawValue};
