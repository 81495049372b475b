//! Payload and metadata codecs for Shelf.
//!
//! A persistable type picks one payload strategy and one metadata strategy;
//! together they form its *shape*. Shapes are chosen at compile time through
//! the associated types of [`Storable`], so every read and write path in Shelf
//! is written once and monomorphised per type.
//!
//! | Strategy        | Payload | Metadata |
//! |-----------------|---------|----------|
//! | [`ObjectCodec`] | stored as a shared object | stored as a shared object |
//! | [`ValueCodec`]  | encoded with bincode | encoded with bincode |
//! | [`JsonCodec`]   | encoded as JSON | encoded as JSON |
//! | [`NoMetadata`]  | - | never read or written |
//!
//! Decoding is total: anything missing or malformed decodes to `None`.

pub mod codec;
pub mod error;
pub mod metadata;
pub mod storable;

pub use codec::{Codec, JsonCodec, ObjectCodec, ValueCodec};
pub use error::{CodecError, Result};
pub use metadata::{MetadataCodec, NoMetadata};
pub use storable::{shape_name, Storable};
