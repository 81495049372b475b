use shelf_types::Persistable;

use crate::codec::Codec;
use crate::metadata::MetadataCodec;

/// The shape of a persistable type: how its payload and metadata are stored.
///
/// A shape is a choice of payload codec ([`ObjectCodec`](crate::ObjectCodec),
/// [`ValueCodec`](crate::ValueCodec), [`JsonCodec`](crate::JsonCodec)) and
/// metadata codec ([`NoMetadata`](crate::NoMetadata) or any payload codec).
/// Every read and write path is written once against this trait.
///
/// Metadata lives in its own slot, so value-backed types should keep their
/// metadata field out of the payload encoding (for serde, `#[serde(skip)]`).
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use shelf_codec::{NoMetadata, Storable, ValueCodec};
/// use shelf_types::Persistable;
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct Barcode {
///     code: u64,
/// }
///
/// impl Persistable for Barcode {
///     const COLLECTION: &'static str = "barcodes";
///
///     fn key(&self) -> String {
///         self.code.to_string()
///     }
/// }
///
/// impl Storable for Barcode {
///     type Codec = ValueCodec;
///     type Metadata = ();
///     type MetadataCodec = NoMetadata;
/// }
/// ```
pub trait Storable: Persistable + Sized {
    /// Strategy for the payload slot.
    type Codec: Codec<Self>;

    /// Metadata carried next to the item. Use `()` when there is none.
    type Metadata;

    /// Strategy for the metadata slot.
    type MetadataCodec: MetadataCodec<Self::Metadata>;

    /// The item's current metadata.
    ///
    /// The default returns `None`. A type with a metadata codec other than
    /// [`NoMetadata`](crate::NoMetadata) must override this and
    /// [`Storable::set_metadata`], or its metadata is silently never written
    /// or read back.
    fn metadata(&self) -> Option<&Self::Metadata> {
        None
    }

    /// Replace the item's metadata with what was read from the store.
    ///
    /// The default discards it.
    fn set_metadata(&mut self, _metadata: Option<Self::Metadata>) {}
}

/// Human-readable `payload/metadata` shape of `T`, e.g. `bincode/none`.
pub fn shape_name<T: Storable>() -> String {
    format!(
        "{}/{}",
        <T::Codec as Codec<T>>::NAME,
        <T::MetadataCodec as MetadataCodec<T::Metadata>>::NAME
    )
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::{JsonCodec, NoMetadata, ObjectCodec, ValueCodec};

    #[derive(Clone, Serialize, Deserialize)]
    struct Barcode {
        code: u64,
    }

    impl Persistable for Barcode {
        const COLLECTION: &'static str = "barcodes";

        fn key(&self) -> String {
            self.code.to_string()
        }
    }

    impl Storable for Barcode {
        type Codec = ValueCodec;
        type Metadata = ();
        type MetadataCodec = NoMetadata;
    }

    #[derive(Clone, Serialize, Deserialize)]
    struct Revision(u32);

    #[derive(Clone)]
    struct Document {
        id: String,
        revision: Option<Revision>,
    }

    impl Persistable for Document {
        const COLLECTION: &'static str = "documents";

        fn key(&self) -> String {
            self.id.clone()
        }
    }

    impl Storable for Document {
        type Codec = ObjectCodec;
        type Metadata = Revision;
        type MetadataCodec = JsonCodec;

        fn metadata(&self) -> Option<&Revision> {
            self.revision.as_ref()
        }

        fn set_metadata(&mut self, metadata: Option<Revision>) {
            self.revision = metadata;
        }
    }

    #[test]
    fn default_metadata_accessors_are_empty() {
        let mut barcode = Barcode { code: 1 };
        assert!(barcode.metadata().is_none());
        barcode.set_metadata(Some(()));
        assert!(barcode.metadata().is_none());
    }

    #[test]
    fn metadata_accessors_round_trip() {
        let mut doc = Document {
            id: "d".into(),
            revision: None,
        };
        doc.set_metadata(Some(Revision(2)));
        assert_eq!(doc.metadata().map(|r| r.0), Some(2));
        assert_eq!(doc.index().collection(), "documents");
    }

    #[test]
    fn shape_names() {
        assert_eq!(shape_name::<Barcode>(), "bincode/none");
        assert_eq!(shape_name::<Document>(), "object/json");
    }
}
