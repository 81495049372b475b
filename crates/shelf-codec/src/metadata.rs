use shelf_types::RawValue;

use crate::codec::{Codec, JsonCodec, ObjectCodec, ValueCodec};
use crate::error::Result;

/// A strategy for the metadata slot stored alongside an item.
///
/// Any payload [`Codec`] doubles as a metadata strategy. [`NoMetadata`] is the
/// strategy for shapes that never touch the metadata slot at all.
pub trait MetadataCodec<M> {
    /// Short name used in logs.
    const NAME: &'static str;

    /// Whether reads should fetch the metadata slot.
    const STORES_METADATA: bool = true;

    /// Encode an item's metadata; `None` leaves the slot empty.
    fn encode_metadata(metadata: Option<&M>) -> Result<Option<RawValue>>;

    /// Decode the metadata slot. Missing or malformed metadata is `None`.
    fn decode_metadata(raw: Option<&RawValue>) -> Option<M>;
}

/// Metadata strategy for shapes without metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl<M> MetadataCodec<M> for NoMetadata {
    const NAME: &'static str = "none";
    const STORES_METADATA: bool = false;

    fn encode_metadata(_metadata: Option<&M>) -> Result<Option<RawValue>> {
        Ok(None)
    }

    fn decode_metadata(_raw: Option<&RawValue>) -> Option<M> {
        None
    }
}

macro_rules! metadata_via_codec {
    ($($codec:ty),+ $(,)?) => {
        $(
            impl<M> MetadataCodec<M> for $codec
            where
                $codec: Codec<M>,
            {
                const NAME: &'static str = <$codec as Codec<M>>::NAME;

                fn encode_metadata(metadata: Option<&M>) -> Result<Option<RawValue>> {
                    metadata.map(<$codec as Codec<M>>::encode).transpose()
                }

                fn decode_metadata(raw: Option<&RawValue>) -> Option<M> {
                    <$codec as Codec<M>>::decode(raw)
                }
            }
        )+
    };
}

metadata_via_codec!(ObjectCodec, ValueCodec, JsonCodec);
