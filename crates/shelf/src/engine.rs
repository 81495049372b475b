//! The single encode/decode path shared by every shape.

use shelf_codec::{Codec, MetadataCodec, Storable};
use shelf_types::RawValue;
use tracing::debug;

use crate::error::ShelfResult;

/// Rebuild an item from its raw payload and metadata slots.
///
/// `None` when the payload is missing or does not decode. Missing or
/// undecodable metadata leaves the item's metadata empty.
pub fn decode_item<T: Storable>(
    payload: Option<&RawValue>,
    metadata: Option<&RawValue>,
) -> Option<T> {
    let mut item = <T::Codec as Codec<T>>::decode(payload)?;
    if stores_metadata::<T>() {
        item.set_metadata(<T::MetadataCodec as MetadataCodec<T::Metadata>>::decode_metadata(
            metadata,
        ));
    }
    Some(item)
}

/// Split an item into the raw payload and metadata slots it is stored as.
pub fn encode_item<T: Storable>(item: &T) -> ShelfResult<(RawValue, Option<RawValue>)> {
    let payload = <T::Codec as Codec<T>>::encode(item)?;
    let metadata =
        <T::MetadataCodec as MetadataCodec<T::Metadata>>::encode_metadata(item.metadata())?;
    if metadata.is_none() && stores_metadata::<T>() {
        debug!(
            collection = T::COLLECTION,
            key = %item.key(),
            "item has no metadata; writing an empty metadata slot"
        );
    }
    Ok((payload, metadata))
}

/// Whether `T` has a metadata slot at all.
pub fn stores_metadata<T: Storable>() -> bool {
    <T::MetadataCodec as MetadataCodec<T::Metadata>>::STORES_METADATA
}
