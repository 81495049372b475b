use std::any::{type_name, Any};

use serde::de::DeserializeOwned;
use serde::Serialize;
use shelf_types::RawValue;
use tracing::debug;

use crate::error::{CodecError, Result};

/// A strategy converting `T` to and from the store's [`RawValue`].
///
/// `decode` returns `None` both when nothing is stored and when what is
/// stored cannot be turned back into a `T`; the two cases are deliberately
/// indistinguishable to callers. For every well-formed `v`,
/// `decode(Some(&encode(&v)?)) == Some(v)`.
pub trait Codec<T> {
    /// Short name used in logs and errors.
    const NAME: &'static str;

    fn encode(value: &T) -> Result<RawValue>;

    fn decode(raw: Option<&RawValue>) -> Option<T>;
}

/// Object-backed storage: the value itself is held by the store.
///
/// The store keeps an immutable shared clone, so later changes to the
/// caller's copy never leak into what was written.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectCodec;

impl<T> Codec<T> for ObjectCodec
where
    T: Any + Clone + Send + Sync,
{
    const NAME: &'static str = "object";

    fn encode(value: &T) -> Result<RawValue> {
        Ok(RawValue::object(value.clone()))
    }

    fn decode(raw: Option<&RawValue>) -> Option<T> {
        let raw = raw?;
        let value = raw.downcast_ref::<T>().cloned();
        if value.is_none() {
            debug!(
                expected = type_name::<T>(),
                found = ?raw,
                "stored value is not the expected object; treating as absent"
            );
        }
        value
    }
}

/// Value-backed storage through `bincode`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCodec;

impl<T> Codec<T> for ValueCodec
where
    T: Serialize + DeserializeOwned,
{
    const NAME: &'static str = "bincode";

    fn encode(value: &T) -> Result<RawValue> {
        bincode::serialize(value)
            .map(RawValue::encoded)
            .map_err(|e| encode_error::<T>(<Self as Codec<T>>::NAME, e.to_string()))
    }

    fn decode(raw: Option<&RawValue>) -> Option<T> {
        let bytes = encoded_bytes::<T>(raw?)?;
        match bincode::deserialize(bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(
                    ty = type_name::<T>(),
                    error = %e,
                    "bincode decode failed; treating as absent"
                );
                None
            }
        }
    }
}

/// Value-backed storage through `serde_json`, for stores that humans inspect.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    const NAME: &'static str = "json";

    fn encode(value: &T) -> Result<RawValue> {
        serde_json::to_vec(value)
            .map(RawValue::encoded)
            .map_err(|e| encode_error::<T>(<Self as Codec<T>>::NAME, e.to_string()))
    }

    fn decode(raw: Option<&RawValue>) -> Option<T> {
        let bytes = encoded_bytes::<T>(raw?)?;
        match serde_json::from_slice(bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(
                    ty = type_name::<T>(),
                    error = %e,
                    "json decode failed; treating as absent"
                );
                None
            }
        }
    }
}

fn encoded_bytes<T>(raw: &RawValue) -> Option<&[u8]> {
    let bytes = raw.as_bytes().map(|b| b.as_ref());
    if bytes.is_none() {
        debug!(
            ty = type_name::<T>(),
            "stored value is an object, not encoded bytes; treating as absent"
        );
    }
    bytes
}

fn encode_error<T>(codec: &'static str, reason: String) -> CodecError {
    CodecError::Encode {
        type_name: type_name::<T>(),
        codec,
        reason,
    }
}
