use std::any::Any;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

/// The unit a store holds for a payload or a metadata slot.
///
/// The store never interprets a `RawValue`. Object-backed items are kept as a
/// shared, type-erased value; value-backed items are kept as encoded bytes.
#[derive(Clone)]
pub enum RawValue {
    /// A live value held by shared reference.
    Object(Arc<dyn Any + Send + Sync>),
    /// Bytes produced by a value coder.
    Encoded(Bytes),
}

impl RawValue {
    /// Wrap a value for object-backed storage.
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Self::Object(Arc::new(value))
    }

    /// Wrap encoded bytes.
    pub fn encoded(bytes: impl Into<Bytes>) -> Self {
        Self::Encoded(bytes.into())
    }

    /// Borrow the held object as `T`, if this is an object of that type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Object(object) => object.downcast_ref::<T>(),
            Self::Encoded(_) => None,
        }
    }

    /// The encoded bytes, if this is an encoded value.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Encoded(bytes) => Some(bytes),
            Self::Object(_) => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Size in bytes for encoded values; `None` for objects.
    pub fn encoded_len(&self) -> Option<usize> {
        self.as_bytes().map(Bytes::len)
    }
}

impl fmt::Debug for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(_) => f.write_str("RawValue::Object(..)"),
            Self::Encoded(bytes) => write!(f, "RawValue::Encoded({} bytes)", bytes.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note(String);

    #[test]
    fn object_downcasts_to_its_own_type_only() {
        let raw = RawValue::object(Note("hello".into()));
        assert!(raw.is_object());
        assert_eq!(raw.downcast_ref::<Note>(), Some(&Note("hello".into())));
        assert!(raw.downcast_ref::<String>().is_none());
        assert!(raw.as_bytes().is_none());
        assert_eq!(raw.encoded_len(), None);
    }

    #[test]
    fn encoded_exposes_bytes() {
        let raw = RawValue::encoded(vec![1u8, 2, 3]);
        assert!(!raw.is_object());
        assert_eq!(raw.as_bytes().map(|b| b.as_ref()), Some(&[1u8, 2, 3][..]));
        assert_eq!(raw.encoded_len(), Some(3));
        assert!(raw.downcast_ref::<Note>().is_none());
    }

    #[test]
    fn clones_share_the_object() {
        let raw = RawValue::object(Note("shared".into()));
        let copy = raw.clone();
        match (&raw, &copy) {
            (RawValue::Object(a), RawValue::Object(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("expected objects"),
        }
    }

    #[test]
    fn debug_hides_contents() {
        assert_eq!(
            format!("{:?}", RawValue::encoded(vec![0u8; 4])),
            "RawValue::Encoded(4 bytes)"
        );
        assert_eq!(
            format!("{:?}", RawValue::object(1u32)),
            "RawValue::Object(..)"
        );
    }
}
