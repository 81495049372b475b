use thiserror::Error;

/// Errors raised while turning a value into its stored form.
///
/// Decoding never errors: a value that cannot be decoded reads as absent.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The serializer refused the value.
    #[error("failed to encode {type_name} with {codec}: {reason}")]
    Encode {
        type_name: &'static str,
        codec: &'static str,
        reason: String,
    },
}

/// Convenience alias used throughout the codec crate.
pub type Result<T> = std::result::Result<T, CodecError>;
