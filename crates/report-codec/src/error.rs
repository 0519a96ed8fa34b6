/// Errors that can occur while encoding or decoding report messages.
///
/// The taxonomy is closed: every failure a peer can provoke maps to exactly
/// one of these variants, and all of them are returned to the immediate
/// caller rather than tearing down the channel.  A consumer that wants to
/// report a failure back to its peer wraps the message in an error-type
/// envelope ([`Envelope::error`](crate::Envelope::error)) instead of
/// disconnecting.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A field the wire contract marks required was absent.
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    /// A numeric field carried a value outside its declared 32-bit width.
    #[error("field `{field}` value {value} does not fit in 32 bits")]
    Range { field: &'static str, value: i64 },

    /// A text field carried bytes that are not valid UTF-8.
    #[error("field `{0}` is not valid UTF-8")]
    Encoding(&'static str),

    /// The argument list exceeded the documented cap.
    #[error("argument list has {count} entries, exceeding the cap of {max}")]
    LimitExceeded { count: usize, max: usize },

    /// The envelope discriminant was outside the known set {0, 1, 2}.
    #[error("unknown message type {0}")]
    UnknownType(i64),

    /// The bytes were structurally malformed (truncated, bad wire type, ...).
    #[error("malformed message: {0}")]
    Decode(#[from] prost::DecodeError),
}
