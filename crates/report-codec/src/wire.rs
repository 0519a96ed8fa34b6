//! Raw wire-level messages and decode helpers.
//!
//! Every field here is optional so that presence is observable at decode
//! time; the typed records in [`crate::record`] are produced by validating
//! these raw messages.  Numeric identity fields are declared `int64` — the
//! varint encoding is identical to `int32`, which lets the decoder see an
//! out-of-range value instead of silently truncating it.  Text fields are
//! carried as bytes and verified as UTF-8 explicitly.
//!
//! Field tag numbers are part of the wire contract and must never change.
//! Unknown tags inside a message are skipped on decode, so peers can add
//! fields without breaking older consumers.

use crate::error::CodecError;

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct RawTimestamp {
    #[prost(int64, optional, tag = "1")]
    pub seconds: Option<i64>,
    #[prost(int64, optional, tag = "2")]
    pub fraction: Option<i64>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct RawProgramRun {
    #[prost(message, optional, tag = "1")]
    pub timestamp: Option<RawTimestamp>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub arch: Option<Vec<u8>>,
    #[prost(int64, optional, tag = "3")]
    pub syscall: Option<i64>,
    #[prost(bool, optional, tag = "4")]
    pub success: Option<bool>,
    #[prost(int64, optional, tag = "5")]
    pub exit: Option<i64>,
    #[prost(int64, optional, tag = "6")]
    pub pid: Option<i64>,
    #[prost(int64, optional, tag = "7")]
    pub ppid: Option<i64>,
    #[prost(int64, optional, tag = "8")]
    pub uid: Option<i64>,
    #[prost(int64, optional, tag = "9")]
    pub gid: Option<i64>,
    #[prost(int64, optional, tag = "10")]
    pub auid: Option<i64>,
    #[prost(int64, optional, tag = "11")]
    pub euid: Option<i64>,
    #[prost(int64, optional, tag = "12")]
    pub egid: Option<i64>,
    #[prost(int64, optional, tag = "13")]
    pub suid: Option<i64>,
    #[prost(int64, optional, tag = "14")]
    pub sgid: Option<i64>,
    #[prost(int64, optional, tag = "15")]
    pub fsuid: Option<i64>,
    #[prost(int64, optional, tag = "16")]
    pub fsgid: Option<i64>,
    #[prost(bytes = "vec", optional, tag = "17")]
    pub tty: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "18")]
    pub comm: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "19")]
    pub exe: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "20")]
    pub key: Option<Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "21")]
    pub subj: Option<Vec<u8>>,
    #[prost(bytes = "vec", repeated, tag = "22")]
    pub args: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct RawKeepAlive {
    #[prost(message, optional, tag = "1")]
    pub timestamp: Option<RawTimestamp>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct RawEnvelope {
    #[prost(int64, optional, tag = "1")]
    pub message_type: Option<i64>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub payload: Option<Vec<u8>>,
}

/// Unwrap a required field, naming it in the error.
pub(crate) fn require<T>(value: Option<T>, field: &'static str) -> Result<T, CodecError> {
    value.ok_or(CodecError::MissingField(field))
}

/// Unwrap a required 32-bit numeric field, rejecting out-of-range values.
pub(crate) fn require_i32(value: Option<i64>, field: &'static str) -> Result<i32, CodecError> {
    let value = require(value, field)?;
    i32::try_from(value).map_err(|_| CodecError::Range { field, value })
}

/// Verify a text field as UTF-8.
pub(crate) fn utf8(bytes: Vec<u8>, field: &'static str) -> Result<String, CodecError> {
    String::from_utf8(bytes).map_err(|_| CodecError::Encoding(field))
}

/// Verify an optional text field as UTF-8, preserving absence.
pub(crate) fn opt_utf8(
    bytes: Option<Vec<u8>>,
    field: &'static str,
) -> Result<Option<String>, CodecError> {
    bytes.map(|b| utf8(b, field)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_i32_rejects_wide_values() {
        let err = require_i32(Some(1 << 40), "pid").unwrap_err();
        match err {
            CodecError::Range { field, value } => {
                assert_eq!(field, "pid");
                assert_eq!(value, 1 << 40);
            }
            other => panic!("expected Range, got {other:?}"),
        }
    }

    #[test]
    fn require_i32_accepts_negative_values() {
        assert_eq!(require_i32(Some(-1), "exit").unwrap(), -1);
        assert_eq!(require_i32(Some(i32::MIN as i64), "exit").unwrap(), i32::MIN);
    }

    #[test]
    fn utf8_rejects_invalid_bytes() {
        let err = utf8(vec![0xff, 0xfe], "arch").unwrap_err();
        match err {
            CodecError::Encoding(field) => assert_eq!(field, "arch"),
            other => panic!("expected Encoding, got {other:?}"),
        }
    }
}
