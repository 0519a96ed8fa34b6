use std::time::{Duration, SystemTime, UNIX_EPOCH};

use prost::Message;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::wire::{self, RawTimestamp};

/// A high-precision point in time: whole seconds relative to the Unix epoch
/// plus a sub-second component.
///
/// Both fields are mandatory on the wire.  The codec carries `fraction`
/// opaquely — its unit is a producer convention that peers must agree on
/// out of band.  Producers in this repository (see [`Timestamp::now`]) use
/// nanoseconds.
///
/// Ordering is lexicographic on `(seconds, fraction)`, which the derived
/// `Ord` provides through field order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp {
    pub seconds: i64,
    pub fraction: i64,
}

impl Timestamp {
    pub fn new(seconds: i64, fraction: i64) -> Self {
        Self { seconds, fraction }
    }

    /// Capture the current wall-clock time with a nanosecond fraction.
    ///
    /// A clock set before the Unix epoch saturates to zero; a heartbeat with
    /// a nonsense-but-valid timestamp beats no heartbeat at all.
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);

        Self {
            seconds: since_epoch.as_secs() as i64,
            fraction: i64::from(since_epoch.subsec_nanos()),
        }
    }

    /// Serialise this timestamp as a standalone message.
    pub fn to_bytes(&self) -> Vec<u8> {
        RawTimestamp::from(*self).encode_to_vec()
    }

    /// Decode a standalone timestamp message.
    ///
    /// Fails with [`CodecError::MissingField`] if either component is
    /// absent, and [`CodecError::Decode`] on structurally malformed bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        RawTimestamp::decode(bytes)?.try_into()
    }
}

impl From<Timestamp> for RawTimestamp {
    fn from(ts: Timestamp) -> Self {
        Self {
            seconds: Some(ts.seconds),
            fraction: Some(ts.fraction),
        }
    }
}

impl TryFrom<RawTimestamp> for Timestamp {
    type Error = CodecError;

    fn try_from(raw: RawTimestamp) -> Result<Self, CodecError> {
        Ok(Self {
            seconds: wire::require(raw.seconds, "seconds")?,
            fraction: wire::require(raw.fraction, "fraction")?,
        })
    }
}
