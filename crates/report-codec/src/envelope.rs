//! The outer tagged message and the decoded report variant.

use prost::Message;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::record::{KeepAlive, ProgramRun};
use crate::wire::{self, RawEnvelope};

/// Envelope discriminant: UTF-8 error text.
pub const MESSAGE_TYPE_ERROR: i32 = 0;
/// Envelope discriminant: [`ProgramRun`] payload.
pub const MESSAGE_TYPE_PROGRAM_RUN: i32 = 1;
/// Envelope discriminant: [`KeepAlive`] payload.
pub const MESSAGE_TYPE_KEEP_ALIVE: i32 = 2;

/// Transport framing for report messages: a discriminant plus opaque
/// payload bytes whose layout the discriminant fully determines.
///
/// An envelope is transient — built per message, carried by whatever
/// transport the caller chooses, and unpacked with [`Envelope::report`] on
/// the far side.  The payload must never be interpreted without checking
/// the tag first; `report` does exactly that dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub message_type: i32,
    pub payload: Vec<u8>,
}

impl Envelope {
    /// Wrap a [`ProgramRun`] record, validating it first.
    ///
    /// The only validation failure a typed record can still produce is the
    /// argument cap ([`CodecError::LimitExceeded`]).
    pub fn program_run(record: &ProgramRun) -> Result<Self, CodecError> {
        Ok(Self {
            message_type: MESSAGE_TYPE_PROGRAM_RUN,
            payload: record.to_payload()?,
        })
    }

    /// Wrap a [`KeepAlive`] record.
    pub fn keep_alive(record: &KeepAlive) -> Self {
        Self {
            message_type: MESSAGE_TYPE_KEEP_ALIVE,
            payload: record.to_payload(),
        }
    }

    /// Wrap error text.
    ///
    /// This is how a processing failure travels back over the same channel
    /// instead of terminating it: the error report is itself an ordinary,
    /// transportable message.
    pub fn error(text: &str) -> Self {
        Self {
            message_type: MESSAGE_TYPE_ERROR,
            payload: text.as_bytes().to_vec(),
        }
    }

    /// Serialise the envelope itself.
    pub fn encode(&self) -> Vec<u8> {
        RawEnvelope {
            message_type: Some(i64::from(self.message_type)),
            payload: Some(self.payload.clone()),
        }
        .encode_to_vec()
    }

    /// Decode an envelope from bytes.
    ///
    /// Both fields are required.  An unknown discriminant is a hard error
    /// here — the decoder never guesses a payload interpretation — while
    /// unknown *field tags* inside the envelope are skipped for forward
    /// compatibility.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let raw = RawEnvelope::decode(bytes)?;
        let message_type = wire::require(raw.message_type, "message_type")?;
        if !(0..=2).contains(&message_type) {
            return Err(CodecError::UnknownType(message_type));
        }
        Ok(Self {
            message_type: message_type as i32,
            payload: wire::require(raw.payload, "payload")?,
        })
    }

    /// Dispatch on the discriminant and decode the payload.
    pub fn report(&self) -> Result<Report, CodecError> {
        match self.message_type {
            MESSAGE_TYPE_ERROR => Ok(Report::ErrorText(wire::utf8(
                self.payload.clone(),
                "payload",
            )?)),
            MESSAGE_TYPE_PROGRAM_RUN => {
                Ok(Report::ProgramRun(ProgramRun::from_payload(&self.payload)?))
            }
            MESSAGE_TYPE_KEEP_ALIVE => {
                Ok(Report::KeepAlive(KeepAlive::from_payload(&self.payload)?))
            }
            other => Err(CodecError::UnknownType(i64::from(other))),
        }
    }
}

/// A decoded report: the closed set of payload kinds an envelope can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "report", rename_all = "snake_case")]
pub enum Report {
    /// A peer-reported processing failure.
    ErrorText(String),
    ProgramRun(ProgramRun),
    KeepAlive(KeepAlive),
}

impl Report {
    /// The envelope discriminant this variant travels under.
    pub fn message_type(&self) -> i32 {
        match self {
            Report::ErrorText(_) => MESSAGE_TYPE_ERROR,
            Report::ProgramRun(_) => MESSAGE_TYPE_PROGRAM_RUN,
            Report::KeepAlive(_) => MESSAGE_TYPE_KEEP_ALIVE,
        }
    }
}
