//! Wire codec for snitch audit reports.
//!
//! This crate defines the three record kinds produced by a process-execution
//! auditing pipeline — [`ProgramRun`], [`KeepAlive`], and free-form error
//! text — together with the tagged [`Envelope`] that frames them for
//! transport.  Encoding is a tagged-field varint format with stable field
//! numbers, so independently built producers and consumers interoperate as
//! long as they preserve the tags.
//!
//! The codec is pure and stateless: every operation is a plain function of
//! its inputs, each envelope is a complete, independently decodable unit,
//! and values can be encoded or decoded concurrently from any number of
//! threads.  Delivery of complete byte buffers is the transport's job (see
//! the `report-frame` crate for the length-delimited framing used here).
//!
//! # Quick start
//!
//! ```rust
//! use report_codec::{Envelope, KeepAlive, Report};
//!
//! // Producer side: wrap a record and serialise the envelope.
//! let envelope = Envelope::keep_alive(&KeepAlive::now());
//! let bytes = envelope.encode();
//!
//! // Consumer side: decode the envelope, then dispatch on its tag.
//! let report = Envelope::decode(&bytes).unwrap().report().unwrap();
//! match report {
//!     Report::KeepAlive(_) => {}
//!     other => panic!("expected keep-alive, got {:?}", other),
//! }
//! ```

pub mod envelope;
pub mod error;
pub mod record;
pub mod timestamp;
mod wire;

// Re-export primary public types at the crate root for convenience.
pub use envelope::{
    Envelope, Report, MESSAGE_TYPE_ERROR, MESSAGE_TYPE_KEEP_ALIVE, MESSAGE_TYPE_PROGRAM_RUN,
};
pub use error::CodecError;
pub use record::{KeepAlive, ProgramRun, MAX_ARGS};
pub use timestamp::Timestamp;
