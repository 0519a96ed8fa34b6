//! Length-delimited framing for snitch report streams.
//!
//! The codec in `report-codec` turns records into self-contained envelope
//! bytes; this crate supplies the message boundaries.  Each envelope
//! travels as a 4-byte big-endian length prefix followed by the envelope
//! bytes, over any `AsyncRead`/`AsyncWrite` pair the caller chooses — a
//! socket, a pipe, a file.  Frames above [`MAX_FRAME_BYTES`] are refused on
//! both sides.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use report_frame::{ReportReader, ReportWriter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let stream = tokio::net::TcpStream::connect("127.0.0.1:7700").await?;
//! let (read_half, write_half) = stream.into_split();
//!
//! let mut writer = ReportWriter::new(write_half);
//! writer.send_keep_alive().await?;
//!
//! let mut reader = ReportReader::new(read_half);
//! while let Some(report) = reader.recv().await? {
//!     println!("{report:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod frame;
pub mod reader;
pub mod writer;

// Re-export primary public types at the crate root for convenience.
pub use frame::{FrameError, MAX_FRAME_BYTES};
pub use reader::ReportReader;
pub use writer::ReportWriter;
