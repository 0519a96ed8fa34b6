use report_codec::CodecError;

/// Cap on the size of a single frame's envelope bytes.
///
/// A program-run report is a few hundred bytes in practice; 1 MiB leaves
/// room for pathological argument lists while keeping a hostile length
/// prefix from pinning the reader's memory.
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;

/// Errors that can occur while reading or writing framed reports.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The underlying stream failed, including truncation mid-frame.
    #[error("i/o error on report stream: {0}")]
    Io(#[from] std::io::Error),

    /// A frame exceeded [`MAX_FRAME_BYTES`].
    #[error("frame of {len} bytes exceeds the {max}-byte cap")]
    Oversized { len: usize, max: usize },

    /// The frame was delivered intact but its contents failed to decode.
    #[error(transparent)]
    Codec(#[from] CodecError),
}
