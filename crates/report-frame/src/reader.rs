use std::io::ErrorKind;

use tokio::io::{AsyncRead, AsyncReadExt};

use report_codec::{Envelope, Report};

use crate::frame::{FrameError, MAX_FRAME_BYTES};

/// Consumer side of a framed report stream.
///
/// Yields complete envelopes one at a time; the length prefix keeps the
/// stream in sync, so a payload that fails higher-level decoding does not
/// poison the frames after it.
pub struct ReportReader<R> {
    inner: R,
}

impl<R: AsyncRead + Unpin> ReportReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read the next envelope, or `None` at clean end-of-stream.
    ///
    /// End-of-stream at a frame boundary is a normal termination.  Running
    /// dry inside a frame — partway through its length prefix or its
    /// payload — is truncation and surfaces as [`FrameError::Io`].  A
    /// length prefix above [`MAX_FRAME_BYTES`] is refused before any
    /// payload is read.
    pub async fn recv_envelope(&mut self) -> Result<Option<Envelope>, FrameError> {
        // The first prefix byte is read on its own: end-of-stream there is
        // the clean termination, while running dry on the remaining three
        // bytes means the prefix itself was cut short.
        let first = match self.inner.read_u8().await {
            Ok(byte) => byte,
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut rest = [0u8; 3];
        self.inner.read_exact(&mut rest).await?;
        let len = u32::from_be_bytes([first, rest[0], rest[1], rest[2]]) as usize;

        if len > MAX_FRAME_BYTES {
            return Err(FrameError::Oversized {
                len,
                max: MAX_FRAME_BYTES,
            });
        }

        let mut bytes = vec![0u8; len];
        self.inner.read_exact(&mut bytes).await?;

        let envelope = Envelope::decode(&bytes)?;
        tracing::trace!(
            len,
            message_type = envelope.message_type,
            "received report frame"
        );
        Ok(Some(envelope))
    }

    /// Read and fully decode the next report, or `None` at end-of-stream.
    pub async fn recv(&mut self) -> Result<Option<Report>, FrameError> {
        match self.recv_envelope().await? {
            Some(envelope) => Ok(Some(envelope.report()?)),
            None => Ok(None),
        }
    }

    /// Consume the reader, returning the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}
