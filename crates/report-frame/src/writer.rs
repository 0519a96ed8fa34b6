use tokio::io::{AsyncWrite, AsyncWriteExt};

use report_codec::{Envelope, KeepAlive, ProgramRun};

use crate::frame::{FrameError, MAX_FRAME_BYTES};

/// Producer side of a framed report stream.
///
/// Writes each envelope as a big-endian `u32` length prefix followed by the
/// envelope bytes, flushing after every frame so keep-alives actually reach
/// an idle peer.
pub struct ReportWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> ReportWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Frame and send one envelope.
    pub async fn send(&mut self, envelope: &Envelope) -> Result<(), FrameError> {
        let bytes = envelope.encode();
        if bytes.len() > MAX_FRAME_BYTES {
            return Err(FrameError::Oversized {
                len: bytes.len(),
                max: MAX_FRAME_BYTES,
            });
        }

        self.inner.write_u32(bytes.len() as u32).await?;
        self.inner.write_all(&bytes).await?;
        self.inner.flush().await?;

        tracing::trace!(
            len = bytes.len(),
            message_type = envelope.message_type,
            "sent report frame"
        );
        Ok(())
    }

    /// Validate, wrap, and send a program-run record.
    pub async fn send_program_run(&mut self, record: &ProgramRun) -> Result<(), FrameError> {
        self.send(&Envelope::program_run(record)?).await
    }

    /// Send a keep-alive stamped with the current wall-clock time.
    pub async fn send_keep_alive(&mut self) -> Result<(), FrameError> {
        self.send(&Envelope::keep_alive(&KeepAlive::now())).await
    }

    /// Report a processing failure to the peer over the same channel.
    pub async fn send_error(&mut self, text: &str) -> Result<(), FrameError> {
        self.send(&Envelope::error(text)).await
    }

    /// Consume the writer, returning the underlying stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_codec::{Timestamp, MESSAGE_TYPE_KEEP_ALIVE};

    #[tokio::test]
    async fn frames_carry_a_big_endian_length_prefix() {
        let mut writer = ReportWriter::new(Vec::new());
        let envelope = Envelope::keep_alive(&KeepAlive::new(Timestamp::new(1, 2)));
        writer.send(&envelope).await.unwrap();

        let out = writer.into_inner();
        let body = envelope.encode();
        assert_eq!(out[..4], (body.len() as u32).to_be_bytes());
        assert_eq!(out[4..], body[..]);
    }

    #[tokio::test]
    async fn oversized_envelope_is_refused() {
        let mut writer = ReportWriter::new(Vec::new());
        let envelope = Envelope {
            message_type: MESSAGE_TYPE_KEEP_ALIVE,
            payload: vec![0; MAX_FRAME_BYTES + 1],
        };
        let err = writer.send(&envelope).await.unwrap_err();
        match err {
            FrameError::Oversized { len, max } => {
                assert!(len > max);
                assert_eq!(max, MAX_FRAME_BYTES);
            }
            other => panic!("expected Oversized, got {other:?}"),
        }
        // Nothing was written for the refused frame.
        assert!(writer.into_inner().is_empty());
    }
}
