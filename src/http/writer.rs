use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Which of a response's writes is next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    /// Status line and headers, plus the body for text responses.
    Head,
    /// Raw bytes of a binary response.
    Payload,
    Done,
}

/// Result of one completed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteCompletion {
    pub phase: WritePhase,
    pub bytes: usize,
    /// No further write follows for this response.
    pub is_final: bool,
}

/// Sends a response as one write (text) or two writes (binary).
#[derive(Debug)]
pub struct ResponseWriter {
    text: Vec<u8>,
    payload: Option<Vec<u8>>,
    phase: WritePhase,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        let payload = response.is_binary.then_some(response.payload);
        Self {
            text: response.text,
            payload,
            phase: WritePhase::Head,
        }
    }

    /// Whether the head went out and only the payload remains.
    pub fn header_sent(&self) -> bool {
        self.phase == WritePhase::Payload
    }

    /// Performs the next write in full.
    pub async fn write_next<S>(&mut self, stream: &mut S) -> std::io::Result<WriteCompletion>
    where
        S: AsyncWrite + Unpin,
    {
        let phase = self.phase;
        let buf: &[u8] = match (phase, &self.payload) {
            (WritePhase::Head, _) => &self.text,
            (WritePhase::Payload, Some(payload)) => payload,
            _ => {
                return Ok(WriteCompletion {
                    phase: WritePhase::Done,
                    bytes: 0,
                    is_final: true,
                });
            }
        };

        write_fully(stream, buf).await?;
        let bytes = buf.len();

        self.phase = match phase {
            WritePhase::Head if self.payload.is_some() => WritePhase::Payload,
            _ => WritePhase::Done,
        };

        Ok(WriteCompletion {
            phase,
            bytes,
            is_final: self.phase == WritePhase::Done,
        })
    }
}

async fn write_fully<S>(stream: &mut S, buf: &[u8]) -> std::io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    let mut written = 0;
    while written < buf.len() {
        let n = stream.write(&buf[written..]).await?;

        if n == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                "connection closed while writing",
            ));
        }

        written += n;
    }
    stream.flush().await
}
