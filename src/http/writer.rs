use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::latin1::{self, EncodeError};
use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Renders a response to wire bytes.
///
/// The status line and headers are ISO-8859-1; the body is copied as is.
pub fn serialize_response(resp: &Response) -> Result<Vec<u8>, EncodeError> {
    let mut head = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );

    for (k, v) in &resp.headers {
        head.push_str(k);
        head.push_str(": ");
        head.push_str(v);
        head.push_str("\r\n");
    }

    // Header/body separator
    head.push_str("\r\n");

    let mut buf = latin1::encode(&head)?;
    buf.extend_from_slice(&resp.body);

    Ok(buf)
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Result<Self, EncodeError> {
        Ok(Self {
            buffer: serialize_response(response)?,
            written: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub async fn write_to_stream<W>(
        &mut self,
        stream: &mut W,
    ) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream
                .write(&self.buffer[self.written..])
                .await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
