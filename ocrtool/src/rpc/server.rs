use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::Result;

use super::dispatcher::{Dispatcher, Outcome};

/// Why [`serve`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeExit {
    EndOfInput,
    Shutdown,
}

/// Read requests line by line until end of input or `shutdown`, writing
/// each outcome to `writer`. Requests are handled strictly one at a time.
pub async fn serve<R, W>(dispatcher: &Dispatcher, mut reader: R, mut writer: W) -> Result<ServeExit>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            debug!("Input closed");
            return Ok(ServeExit::EndOfInput);
        }

        let line = String::from_utf8_lossy(&buf);
        let Some(outcome) = dispatcher.dispatch_line(&line).await else {
            continue;
        };

        let (text, exit) = match outcome {
            Outcome::Reply(value) => (serde_json::to_string(&value)?, None),
            Outcome::Pretty(value) => (serde_json::to_string_pretty(&value)?, None),
            Outcome::Text(text) => (text, None),
            Outcome::Shutdown(value) => (serde_json::to_string(&value)?, Some(ServeExit::Shutdown)),
        };

        writer.write_all(text.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        if let Some(exit) = exit {
            return Ok(exit);
        }
    }
}
