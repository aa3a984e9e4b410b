use std::io;

use tokio::io::{
    split, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, ReadHalf,
    WriteHalf,
};
use tokio::net::TcpStream;
use uuid::Uuid;

use crate::client::{closed, finish_line, into_text};
use crate::config::{ClientConfig, Error};

struct Halves<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: BufWriter<WriteHalf<S>>,
}

/// [`crate::LineClient`] for tokio streams. Reads and writes are suspension
/// points instead of blocking the thread; the line contract is the same.
pub struct AsyncLineClient<S> {
    id: Uuid,
    conn: Option<Halves<S>>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> AsyncLineClient<S> {
    pub fn new(stream: S) -> Self {
        let (read_half, write_half) = split(stream);
        Self {
            id: Uuid::new_v4(),
            conn: Some(Halves {
                reader: BufReader::new(read_half),
                writer: BufWriter::new(write_half),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn read_line_bytes(&mut self) -> io::Result<Vec<u8>> {
        let conn = self.conn.as_mut().ok_or_else(closed)?;
        let mut buf = Vec::new();
        conn.reader.read_until(b'\n', &mut buf).await?;
        let line = finish_line(buf)?;
        tracing::trace!(client_id = %self.id, len = line.len(), "line read");
        Ok(line)
    }

    /// UTF-8 form of `read_line_bytes`; non UTF-8 lines fail with `InvalidData`.
    pub async fn read_line(&mut self) -> io::Result<String> {
        into_text(self.read_line_bytes().await?)
    }

    pub async fn write(&mut self, data: impl AsRef<[u8]>) -> io::Result<()> {
        let conn = self.conn.as_mut().ok_or_else(closed)?;
        let data = data.as_ref();
        conn.writer.write_all(data).await?;
        conn.writer.flush().await?;
        tracing::trace!(client_id = %self.id, len = data.len(), "data written");
        Ok(())
    }

    /// Shuts down the write side, then drops the stream. Later calls fail
    /// with `NotConnected`.
    pub async fn close(&mut self) -> io::Result<()> {
        let Halves { reader, mut writer } = self.conn.take().ok_or_else(closed)?;
        tracing::debug!(client_id = %self.id, "closing connection");
        let result = writer.shutdown().await;
        drop(reader);
        drop(writer);
        result
    }
}

impl AsyncLineClient<TcpStream> {
    pub async fn connect(cfg: &ClientConfig) -> Result<Self, Error> {
        let stream = TcpStream::connect(cfg.addr.as_str())
            .await
            .map_err(|source| Error::Connect {
                addr: cfg.addr.clone(),
                source,
            })?;
        stream.set_nodelay(cfg.nodelay)?;
        let client = Self::new(stream);
        tracing::debug!(client_id = %client.id, addr = %cfg.addr, "connected");
        Ok(client)
    }
}
