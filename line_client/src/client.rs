use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::net::{Shutdown, TcpStream};

use uuid::Uuid;

use crate::config::{ClientConfig, Error};

const CRLF: &[u8] = b"\r\n";

/// A bidirectional byte stream a [`LineClient`] can own.
///
/// The reader and writer buffers each need their own handle to the same
/// underlying connection, hence `try_clone`.
pub trait Connection: Read + Write + Sized {
    fn try_clone(&self) -> io::Result<Self>;

    /// Shuts down both directions of the connection.
    fn shutdown(&self) -> io::Result<()>;
}

impl Connection for TcpStream {
    fn try_clone(&self) -> io::Result<Self> {
        TcpStream::try_clone(self)
    }

    fn shutdown(&self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

#[cfg(unix)]
impl Connection for std::os::unix::net::UnixStream {
    fn try_clone(&self) -> io::Result<Self> {
        std::os::unix::net::UnixStream::try_clone(self)
    }

    fn shutdown(&self) -> io::Result<()> {
        std::os::unix::net::UnixStream::shutdown(self, Shutdown::Both)
    }
}

struct Buffers<S: Connection> {
    reader: BufReader<S>,
    writer: BufWriter<S>,
}

/// Line oriented client over a single connection.
///
/// Lines are read up to and including `\n`; only an exact trailing `\r\n` is
/// stripped, a bare `\n` is returned as is. Every `write` is flushed before it
/// returns.
pub struct LineClient<S: Connection> {
    id: Uuid,
    // None once closed
    conn: Option<Buffers<S>>,
}

impl<S: Connection> LineClient<S> {
    pub fn new(conn: S) -> io::Result<Self> {
        let writer = BufWriter::new(conn.try_clone()?);
        Ok(Self {
            id: Uuid::new_v4(),
            conn: Some(Buffers {
                reader: BufReader::new(conn),
                writer,
            }),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Reads one line as raw bytes, stripping only an exact trailing `\r\n`.
    pub fn read_line_bytes(&mut self) -> io::Result<Vec<u8>> {
        let conn = self.conn.as_mut().ok_or_else(closed)?;
        let mut buf = Vec::new();
        conn.reader.read_until(b'\n', &mut buf)?;
        let line = finish_line(buf)?;
        tracing::trace!(client_id = %self.id, len = line.len(), "line read");
        Ok(line)
    }

    /// UTF-8 form of [`Self::read_line_bytes`]. A line that is not UTF-8 is
    /// consumed and reported as `InvalidData`; use `read_line_bytes` for binary
    /// payloads.
    pub fn read_line(&mut self) -> io::Result<String> {
        into_text(self.read_line_bytes()?)
    }

    /// Writes `data` as is (no delimiter is appended) and flushes.
    pub fn write(&mut self, data: impl AsRef<[u8]>) -> io::Result<()> {
        let conn = self.conn.as_mut().ok_or_else(closed)?;
        let data = data.as_ref();
        conn.writer.write_all(data)?;
        conn.writer.flush()?;
        tracing::trace!(client_id = %self.id, len = data.len(), "data written");
        Ok(())
    }

    /// Shuts the connection down and releases it. Later calls, including a
    /// second `close`, fail with `NotConnected`.
    pub fn close(&mut self) -> io::Result<()> {
        let Buffers { reader, writer } = self.conn.take().ok_or_else(closed)?;
        tracing::debug!(client_id = %self.id, "closing connection");
        let result = reader.get_ref().shutdown();
        // released without a flush
        let (_stream, _unflushed) = writer.into_parts();
        result
    }
}

impl LineClient<TcpStream> {
    pub fn connect(cfg: &ClientConfig) -> Result<Self, Error> {
        let stream = TcpStream::connect(cfg.addr.as_str()).map_err(|source| Error::Connect {
            addr: cfg.addr.clone(),
            source,
        })?;
        stream.set_nodelay(cfg.nodelay)?;
        let client = Self::new(stream)?;
        tracing::debug!(client_id = %client.id, addr = %cfg.addr, "connected");
        Ok(client)
    }
}

pub(crate) fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "use of closed connection")
}

/// Turns the bytes of one `read_until('\n')` call into a line.
pub(crate) fn finish_line(mut buf: Vec<u8>) -> io::Result<Vec<u8>> {
    if buf.last() != Some(&b'\n') {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed before end of line",
        ));
    }
    if buf.ends_with(CRLF) {
        buf.truncate(buf.len() - CRLF.len());
    }
    Ok(buf)
}

pub(crate) fn into_text(line: Vec<u8>) -> io::Result<String> {
    String::from_utf8(line).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
