// ABOUTME: Provides TCP connection management for SMPP v3.4 protocol communication
// ABOUTME: Implements frame-based I/O per Section 4.4 of the connection design

use crate::codec::{CodecError, Encodable, Frame, MAX_PDU_SIZE, PduHeader, PduRegistry};
use crate::session::{Session, SessionState};
use bytes::BytesMut;
use std::io::Cursor;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

/// Errors raised by [`Connection::send`] and [`Connection::recv`].
///
/// `ConnIsClosed`, `ReadHeaderTimeout`, and `ReadPktBodyTimeout` are reported
/// distinctly from other I/O errors per Section 4.4.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection is closed")]
    ConnIsClosed,

    #[error("timed out reading PDU header")]
    ReadHeaderTimeout,

    #[error("timed out reading PDU body")]
    ReadPktBodyTimeout,

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A pool of reusable read buffers.
///
/// `recv` acquires a buffer for the duration of a single read, releasing it
/// back to the pool on every exit path (success, timeout, or error) so a busy
/// connection doesn't churn allocations once the pool has warmed up.
struct BufferPool {
    buffers: Mutex<Vec<BytesMut>>,
}

impl BufferPool {
    fn new() -> Self {
        Self {
            buffers: Mutex::new(Vec::new()),
        }
    }

    async fn acquire(&self) -> BytesMut {
        let mut buffers = self.buffers.lock().await;
        buffers.pop().unwrap_or_default()
    }

    async fn release(&self, mut buf: BytesMut) {
        buf.clear();
        let mut buffers = self.buffers.lock().await;
        buffers.push(buf);
    }
}

/// SMPP v3.4 Connection Management
///
/// Handles frame-based communication over TCP for SMPP protocol sessions, per
/// Section 4.4 (C4 Connection) of the design.
///
/// ## Write path
/// `send` packs the PDU and performs a single write of the whole buffer under
/// a mutex, so concurrent senders on one connection never interleave partial
/// writes.
///
/// ## Read path
/// `recv` is driven by a single reader (the connection's read loop); it reads
/// exactly 16 header bytes, validates them, then reads the remaining body
/// bytes, applying an optional deadline to each phase independently so a
/// timeout can be attributed to the header or the body.
pub struct Connection {
    reader: OwnedReadHalf,
    writer: Mutex<BufWriter<OwnedWriteHalf>>,
    registry: PduRegistry,
    buffers: BufferPool,
}

impl Connection {
    /// Create a new `Connection`, backed by `socket`.
    pub fn new(socket: TcpStream) -> Connection {
        let (reader, writer) = socket.into_split();
        Connection {
            reader,
            writer: Mutex::new(BufWriter::new(writer)),
            registry: PduRegistry::new(),
            buffers: BufferPool::new(),
        }
    }

    /// Packs `frame` and writes it atomically to the stream.
    ///
    /// Fails with `ConnectionError::ConnIsClosed` if `session` is CLOSED
    /// rather than attempting a write on a dead session.
    pub async fn send(&self, frame: &Frame, session: &Session) -> Result<(), ConnectionError> {
        if session.state() == SessionState::Closed {
            return Err(ConnectionError::ConnIsClosed);
        }

        let bytes = frame.to_bytes();
        let mut writer = self.writer.lock().await;
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Reads one PDU, applying `timeout` (if given) independently to the
    /// header read and the body read.
    ///
    /// A header-read timeout yields `ErrReadHeaderTimeout`; a body-read
    /// timeout yields `ErrReadPktBodyTimeout`.
    pub async fn recv(&mut self, timeout: Option<Duration>) -> Result<Frame, ConnectionError> {
        let mut header_buf = self.buffers.acquire().await;
        header_buf.resize(PduHeader::SIZE, 0);

        let header_read = self.reader.read_exact(&mut header_buf);
        let header_result = match timeout {
            Some(duration) => tokio::time::timeout(duration, header_read)
                .await
                .map_err(|_| ConnectionError::ReadHeaderTimeout)?,
            None => header_read.await,
        };

        if let Err(error) = header_result {
            self.buffers.release(header_buf).await;
            return Err(error.into());
        }

        let mut cursor = Cursor::new(&header_buf[..]);
        let header = match PduHeader::decode(&mut cursor) {
            Ok(header) => header,
            Err(error) => {
                self.buffers.release(header_buf).await;
                return Err(error.into());
            }
        };
        self.buffers.release(header_buf).await;

        let body_len = header.command_length as usize - PduHeader::SIZE;
        let mut body_buf = self.buffers.acquire().await;
        body_buf.resize(body_len, 0);

        if body_len > 0 {
            let body_read = self.reader.read_exact(&mut body_buf);
            let body_result = match timeout {
                Some(duration) => tokio::time::timeout(duration, body_read)
                    .await
                    .map_err(|_| ConnectionError::ReadPktBodyTimeout)?,
                None => body_read.await,
            };

            if let Err(error) = body_result {
                self.buffers.release(body_buf).await;
                return Err(error.into());
            }
        }

        let mut cursor = Cursor::new(&body_buf[..]);
        let result = self.registry.decode_pdu(header, &mut cursor);
        self.buffers.release(body_buf).await;

        result.map_err(Into::into)
    }
}

/// `MAX_PDU_SIZE` is re-exported here so callers validating inbound
/// `command_length` before a full `recv` can reuse the same bound.
pub const fn max_pdu_size() -> u32 {
    MAX_PDU_SIZE
}
