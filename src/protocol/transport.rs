/*!
Byte stream adapter for the handshake.

The handshake needs only two things from a stream: write one message in
full and read exactly one message back. There is no framing; the message
size is known from the cipher suite.
*/

use std::io::{self, Read, Write};
use std::net::TcpStream;

use tracing::trace;

use crate::core::error::{Result, TransportError};

/// A reliable, ordered duplex byte stream
pub trait Transport: Read + Write {
    /// Release the stream after a failed attempt
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl Transport for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(std::net::Shutdown::Both)
    }
}

impl Transport for &TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(std::net::Shutdown::Both)
    }
}

#[cfg(unix)]
impl Transport for std::os::unix::net::UnixStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(std::net::Shutdown::Both)
    }
}

#[cfg(unix)]
impl Transport for &std::os::unix::net::UnixStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(std::net::Shutdown::Both)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Write all of `bytes`, looping over partial writes.
///
/// A stream that accepts zero bytes before the message is complete yields
/// `TransportError::WriteZero`.
pub fn write_message<W: Write + ?Sized>(writer: &mut W, bytes: &[u8]) -> Result<()> {
    let mut written = 0;
    while written < bytes.len() {
        match writer.write(&bytes[written..]) {
            Ok(0) => {
                return Err(TransportError::WriteZero {
                    written,
                    expected: bytes.len(),
                }
                .into());
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    writer.flush()?;
    trace!(bytes = written, "wrote handshake message");
    Ok(())
}

/// Read exactly `len` bytes.
///
/// End of stream before that yields `TransportError::IncompleteMessage` with
/// the number of bytes that did arrive.
pub fn read_message<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    let mut received = 0;
    while received < len {
        match reader.read(&mut buf[received..]) {
            Ok(0) => {
                return Err(TransportError::IncompleteMessage {
                    expected: len,
                    received,
                }
                .into());
            }
            Ok(n) => received += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    trace!(bytes = received, "read handshake message");
    Ok(buf)
}

#[cfg(feature = "async")]
pub use self::async_io::{read_message_async, write_message_async};

#[cfg(feature = "async")]
mod async_io {
    use std::io;

    use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
    use tracing::trace;

    use crate::core::error::{Result, TransportError};

    /// Async counterpart of [`super::write_message`]
    pub async fn write_message_async<W>(writer: &mut W, bytes: &[u8]) -> Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut written = 0;
        while written < bytes.len() {
            match writer.write(&bytes[written..]).await {
                Ok(0) => {
                    return Err(TransportError::WriteZero {
                        written,
                        expected: bytes.len(),
                    }
                    .into());
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        writer.flush().await?;
        trace!(bytes = written, "wrote handshake message");
        Ok(())
    }

    /// Async counterpart of [`super::read_message`]
    pub async fn read_message_async<R>(reader: &mut R, len: usize) -> Result<Vec<u8>>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut buf = vec![0u8; len];
        let mut received = 0;
        while received < len {
            match reader.read(&mut buf[received..]).await {
                Ok(0) => {
                    return Err(TransportError::IncompleteMessage {
                        expected: len,
                        received,
                    }
                    .into());
                }
                Ok(n) => received += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        trace!(bytes = received, "read handshake message");
        Ok(buf)
    }
}
