/*!
Blocking handshake engine over std I/O.
*/

use std::io;
use std::sync::Arc;
use std::thread;

use crate::core::crypto::Primitives;
use crate::core::error::{Error, Result};
use crate::core::keys::{KeyMaterial, PeerKeys};
use crate::core::memory::SessionSecret;
use crate::core::session::{HandshakeState, Role};
use crate::protocol::transport::{Transport, read_message, write_message};

use super::common::{CancellationToken, EngineCore, log_close_error};

/// Runs one handshake attempt over a blocking transport.
///
/// ```no_run
/// use std::net::TcpStream;
/// use std::sync::Arc;
/// use pqc_tunnel::{CipherSuite, HandshakeEngine, KeyMaterial};
///
/// # fn main() -> pqc_tunnel::Result<()> {
/// let keys = Arc::new(KeyMaterial::generate(CipherSuite::default())?);
/// # let peer = KeyMaterial::generate(CipherSuite::default())?.public_identity();
/// let mut stream = TcpStream::connect("127.0.0.1:9000")?;
///
/// let mut engine = HandshakeEngine::new(keys, peer)?;
/// let secret = engine.run(&mut stream)?;
/// assert_eq!(secret.len(), 32);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HandshakeEngine {
    core: EngineCore,
}

impl HandshakeEngine {
    /// Create an engine for one attempt against `peer`.
    ///
    /// Fails with `AlgorithmMismatch` if the peer's keys are for another suite.
    pub fn new(keys: Arc<KeyMaterial>, peer: PeerKeys) -> Result<Self> {
        Ok(Self {
            core: EngineCore::new(keys, peer)?,
        })
    }

    /// Replace the primitives, e.g. with instrumented implementations
    pub fn with_primitives(mut self, primitives: Primitives) -> Result<Self> {
        self.core.set_primitives(primitives)?;
        Ok(self)
    }

    /// Label log events with `role`
    pub fn with_role(mut self, role: Role) -> Self {
        self.core.set_role(role);
        self
    }

    /// Observe `token` for cancellation
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.core.set_cancellation(token);
        self
    }

    pub fn state(&self) -> HandshakeState {
        self.core.state()
    }

    pub fn role(&self) -> Role {
        self.core.role()
    }

    /// Size of the message this engine sends and expects
    pub fn message_size(&self) -> usize {
        self.core.message_size()
    }

    /// Write the local message, then read the remote one.
    ///
    /// Both peers write first. The message is smaller than the socket buffers
    /// of common stream transports; use [`HandshakeEngine::run_split`] if the
    /// transport cannot buffer one message.
    pub fn run<T>(&mut self, transport: &mut T) -> Result<SessionSecret>
    where
        T: Transport + ?Sized,
    {
        self.core.ensure_fresh()?;

        match self.drive(transport) {
            Ok(secret) => Ok(secret),
            Err(error) => {
                log_close_error(self.core.role(), transport.close());
                Err(self.core.fail(error))
            }
        }
    }

    fn drive<T>(&mut self, transport: &mut T) -> Result<SessionSecret>
    where
        T: Transport + ?Sized,
    {
        let (handshake, bytes) = self.core.prepare()?;

        write_message(transport, &bytes).map_err(|e| self.core.transport_failure(e))?;
        let received = read_message(transport, bytes.len())
            .map_err(|e| self.core.transport_failure(e))?;

        self.core.complete(handshake, &received)
    }

    /// Write on a scoped thread while reading on this one.
    ///
    /// `reader` and `writer` are two handles to the same connection, e.g.
    /// `(&stream, &stream)` for a `TcpStream`.
    pub fn run_split<R, W>(&mut self, mut reader: R, writer: W) -> Result<SessionSecret>
    where
        R: Transport + Send,
        W: Transport + Send,
    {
        self.core.ensure_fresh()?;

        let (handshake, bytes) = match self.core.prepare() {
            Ok(prepared) => prepared,
            Err(error) => {
                log_close_error(self.core.role(), reader.close());
                return Err(self.core.fail(error));
            }
        };

        let role = self.core.role();
        let (written, received, reader_closed) = thread::scope(|scope| {
            let bytes = &bytes;
            let write_half = scope.spawn(move || {
                let mut writer = writer;
                let result = write_message(&mut writer, bytes);
                (result, writer)
            });
            let received = read_message(&mut reader, bytes.len());

            // Closing the connection releases a writer stalled on it.
            let reader_closed = received.is_err();
            if reader_closed {
                log_close_error(role, reader.close());
            }
            (write_half.join(), received, reader_closed)
        });

        let (write_result, mut writer) = match written {
            Ok(joined) => joined,
            Err(_) => {
                if !reader_closed {
                    log_close_error(role, reader.close());
                }
                let error = Error::from(io::Error::other("writer thread panicked"));
                return Err(self.core.fail(error));
            }
        };

        // A read failure explains more than the write error it usually causes.
        let outcome = match (write_result, received) {
            (_, Err(error)) | (Err(error), Ok(_)) => Err(self.core.transport_failure(error)),
            (Ok(()), Ok(received)) => self.core.complete(handshake, &received),
        };

        outcome.map_err(|error| {
            log_close_error(role, writer.close());
            if !reader_closed {
                log_close_error(role, reader.close());
            }
            self.core.fail(error)
        })
    }
}
