/*!
Async handshake engine over tokio I/O.

The local message is written and the remote one read concurrently on the two
halves of the stream, so neither peer depends on the transport buffering a
full message.
*/

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::core::crypto::Primitives;
use crate::core::error::{Error, Result};
use crate::core::keys::{KeyMaterial, PeerKeys};
use crate::core::memory::SessionSecret;
use crate::core::session::{HandshakeState, Role};
use crate::protocol::transport::{read_message_async, write_message_async};

use super::common::{CancellationToken, EngineCore, log_close_error};

/// Runs one handshake attempt over a tokio stream
#[derive(Debug)]
pub struct AsyncHandshakeEngine {
    core: EngineCore,
}

/// Write `bytes` and read `len` bytes concurrently
async fn exchange<S>(stream: &mut S, bytes: &[u8], len: usize) -> Result<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin + ?Sized,
{
    let (mut reader, mut writer) = tokio::io::split(stream);
    let (written, received) = tokio::join!(
        write_message_async(&mut writer, bytes),
        read_message_async(&mut reader, len),
    );

    // A read failure explains more than the write error it usually causes.
    let received = received?;
    written?;
    Ok(received)
}

impl AsyncHandshakeEngine {
    /// Create an engine for one attempt against `peer`
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

    /// Observe `token` for cancellation between steps
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

    /// Run the handshake to completion
    pub async fn run<S>(&mut self, stream: &mut S) -> Result<SessionSecret>
    where
        S: AsyncRead + AsyncWrite + Unpin + ?Sized,
    {
        self.run_until(stream, std::future::pending::<()>()).await
    }

    /// Run the handshake, aborting with `Cancelled` if `cancel` completes
    /// first. The stream is shut down on any failure.
    pub async fn run_until<S, F>(&mut self, stream: &mut S, cancel: F) -> Result<SessionSecret>
    where
        S: AsyncRead + AsyncWrite + Unpin + ?Sized,
        F: Future<Output = ()>,
    {
        self.core.ensure_fresh()?;

        let outcome = self.drive(stream, cancel).await;
        match outcome {
            Ok(secret) => Ok(secret),
            Err(error) => {
                log_close_error(self.core.role(), stream.shutdown().await);
                Err(self.core.fail(error))
            }
        }
    }

    /// Run the handshake with a deadline; an elapsed deadline is `Cancelled`
    pub async fn run_with_timeout<S>(&mut self, stream: &mut S, timeout: Duration) -> Result<SessionSecret>
    where
        S: AsyncRead + AsyncWrite + Unpin + ?Sized,
    {
        self.run_until(stream, tokio::time::sleep(timeout)).await
    }

    async fn drive<S, F>(&mut self, stream: &mut S, cancel: F) -> Result<SessionSecret>
    where
        S: AsyncRead + AsyncWrite + Unpin + ?Sized,
        F: Future<Output = ()>,
    {
        let (handshake, bytes) = self.core.prepare()?;

        let received = tokio::select! {
            result = exchange(stream, &bytes, bytes.len()) => {
                result.map_err(|e| self.core.transport_failure(e))?
            }
            _ = cancel => {
                tracing::debug!(role = %self.core.role(), "handshake cancelled during exchange");
                return Err(Error::Cancelled);
            }
        };

        self.core.complete(handshake, &received)
    }
}
