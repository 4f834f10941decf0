/*!
Common functionality for the handshake engines.

The sync and async engines differ only in how they move bytes. Everything
else is factored into [`EngineCore`]: suite checks, state recording,
cancellation and the cryptographic steps on either side of the I/O.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::crypto::Primitives;
use crate::core::error::{Error, Result};
use crate::core::keys::{KeyMaterial, PeerKeys};
use crate::core::memory::SessionSecret;
use crate::core::session::{FailureReason, HandshakeState, Role};
use crate::invalid_state_err;
use crate::protocol::handshake::{Handshake, Signed, ensure_same_suite};

/// Cooperative cancellation flag shared with a running engine.
///
/// The engine checks it between steps and after a transport error. To
/// unblock an engine stuck in a read, cancel the token and then shut the
/// underlying socket down.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// State and logic shared by both engines
#[derive(Debug)]
pub(crate) struct EngineCore {
    keys: Arc<KeyMaterial>,
    peer: PeerKeys,
    primitives: Primitives,
    role: Role,
    cancel: Option<CancellationToken>,
    state: HandshakeState,
    started: bool,
}

impl EngineCore {
    pub(crate) fn new(keys: Arc<KeyMaterial>, peer: PeerKeys) -> Result<Self> {
        ensure_same_suite(keys.suite(), peer.suite())?;
        let primitives = Primitives::for_suite(keys.suite());

        Ok(Self {
            keys,
            peer,
            primitives,
            role: Role::Initiator,
            cancel: None,
            state: HandshakeState::Idle,
            started: false,
        })
    }

    pub(crate) fn set_primitives(&mut self, primitives: Primitives) -> Result<()> {
        ensure_same_suite(self.keys.suite(), primitives.suite())?;
        self.primitives = primitives;
        Ok(())
    }

    pub(crate) fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub(crate) fn set_cancellation(&mut self, token: CancellationToken) {
        self.cancel = Some(token);
    }

    pub(crate) fn state(&self) -> HandshakeState {
        self.state
    }

    pub(crate) fn role(&self) -> Role {
        self.role
    }

    pub(crate) fn message_size(&self) -> usize {
        self.primitives.message_size()
    }

    /// Fail unless this engine has never run
    pub(crate) fn ensure_fresh(&self) -> Result<()> {
        if self.started {
            return invalid_state_err!(HandshakeState::Idle, self.state);
        }
        Ok(())
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    pub(crate) fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    fn transition(&mut self, state: HandshakeState) {
        tracing::debug!(role = %self.role, from = %self.state, to = %state, "handshake transition");
        self.state = state;
    }

    /// Encapsulate and sign; returns the handshake and the encoded message
    pub(crate) fn prepare(&mut self) -> Result<(Handshake<Signed>, Vec<u8>)> {
        self.ensure_fresh()?;
        self.started = true;
        self.check_cancelled()?;

        let handshake = Handshake::new(
            Arc::clone(&self.keys),
            self.peer.clone(),
            self.primitives.clone(),
        )?
        .encapsulate()?;
        self.transition(HandshakeState::LocalEncapsulated);

        let handshake = handshake.sign()?;
        let bytes = handshake.message().to_bytes();
        tracing::debug!(role = %self.role, bytes = bytes.len(), "handshake message ready");

        self.check_cancelled()?;
        Ok((handshake, bytes))
    }

    /// Map a transport failure, preferring cancellation if it was requested
    pub(crate) fn transport_failure(&self, error: Error) -> Error {
        if self.is_cancelled() {
            tracing::debug!(role = %self.role, %error, "transport failed after cancellation");
            return Error::Cancelled;
        }
        error
    }

    /// Process the remote message once the local one has been written
    pub(crate) fn complete(
        &mut self,
        handshake: Handshake<Signed>,
        received: &[u8],
    ) -> Result<SessionSecret> {
        let handshake = handshake.sent();
        self.transition(HandshakeState::LocalMessageSent);
        self.check_cancelled()?;

        let handshake = handshake.receive(received)?;
        self.transition(HandshakeState::RemoteMessageReceived);

        let handshake = handshake.verify()?;
        self.transition(HandshakeState::RemoteVerified);
        self.check_cancelled()?;

        let secret = handshake.establish()?;
        self.transition(HandshakeState::Established);
        tracing::info!(
            role = %self.role,
            suite = %self.primitives.suite(),
            secret_len = secret.len(),
            "handshake established"
        );
        Ok(secret)
    }

    /// Record a failed attempt and hand the error back
    pub(crate) fn fail(&mut self, error: Error) -> Error {
        let reason = error.reason();
        if error.is_authentication_failure() {
            tracing::warn!(role = %self.role, state = %self.state, %reason, "handshake rejected");
        } else if reason == FailureReason::Transport || reason == FailureReason::IncompleteMessage {
            tracing::debug!(role = %self.role, state = %self.state, %error, "handshake transport failure");
        } else {
            tracing::debug!(role = %self.role, state = %self.state, %error, "handshake failed");
        }
        self.state = HandshakeState::Failed(reason);
        error
    }
}

/// Log a close error without masking the original failure
pub(crate) fn log_close_error(role: Role, result: std::io::Result<()>) {
    if let Err(error) = result {
        tracing::debug!(role = %role, %error, "failed to close transport");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crypto::CipherSuite;

    fn core() -> EngineCore {
        let keys = Arc::new(KeyMaterial::generate(CipherSuite::lightweight()).unwrap());
        let peer = KeyMaterial::generate(CipherSuite::lightweight()).unwrap().public_identity();
        EngineCore::new(keys, peer).unwrap()
    }

    #[test]
    fn test_token() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_prepare_only_once() {
        let mut core = core();
        let (_, bytes) = core.prepare().unwrap();
        assert_eq!(bytes.len(), CipherSuite::lightweight().wire_message_size());
        assert_eq!(core.state(), HandshakeState::LocalEncapsulated);

        assert!(matches!(core.prepare(), Err(Error::InvalidState { .. })));
    }

    #[test]
    fn test_cancelled_before_start() {
        let mut core = core();
        let token = CancellationToken::new();
        core.set_cancellation(token.clone());
        token.cancel();

        let err = core.prepare().unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        let _ = core.fail(err);
        assert_eq!(core.state(), HandshakeState::Failed(FailureReason::Cancelled));
    }

    #[test]
    fn test_primitives_must_match() {
        let mut core = core();
        let err = core.set_primitives(Primitives::default()).unwrap_err();
        assert!(matches!(err, Error::AlgorithmMismatch { .. }));
    }
}
