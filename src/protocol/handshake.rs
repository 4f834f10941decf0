/*!
Typestate handshake.

A [`Handshake`] moves through the protocol one consuming call at a time:

```text
Idle --encapsulate--> LocalEncapsulated --sign--> Signed --sent--> LocalMessageSent
     --receive--> RemoteMessageReceived --verify--> RemoteVerified --establish--> SessionSecret
```

Each step takes the previous value by value, so a step cannot be repeated,
skipped or observed out of order, and a failure drops every intermediate
secret with the handshake. The type does no I/O; the engines in
[`crate::protocol::engine`] pair it with a transport.
*/

use std::fmt;
use std::sync::Arc;

use crate::core::crypto::{CipherSuite, Primitives};
use crate::core::error::{CryptoError, Error, Result};
use crate::core::keys::{KeyMaterial, PeerKeys};
use crate::core::memory::{SessionSecret, SharedSecret};
use crate::core::message::HandshakeMessage;

/// Fresh handshake, nothing computed yet
#[derive(Debug)]
pub struct Idle;

/// Local shared secret encapsulated to the peer
#[derive(Debug)]
pub struct LocalEncapsulated {
    local_secret: SharedSecret,
    ciphertext: Vec<u8>,
}

/// Local ciphertext signed and ready to send
#[derive(Debug)]
pub struct Signed {
    local_secret: SharedSecret,
    message: HandshakeMessage,
}

/// Local message delivered to the transport
#[derive(Debug)]
pub struct LocalMessageSent {
    local_secret: SharedSecret,
}

/// Remote message parsed but not yet authenticated
#[derive(Debug)]
pub struct RemoteMessageReceived {
    local_secret: SharedSecret,
    remote: HandshakeMessage,
}

/// Remote ciphertext authenticated by the peer's signature
#[derive(Debug)]
pub struct RemoteVerified {
    local_secret: SharedSecret,
    remote_ciphertext: Vec<u8>,
}

/// One handshake attempt between the local keys and one peer
pub struct Handshake<S> {
    keys: Arc<KeyMaterial>,
    peer: PeerKeys,
    primitives: Primitives,
    stage: S,
}

/// Fail with `AlgorithmMismatch` unless the suites are the same
pub(crate) fn ensure_same_suite(local: CipherSuite, remote: CipherSuite) -> Result<()> {
    if local != remote {
        return Err(Error::AlgorithmMismatch {
            local: local.to_string(),
            remote: remote.to_string(),
        });
    }
    Ok(())
}

impl<S> Handshake<S> {
    fn advance<T>(self, stage: T) -> Handshake<T> {
        Handshake {
            keys: self.keys,
            peer: self.peer,
            primitives: self.primitives,
            stage,
        }
    }

    pub fn suite(&self) -> CipherSuite {
        self.primitives.suite()
    }

    pub fn peer(&self) -> &PeerKeys {
        &self.peer
    }

    /// Size of the message each side sends
    pub fn message_size(&self) -> usize {
        self.primitives.message_size()
    }
}

impl Handshake<Idle> {
    /// Start a handshake. Keys, peer and primitives must share one suite.
    pub fn new(keys: Arc<KeyMaterial>, peer: PeerKeys, primitives: Primitives) -> Result<Self> {
        ensure_same_suite(keys.suite(), peer.suite())?;
        ensure_same_suite(keys.suite(), primitives.suite())?;

        Ok(Self {
            keys,
            peer,
            primitives,
            stage: Idle,
        })
    }

    /// Encapsulate a fresh shared secret to the peer's KEM public key
    pub fn encapsulate(self) -> Result<Handshake<LocalEncapsulated>> {
        let (secret, ciphertext) = self.primitives.kem().encapsulate(self.peer.kem().as_bytes())?;

        let expected = self.primitives.ciphertext_size();
        if ciphertext.len() != expected {
            return Err(Error::Encapsulation(CryptoError::UnexpectedLength {
                what: "ciphertext",
                expected,
                actual: ciphertext.len(),
            }));
        }

        let stage = LocalEncapsulated {
            local_secret: SharedSecret::new(secret),
            ciphertext,
        };
        Ok(self.advance(stage))
    }
}

impl Handshake<LocalEncapsulated> {
    /// The ciphertext that will be sent
    pub fn ciphertext(&self) -> &[u8] {
        &self.stage.ciphertext
    }

    /// Sign the ciphertext with the local signing key
    pub fn sign(self) -> Result<Handshake<Signed>> {
        let signature = self
            .primitives
            .signer()
            .sign(&self.stage.ciphertext, self.keys.signature().secret.as_bytes())?;

        let expected = self.primitives.signature_size();
        if signature.len() != expected {
            return Err(Error::Signature(CryptoError::UnexpectedLength {
                what: "signature",
                expected,
                actual: signature.len(),
            }));
        }

        let LocalEncapsulated { local_secret, ciphertext } = self.stage;
        let stage = Signed {
            local_secret,
            message: HandshakeMessage::new(ciphertext, signature),
        };
        Ok(Handshake {
            keys: self.keys,
            peer: self.peer,
            primitives: self.primitives,
            stage,
        })
    }
}

impl Handshake<Signed> {
    /// The message to send to the peer
    pub fn message(&self) -> &HandshakeMessage {
        &self.stage.message
    }

    /// Mark the message as fully written to the transport
    pub fn sent(self) -> Handshake<LocalMessageSent> {
        let Signed { local_secret, .. } = self.stage;
        Handshake {
            keys: self.keys,
            peer: self.peer,
            primitives: self.primitives,
            stage: LocalMessageSent { local_secret },
        }
    }
}

impl Handshake<LocalMessageSent> {
    /// Parse the peer's message. `bytes` must be exactly one message long.
    pub fn receive(self, bytes: &[u8]) -> Result<Handshake<RemoteMessageReceived>> {
        let remote = HandshakeMessage::from_bytes(
            self.primitives.ciphertext_size(),
            self.primitives.signature_size(),
            bytes,
        )?;

        let LocalMessageSent { local_secret } = self.stage;
        Ok(Handshake {
            keys: self.keys,
            peer: self.peer,
            primitives: self.primitives,
            stage: RemoteMessageReceived { local_secret, remote },
        })
    }
}

impl Handshake<RemoteMessageReceived> {
    /// The unauthenticated remote message
    pub fn remote_message(&self) -> &HandshakeMessage {
        &self.stage.remote
    }

    /// Check the remote signature over the remote ciphertext
    pub fn verify(self) -> Result<Handshake<RemoteVerified>> {
        let remote = &self.stage.remote;
        self.primitives.signer().verify(
            &remote.ciphertext,
            &remote.signature,
            self.peer.verifying().as_bytes(),
        )?;

        let RemoteMessageReceived { local_secret, remote } = self.stage;
        Ok(Handshake {
            keys: self.keys,
            peer: self.peer,
            primitives: self.primitives,
            stage: RemoteVerified {
                local_secret,
                remote_ciphertext: remote.ciphertext,
            },
        })
    }
}

impl Handshake<RemoteVerified> {
    /// Decapsulate the remote ciphertext and combine both shared secrets
    pub fn establish(self) -> Result<SessionSecret> {
        let remote_secret = self
            .primitives
            .kem()
            .decapsulate(&self.stage.remote_ciphertext, self.keys.kem().secret.as_bytes())?;
        let remote_secret = SharedSecret::new(remote_secret);

        let secret = SessionSecret::combine(&self.stage.local_secret, &remote_secret)?;
        if secret.is_degenerate() {
            return Err(Error::DegenerateSecret);
        }
        Ok(secret)
    }
}

impl<S: fmt::Debug> fmt::Debug for Handshake<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handshake")
            .field("suite", &self.suite())
            .field("stage", &self.stage)
            .finish()
    }
}
