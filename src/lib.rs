/*!
# PQC Tunnel

A mutually authenticated, post-quantum key-establishment handshake over any
reliable byte stream.

## Overview

Each party encapsulates a fresh secret to the other's long-term KEM key,
signs the ciphertext with its long-term signature key and sends
`ciphertext || signature`. After verifying the peer's signature and
decapsulating the peer's ciphertext, both sides hold the same session secret:
the XOR of the two shared secrets.

- CRYSTALS-Kyber (512/768/1024) for key encapsulation
- CRYSTALS-Dilithium (2/3/5) for signatures
- Typestate handshake, so no step can be skipped or repeated
- Blocking engine over std I/O and, with the `async` feature, a tokio engine
- Key ring with time-based rotation and revocation
- Secrets zeroized on drop and compared in constant time

The crate stops at the session secret. It does not encrypt traffic; callers
that need a channel derive keys with [`SessionSecret::derive_key`].

## Example

```no_run
use std::net::TcpStream;
use std::sync::Arc;
use pqc_tunnel::{CipherSuite, HandshakeEngine, KeyMaterial, PeerKeys};

# fn main() -> pqc_tunnel::Result<()> {
let suite = CipherSuite::default();
let keys = Arc::new(KeyMaterial::generate(suite)?);

// Obtained from the peer out of band.
# let peer_kem = vec![0u8; 1184];
# let peer_verifying = vec![0u8; 1952];
let peer = PeerKeys::from_bytes(suite, &peer_kem, &peer_verifying)?;

let stream = TcpStream::connect("127.0.0.1:9000")?;
let secret = HandshakeEngine::new(keys, peer)?.run_split(&stream, &stream)?;
let key = secret.derive_key(b"client->server")?;
# let _ = key;
# Ok(())
# }
```
*/

// Core components
pub mod core;

// Protocol implementation
pub mod protocol;

// Re-export commonly used types for convenience
pub use crate::core::constants::sizes;
pub use crate::core::crypto::{CipherSuite, KemAlgorithm, Primitives, SignatureAlgorithm};
pub use crate::core::crypto::traits::{KeyExchange, Signature};
pub use crate::core::error::{AuthError, CryptoError, Error, Result, TransportError};
pub use crate::core::keys::{
    KemKeyPair, KemPublicKey, KemSecretKey, KeyMaterial, PeerKeys, SignatureKeyPair,
    SigningKey, VerifyingKey,
};
pub use crate::core::memory::{SessionSecret, SharedSecret};
pub use crate::core::message::HandshakeMessage;
pub use crate::core::security::rotation::{KeyId, KeyPolicy, KeyRing};
pub use crate::core::session::{FailureReason, HandshakeState, Role};

pub use crate::protocol::engine::{CancellationToken, HandshakeEngine};
pub use crate::protocol::handshake::Handshake;
pub use crate::protocol::transport::Transport;

#[cfg(feature = "async")]
pub use crate::protocol::engine::AsyncHandshakeEngine;

// Re-export synchronous API components
pub mod sync {
    pub use crate::protocol::engine::sync_engine::HandshakeEngine;
    pub use crate::protocol::transport::{Transport, read_message, write_message};
}

// Re-export asynchronous API components (enabled with the "async" feature)
#[cfg(feature = "async")]
pub mod r#async {
    pub use crate::protocol::engine::async_engine::AsyncHandshakeEngine;
    pub use crate::protocol::transport::{read_message_async, write_message_async};
}
