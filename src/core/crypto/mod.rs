/*!
Cryptographic components for the PQC tunnel.

This module provides the KEM and signature primitives used by the handshake.
[`Primitives`] bundles one implementation of each so the protocol code never
names a concrete algorithm.
*/

// Algorithm selection
pub mod config;

// Trait seams for the primitives
pub mod traits;

// Kyber and Dilithium backends
pub mod algorithms;

use std::fmt;
use std::sync::Arc;

pub use config::{CipherSuite, KemAlgorithm, SignatureAlgorithm};
pub use traits::{KeyExchange, Signature};

/// The pair of primitives a handshake runs with
#[derive(Clone)]
pub struct Primitives {
    kem: Arc<dyn KeyExchange>,
    signer: Arc<dyn Signature>,
}

impl Primitives {
    /// Bundle custom primitive implementations
    pub fn new(kem: Arc<dyn KeyExchange>, signer: Arc<dyn Signature>) -> Self {
        Self { kem, signer }
    }

    /// The pqcrypto backends for `suite`
    pub fn for_suite(suite: CipherSuite) -> Self {
        Self {
            kem: algorithms::create_key_exchange(suite.kem),
            signer: algorithms::create_authenticator(suite.signature),
        }
    }

    /// The key encapsulation primitive
    pub fn kem(&self) -> &dyn KeyExchange {
        self.kem.as_ref()
    }

    /// The signature primitive
    pub fn signer(&self) -> &dyn Signature {
        self.signer.as_ref()
    }

    /// The suite these primitives implement
    pub fn suite(&self) -> CipherSuite {
        CipherSuite::new(self.kem.algorithm(), self.signer.algorithm())
    }

    /// Ciphertext size as reported by the KEM
    pub fn ciphertext_size(&self) -> usize {
        self.kem.ciphertext_size()
    }

    /// Signature size as reported by the signer
    pub fn signature_size(&self) -> usize {
        self.signer.signature_size()
    }

    /// Size of one handshake message produced with these primitives
    pub fn message_size(&self) -> usize {
        self.ciphertext_size() + self.signature_size()
    }
}

impl Default for Primitives {
    fn default() -> Self {
        Self::for_suite(CipherSuite::default())
    }
}

impl fmt::Debug for Primitives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitives")
            .field("suite", &self.suite())
            .finish()
    }
}
