/*!
Long-term key material for the PQC tunnel.

A party owns one KEM key pair and one signature key pair, kept in separate
named fields. Every key carries the algorithm it belongs to, and construction
rejects byte strings of the wrong length, so a key can never be handed to a
primitive of a different parameter set. Secret halves are wiped on drop.
*/

use std::fmt;

use zeroize::Zeroizing;

use crate::core::crypto::{CipherSuite, KemAlgorithm, Primitives, SignatureAlgorithm};
use crate::core::error::{CryptoError, Error, Result};

fn check_length(what: &'static str, expected: usize, actual: usize) -> std::result::Result<(), CryptoError> {
    if expected != actual {
        return Err(CryptoError::UnexpectedLength { what, expected, actual });
    }
    Ok(())
}

/// KEM encapsulation key
#[derive(Clone, PartialEq, Eq)]
pub struct KemPublicKey {
    algorithm: KemAlgorithm,
    bytes: Vec<u8>,
}

impl KemPublicKey {
    /// Wrap public key bytes, checking them against `algorithm`
    pub fn from_bytes(algorithm: KemAlgorithm, bytes: &[u8]) -> Result<Self> {
        check_length("KEM public key", algorithm.public_key_size(), bytes.len())
            .map_err(Error::InvalidKey)?;
        Ok(Self { algorithm, bytes: bytes.to_vec() })
    }

    pub fn algorithm(&self) -> KemAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for KemPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KemPublicKey({}, {} bytes)", self.algorithm, self.bytes.len())
    }
}

/// KEM decapsulation key
#[derive(Clone)]
pub struct KemSecretKey {
    algorithm: KemAlgorithm,
    bytes: Zeroizing<Vec<u8>>,
}

impl KemSecretKey {
    /// Wrap secret key bytes, checking them against `algorithm`
    pub fn from_bytes(algorithm: KemAlgorithm, bytes: &[u8]) -> Result<Self> {
        check_length("KEM secret key", algorithm.secret_key_size(), bytes.len())
            .map_err(Error::InvalidKey)?;
        Ok(Self { algorithm, bytes: Zeroizing::new(bytes.to_vec()) })
    }

    pub fn algorithm(&self) -> KemAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for KemSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KemSecretKey({}, [REDACTED])", self.algorithm)
    }
}

/// Signature verification key
#[derive(Clone, PartialEq, Eq)]
pub struct VerifyingKey {
    algorithm: SignatureAlgorithm,
    bytes: Vec<u8>,
}

impl VerifyingKey {
    /// Wrap verifying key bytes, checking them against `algorithm`
    pub fn from_bytes(algorithm: SignatureAlgorithm, bytes: &[u8]) -> Result<Self> {
        check_length("verifying key", algorithm.public_key_size(), bytes.len())
            .map_err(Error::InvalidKey)?;
        Ok(Self { algorithm, bytes: bytes.to_vec() })
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerifyingKey({}, {} bytes)", self.algorithm, self.bytes.len())
    }
}

/// Signature signing key
#[derive(Clone)]
pub struct SigningKey {
    algorithm: SignatureAlgorithm,
    bytes: Zeroizing<Vec<u8>>,
}

impl SigningKey {
    /// Wrap signing key bytes, checking them against `algorithm`
    pub fn from_bytes(algorithm: SignatureAlgorithm, bytes: &[u8]) -> Result<Self> {
        check_length("signing key", algorithm.secret_key_size(), bytes.len())
            .map_err(Error::InvalidKey)?;
        Ok(Self { algorithm, bytes: Zeroizing::new(bytes.to_vec()) })
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey({}, [REDACTED])", self.algorithm)
    }
}

/// A KEM key pair
#[derive(Debug, Clone)]
pub struct KemKeyPair {
    pub public: KemPublicKey,
    pub secret: KemSecretKey,
}

impl KemKeyPair {
    /// Pair two halves of the same algorithm
    pub fn new(public: KemPublicKey, secret: KemSecretKey) -> Result<Self> {
        if public.algorithm() != secret.algorithm() {
            return Err(Error::AlgorithmMismatch {
                local: secret.algorithm().to_string(),
                remote: public.algorithm().to_string(),
            });
        }
        Ok(Self { public, secret })
    }

    pub fn algorithm(&self) -> KemAlgorithm {
        self.public.algorithm()
    }
}

/// A signature key pair
#[derive(Debug, Clone)]
pub struct SignatureKeyPair {
    pub public: VerifyingKey,
    pub secret: SigningKey,
}

impl SignatureKeyPair {
    /// Pair two halves of the same algorithm
    pub fn new(public: VerifyingKey, secret: SigningKey) -> Result<Self> {
        if public.algorithm() != secret.algorithm() {
            return Err(Error::AlgorithmMismatch {
                local: secret.algorithm().to_string(),
                remote: public.algorithm().to_string(),
            });
        }
        Ok(Self { public, secret })
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.public.algorithm()
    }
}

/// Long-term keys of the local party.
///
/// Immutable once built; share it between concurrent handshakes with `Arc`.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    kem: KemKeyPair,
    signature: SignatureKeyPair,
}

impl KeyMaterial {
    /// Generate fresh key pairs for `suite` with the pqcrypto backends
    pub fn generate(suite: CipherSuite) -> Result<Self> {
        Self::generate_with(&Primitives::for_suite(suite))
    }

    /// Generate fresh key pairs with the given primitives
    pub fn generate_with(primitives: &Primitives) -> Result<Self> {
        let kem_alg = primitives.kem().algorithm();
        let sig_alg = primitives.signer().algorithm();

        let (kem_pk, kem_sk) = primitives
            .kem()
            .generate_keypair()
            .map_err(|_| Error::KeyGeneration(CryptoError::OperationFailed))?;
        check_length("KEM public key", kem_alg.public_key_size(), kem_pk.len())
            .map_err(Error::KeyGeneration)?;
        check_length("KEM secret key", kem_alg.secret_key_size(), kem_sk.len())
            .map_err(Error::KeyGeneration)?;

        let (sig_pk, sig_sk) = primitives
            .signer()
            .generate_keypair()
            .map_err(|_| Error::KeyGeneration(CryptoError::OperationFailed))?;
        check_length("verifying key", sig_alg.public_key_size(), sig_pk.len())
            .map_err(Error::KeyGeneration)?;
        check_length("signing key", sig_alg.secret_key_size(), sig_sk.len())
            .map_err(Error::KeyGeneration)?;

        Ok(Self {
            kem: KemKeyPair {
                public: KemPublicKey { algorithm: kem_alg, bytes: kem_pk },
                secret: KemSecretKey { algorithm: kem_alg, bytes: kem_sk },
            },
            signature: SignatureKeyPair {
                public: VerifyingKey { algorithm: sig_alg, bytes: sig_pk },
                secret: SigningKey { algorithm: sig_alg, bytes: sig_sk },
            },
        })
    }

    /// Assemble key material from existing key pairs
    pub fn from_key_pairs(kem: KemKeyPair, signature: SignatureKeyPair) -> Self {
        Self { kem, signature }
    }

    pub fn kem(&self) -> &KemKeyPair {
        &self.kem
    }

    pub fn signature(&self) -> &SignatureKeyPair {
        &self.signature
    }

    pub fn suite(&self) -> CipherSuite {
        CipherSuite::new(self.kem.algorithm(), self.signature.algorithm())
    }

    /// The public halves, as a peer would receive them
    pub fn public_identity(&self) -> PeerKeys {
        PeerKeys {
            kem: self.kem.public.clone(),
            verifying: self.signature.public.clone(),
        }
    }
}

/// The remote party's public keys, obtained out of band
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerKeys {
    kem: KemPublicKey,
    verifying: VerifyingKey,
}

impl PeerKeys {
    pub fn new(kem: KemPublicKey, verifying: VerifyingKey) -> Self {
        Self { kem, verifying }
    }

    /// Parse a peer's public keys for `suite`
    pub fn from_bytes(suite: CipherSuite, kem_public: &[u8], verifying: &[u8]) -> Result<Self> {
        Ok(Self {
            kem: KemPublicKey::from_bytes(suite.kem, kem_public)?,
            verifying: VerifyingKey::from_bytes(suite.signature, verifying)?,
        })
    }

    pub fn kem(&self) -> &KemPublicKey {
        &self.kem
    }

    pub fn verifying(&self) -> &VerifyingKey {
        &self.verifying
    }

    pub fn suite(&self) -> CipherSuite {
        CipherSuite::new(self.kem.algorithm(), self.verifying.algorithm())
    }
}
