/*!
Cryptographic algorithm configuration for the PQC tunnel.

Both peers must agree on the cipher suite out of band; nothing about the
algorithms is sent on the wire.
*/

use std::fmt;

use pqcrypto_dilithium::{dilithium2, dilithium3, dilithium5};
use pqcrypto_kyber::{kyber512, kyber768, kyber1024};

/// Supported Key Encapsulation Mechanisms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum KemAlgorithm {
    /// CRYSTALS-Kyber KEM (Kyber512) - for resource-constrained environments
    Kyber512,
    /// CRYSTALS-Kyber KEM (Kyber768)
    #[default]
    Kyber768,
    /// CRYSTALS-Kyber KEM (Kyber1024) - highest security level
    Kyber1024,
}

impl KemAlgorithm {
    /// Public (encapsulation) key size in bytes
    pub fn public_key_size(&self) -> usize {
        match self {
            KemAlgorithm::Kyber512 => kyber512::public_key_bytes(),
            KemAlgorithm::Kyber768 => kyber768::public_key_bytes(),
            KemAlgorithm::Kyber1024 => kyber1024::public_key_bytes(),
        }
    }

    /// Secret (decapsulation) key size in bytes
    pub fn secret_key_size(&self) -> usize {
        match self {
            KemAlgorithm::Kyber512 => kyber512::secret_key_bytes(),
            KemAlgorithm::Kyber768 => kyber768::secret_key_bytes(),
            KemAlgorithm::Kyber1024 => kyber1024::secret_key_bytes(),
        }
    }

    /// Ciphertext size in bytes
    pub fn ciphertext_size(&self) -> usize {
        match self {
            KemAlgorithm::Kyber512 => kyber512::ciphertext_bytes(),
            KemAlgorithm::Kyber768 => kyber768::ciphertext_bytes(),
            KemAlgorithm::Kyber1024 => kyber1024::ciphertext_bytes(),
        }
    }

    /// Shared secret size in bytes
    pub fn shared_secret_size(&self) -> usize {
        match self {
            KemAlgorithm::Kyber512 => kyber512::shared_secret_bytes(),
            KemAlgorithm::Kyber768 => kyber768::shared_secret_bytes(),
            KemAlgorithm::Kyber1024 => kyber1024::shared_secret_bytes(),
        }
    }
}

impl fmt::Display for KemAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KemAlgorithm::Kyber512 => write!(f, "Kyber512"),
            KemAlgorithm::Kyber768 => write!(f, "Kyber768"),
            KemAlgorithm::Kyber1024 => write!(f, "Kyber1024"),
        }
    }
}

/// Supported Digital Signature Algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum SignatureAlgorithm {
    /// CRYSTALS-Dilithium (dilithium2) - for resource-constrained environments
    Dilithium2,
    /// CRYSTALS-Dilithium (dilithium3)
    #[default]
    Dilithium3,
    /// CRYSTALS-Dilithium (dilithium5) - highest security level
    Dilithium5,
}

impl SignatureAlgorithm {
    /// Verifying key size in bytes
    pub fn public_key_size(&self) -> usize {
        match self {
            SignatureAlgorithm::Dilithium2 => dilithium2::public_key_bytes(),
            SignatureAlgorithm::Dilithium3 => dilithium3::public_key_bytes(),
            SignatureAlgorithm::Dilithium5 => dilithium5::public_key_bytes(),
        }
    }

    /// Signing key size in bytes
    pub fn secret_key_size(&self) -> usize {
        match self {
            SignatureAlgorithm::Dilithium2 => dilithium2::secret_key_bytes(),
            SignatureAlgorithm::Dilithium3 => dilithium3::secret_key_bytes(),
            SignatureAlgorithm::Dilithium5 => dilithium5::secret_key_bytes(),
        }
    }

    /// Detached signature size in bytes
    pub fn signature_size(&self) -> usize {
        match self {
            SignatureAlgorithm::Dilithium2 => dilithium2::signature_bytes(),
            SignatureAlgorithm::Dilithium3 => dilithium3::signature_bytes(),
            SignatureAlgorithm::Dilithium5 => dilithium5::signature_bytes(),
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureAlgorithm::Dilithium2 => write!(f, "Dilithium2"),
            SignatureAlgorithm::Dilithium3 => write!(f, "Dilithium3"),
            SignatureAlgorithm::Dilithium5 => write!(f, "Dilithium5"),
        }
    }
}

/// The pair of algorithms a handshake runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct CipherSuite {
    /// Key encapsulation mechanism
    pub kem: KemAlgorithm,
    /// Signature algorithm authenticating the ciphertext
    pub signature: SignatureAlgorithm,
}

impl CipherSuite {
    /// Create a suite from explicit algorithms
    pub fn new(kem: KemAlgorithm, signature: SignatureAlgorithm) -> Self {
        Self { kem, signature }
    }

    /// Suite for resource-constrained environments
    pub fn lightweight() -> Self {
        Self::new(KemAlgorithm::Kyber512, SignatureAlgorithm::Dilithium2)
    }

    /// Suite with the highest security level
    pub fn high_security() -> Self {
        Self::new(KemAlgorithm::Kyber1024, SignatureAlgorithm::Dilithium5)
    }

    /// Total size of one handshake message on the wire
    pub fn wire_message_size(&self) -> usize {
        self.kem.ciphertext_size() + self.signature.signature_size()
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.kem, self.signature)
    }
}
