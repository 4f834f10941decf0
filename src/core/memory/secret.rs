/*!
Secret containers produced by the handshake.

Both types wipe their bytes when dropped and never print them.
*/

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::core::constants::{HKDF_SALT, sizes::DERIVED_KEY_BYTES};
use crate::core::error::{CryptoError, Error, Result};
use crate::core::security::constant_time::{constant_time_eq, is_all_zero};

/// One side's KEM output
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    bytes: Vec<u8>,
}

impl SharedSecret {
    /// Take ownership of KEM output bytes
    pub fn new(bytes: Zeroizing<Vec<u8>>) -> Self {
        Self { bytes: bytes.to_vec() }
    }

    /// Copy a secret from a slice
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self { bytes: bytes.to_vec() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret([REDACTED; {}])", self.bytes.len())
    }
}

/// The secret both parties hold after a successful handshake.
///
/// It is the byte-wise XOR of the shared secret this side encapsulated and
/// the one it decapsulated from the peer, so each party contributes half.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionSecret {
    bytes: Vec<u8>,
}

impl SessionSecret {
    /// Combine the local and remote shared secrets.
    ///
    /// XOR is commutative, so both parties arrive at the same bytes even
    /// though each calls this with the arguments swapped.
    pub fn combine(local: &SharedSecret, remote: &SharedSecret) -> Result<Self> {
        if local.len() != remote.len() {
            return Err(Error::AlgorithmMismatch {
                local: format!("{}-byte shared secret", local.len()),
                remote: format!("{}-byte shared secret", remote.len()),
            });
        }

        let bytes = local
            .as_bytes()
            .iter()
            .zip(remote.as_bytes())
            .map(|(a, b)| a ^ b)
            .collect();

        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the secret is all zero, i.e. both halves were identical
    pub fn is_degenerate(&self) -> bool {
        is_all_zero(&self.bytes)
    }

    /// Expand the session secret into a 32-byte key with HKDF-SHA256.
    ///
    /// `info` separates keys for different purposes, e.g. one per direction.
    pub fn derive_key(&self, info: &[u8]) -> Result<Zeroizing<[u8; DERIVED_KEY_BYTES]>> {
        let hkdf = Hkdf::<Sha256>::new(Some(HKDF_SALT), &self.bytes);
        let mut okm = Zeroizing::new([0u8; DERIVED_KEY_BYTES]);

        hkdf.expand(info, okm.as_mut())
            .map_err(|_| Error::KeyDerivation(CryptoError::OperationFailed))?;

        Ok(okm)
    }
}

impl PartialEq for SessionSecret {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(&self.bytes, &other.bytes)
    }
}

impl Eq for SessionSecret {}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionSecret([REDACTED; {}])", self.bytes.len())
    }
}
