/*!
Traits for key encapsulation.
*/

use zeroize::Zeroizing;

use crate::core::crypto::config::KemAlgorithm;
use crate::core::error::Result;

/// Trait for key encapsulation operations
pub trait KeyExchange: Send + Sync {
    /// Generate a key pair, returned as `(public_key, secret_key)`
    fn generate_keypair(&self) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>)>;

    /// Encapsulate a fresh shared secret to the receiver's public key.
    ///
    /// Returns `(shared_secret, ciphertext)`.
    fn encapsulate(&self, public_key: &[u8]) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>)>;

    /// Recover the shared secret from a ciphertext addressed to `secret_key`
    fn decapsulate(&self, ciphertext: &[u8], secret_key: &[u8]) -> Result<Zeroizing<Vec<u8>>>;

    /// Get the algorithm
    fn algorithm(&self) -> KemAlgorithm;

    fn public_key_size(&self) -> usize {
        self.algorithm().public_key_size()
    }

    fn secret_key_size(&self) -> usize {
        self.algorithm().secret_key_size()
    }

    fn ciphertext_size(&self) -> usize {
        self.algorithm().ciphertext_size()
    }

    fn shared_secret_size(&self) -> usize {
        self.algorithm().shared_secret_size()
    }
}
