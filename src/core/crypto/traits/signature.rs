/*!
Traits for signature operations.
*/

use zeroize::Zeroizing;

use crate::core::crypto::config::SignatureAlgorithm;
use crate::core::error::Result;

/// Trait for detached signature operations
pub trait Signature: Send + Sync {
    /// Generate a key pair, returned as `(verifying_key, signing_key)`
    fn generate_keypair(&self) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>)>;

    /// Produce a detached signature over `data`
    fn sign(&self, data: &[u8], secret_key: &[u8]) -> Result<Vec<u8>>;

    /// Verify a detached signature over `data`
    fn verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> Result<()>;

    /// Get the algorithm
    fn algorithm(&self) -> SignatureAlgorithm;

    fn public_key_size(&self) -> usize {
        self.algorithm().public_key_size()
    }

    fn secret_key_size(&self) -> usize {
        self.algorithm().secret_key_size()
    }

    fn signature_size(&self) -> usize {
        self.algorithm().signature_size()
    }
}
