/*!
CRYSTALS-Dilithium detached signatures.
*/

use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};
use zeroize::Zeroizing;

use crate::core::crypto::config::SignatureAlgorithm;
use crate::core::crypto::traits::signature::Signature;
use crate::core::error::{AuthError, CryptoError, Error, Result};

// Runs `$body` with `$m` bound to the pqcrypto module for `$alg`.
macro_rules! with_dilithium {
    ($alg:expr, $m:ident => $body:expr) => {
        match $alg {
            SignatureAlgorithm::Dilithium2 => {
                use pqcrypto_dilithium::dilithium2 as $m;
                $body
            }
            SignatureAlgorithm::Dilithium3 => {
                use pqcrypto_dilithium::dilithium3 as $m;
                $body
            }
            SignatureAlgorithm::Dilithium5 => {
                use pqcrypto_dilithium::dilithium5 as $m;
                $body
            }
        }
    };
}

/// Dilithium signature implementation
#[derive(Debug, Clone, Copy)]
pub struct DilithiumAuthenticator {
    algorithm: SignatureAlgorithm,
}

impl DilithiumAuthenticator {
    /// Create a new DilithiumAuthenticator with the specified parameter set
    pub fn new(algorithm: SignatureAlgorithm) -> Self {
        Self { algorithm }
    }
}

impl Signature for DilithiumAuthenticator {
    fn generate_keypair(&self) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>)> {
        with_dilithium!(self.algorithm, m => {
            let (pk, sk) = m::keypair();
            Ok((pk.as_bytes().to_vec(), Zeroizing::new(sk.as_bytes().to_vec())))
        })
    }

    fn sign(&self, data: &[u8], secret_key: &[u8]) -> Result<Vec<u8>> {
        with_dilithium!(self.algorithm, m => {
            let sk = m::SecretKey::from_bytes(secret_key)
                .map_err(|_| Error::Signature(CryptoError::InvalidKeyFormat))?;
            let signature = m::detached_sign(data, &sk);
            Ok(signature.as_bytes().to_vec())
        })
    }

    fn verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> Result<()> {
        with_dilithium!(self.algorithm, m => {
            let pk = m::PublicKey::from_bytes(public_key)
                .map_err(|_| Error::Authentication(AuthError::InvalidKeyFormat))?;
            let sig = m::DetachedSignature::from_bytes(signature)
                .map_err(|_| Error::Authentication(AuthError::InvalidSignatureFormat))?;
            m::verify_detached_signature(&sig, data, &pk)
                .map_err(|_| Error::Authentication(AuthError::SignatureVerificationFailed))
        })
    }

    fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }
}
