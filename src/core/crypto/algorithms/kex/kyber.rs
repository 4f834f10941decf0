/*!
CRYSTALS-Kyber key encapsulation.

All three parameter sets are always compiled in; the algorithm is chosen at
construction time.
*/

use pqcrypto_traits::kem::{
    Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _,
};
use zeroize::Zeroizing;

use crate::core::crypto::config::KemAlgorithm;
use crate::core::crypto::traits::kex::KeyExchange;
use crate::core::error::{CryptoError, Error, Result};

// Runs `$body` with `$m` bound to the pqcrypto module for `$alg`.
macro_rules! with_kyber {
    ($alg:expr, $m:ident => $body:expr) => {
        match $alg {
            KemAlgorithm::Kyber512 => {
                use pqcrypto_kyber::kyber512 as $m;
                $body
            }
            KemAlgorithm::Kyber768 => {
                use pqcrypto_kyber::kyber768 as $m;
                $body
            }
            KemAlgorithm::Kyber1024 => {
                use pqcrypto_kyber::kyber1024 as $m;
                $body
            }
        }
    };
}

/// Kyber key encapsulation implementation
#[derive(Debug, Clone, Copy)]
pub struct KyberKeyExchange {
    algorithm: KemAlgorithm,
}

impl KyberKeyExchange {
    /// Create a new KyberKeyExchange with the specified parameter set
    pub fn new(algorithm: KemAlgorithm) -> Self {
        Self { algorithm }
    }

    fn check_len(what: &'static str, expected: usize, actual: usize) -> std::result::Result<(), CryptoError> {
        if expected == actual {
            Ok(())
        } else {
            Err(CryptoError::UnexpectedLength { what, expected, actual })
        }
    }
}

impl KeyExchange for KyberKeyExchange {
    fn generate_keypair(&self) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>)> {
        with_kyber!(self.algorithm, m => {
            let (pk, sk) = m::keypair();
            Ok((pk.as_bytes().to_vec(), Zeroizing::new(sk.as_bytes().to_vec())))
        })
    }

    fn encapsulate(&self, public_key: &[u8]) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>)> {
        Self::check_len("KEM public key", self.public_key_size(), public_key.len())
            .map_err(Error::Encapsulation)?;

        with_kyber!(self.algorithm, m => {
            let pk = m::PublicKey::from_bytes(public_key)
                .map_err(|_| Error::Encapsulation(CryptoError::InvalidKeyFormat))?;
            let (ss, ct) = m::encapsulate(&pk);
            Ok((Zeroizing::new(ss.as_bytes().to_vec()), ct.as_bytes().to_vec()))
        })
    }

    fn decapsulate(&self, ciphertext: &[u8], secret_key: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        Self::check_len("ciphertext", self.ciphertext_size(), ciphertext.len())
            .map_err(Error::Decapsulation)?;
        Self::check_len("KEM secret key", self.secret_key_size(), secret_key.len())
            .map_err(Error::Decapsulation)?;

        with_kyber!(self.algorithm, m => {
            let ct = m::Ciphertext::from_bytes(ciphertext)
                .map_err(|_| Error::Decapsulation(CryptoError::InvalidCiphertext))?;
            let sk = m::SecretKey::from_bytes(secret_key)
                .map_err(|_| Error::Decapsulation(CryptoError::InvalidKeyFormat))?;
            let ss = m::decapsulate(&ct, &sk);
            Ok(Zeroizing::new(ss.as_bytes().to_vec()))
        })
    }

    fn algorithm(&self) -> KemAlgorithm {
        self.algorithm
    }
}
