/*!
Key encapsulation algorithm implementations.
*/

mod kyber;

use std::sync::Arc;

use crate::core::crypto::config::KemAlgorithm;
use crate::core::crypto::traits::kex::KeyExchange;

pub use kyber::KyberKeyExchange;

/// Create a key exchange implementation for the specified algorithm
pub fn create_key_exchange(algorithm: KemAlgorithm) -> Arc<dyn KeyExchange> {
    Arc::new(KyberKeyExchange::new(algorithm))
}
