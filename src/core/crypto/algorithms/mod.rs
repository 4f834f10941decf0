/*!
Implementations of cryptographic algorithms.

This module provides the concrete backends for the
cryptographic traits in `core::crypto::traits`.
*/

// Key encapsulation algorithms
pub mod kex;

// Signature algorithms
pub mod signatures;

pub use kex::{KyberKeyExchange, create_key_exchange};
pub use signatures::{DilithiumAuthenticator, create_authenticator};
