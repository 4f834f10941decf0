//! Core components for the PQC tunnel.
//!
//! This module contains the building blocks the handshake is assembled
//! from: cryptographic primitives, key material, the wire message format,
//! secret containers, handshake state and error handling.

// Cryptographic primitives
pub mod crypto;

// Long-term key material
pub mod keys;

// Handshake message format
pub mod message;

// Handshake state tracking
pub mod session;

// Secret containers
pub mod memory;

// Constant-time helpers and key rotation
pub mod security;

// Sizes and defaults
pub mod constants;

// Error handling
pub mod error;

// Re-exports for convenience
pub use self::crypto::{CipherSuite, KemAlgorithm, Primitives, SignatureAlgorithm};
pub use self::error::{AuthError, CryptoError, Error, Result, TransportError};
pub use self::keys::{KeyMaterial, PeerKeys};
pub use self::memory::{SessionSecret, SharedSecret};
pub use self::message::HandshakeMessage;
pub use self::session::{FailureReason, HandshakeState, Role};
