/*!
Security utilities for the PQC tunnel.

This module provides constant-time helpers and the key ring that rotates
long-term key material.
*/

// Constant-time operations to prevent timing attacks
pub mod constant_time;

// Key rotation and revocation
pub mod rotation;

pub use constant_time::{constant_time_eq, is_all_zero};
pub use rotation::{KeyId, KeyPolicy, KeyRing};
