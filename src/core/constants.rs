/*!
Constants for the PQC tunnel.

This module contains the algorithm sizes the wire format depends on and the
defaults for key management.
*/

/// Size constants for the supported parameter sets
pub mod sizes {
    /// CRYSTALS-Kyber constants
    pub mod kyber {
        /// Size of Kyber768 public key in bytes
        pub const PUBLIC_KEY_BYTES: usize = 1184;

        /// Size of Kyber768 secret key in bytes
        pub const SECRET_KEY_BYTES: usize = 2400;

        /// Size of Kyber768 ciphertext in bytes
        pub const CIPHERTEXT_BYTES: usize = 1088;

        /// Size of Kyber shared secret in bytes (all parameter sets)
        pub const SHARED_SECRET_BYTES: usize = 32;
    }

    /// CRYSTALS-Dilithium constants
    pub mod dilithium {
        /// Size of Dilithium3 public key in bytes
        pub const PUBLIC_KEY_BYTES: usize = 1952;

        /// Size of Dilithium3 signature in bytes
        pub const SIGNATURE_BYTES: usize = 3309;
    }

    /// Handshake message size for the default suite (Kyber768 + Dilithium3)
    pub const DEFAULT_WIRE_MESSAGE_BYTES: usize =
        kyber::CIPHERTEXT_BYTES + dilithium::SIGNATURE_BYTES;

    /// Size of the random key identifier
    pub const KEY_ID_BYTES: usize = 16;

    /// Size of keys produced by `SessionSecret::derive_key`
    pub const DERIVED_KEY_BYTES: usize = 32;
}

/// Default salt for HKDF expansion of the session secret
pub const HKDF_SALT: &[u8] = b"PQC-Tunnel-v1-Key-Derivation";

/// Key management defaults
pub mod defaults {
    /// Default interval after which a fresh current key is generated
    pub const KEY_ROTATION_INTERVAL_SECONDS: u64 = 86_400; // 24 hours

    /// Default age after which a key is revoked
    pub const MAX_KEY_AGE_SECONDS: u64 = 604_800; // 7 days
}
