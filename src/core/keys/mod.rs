//! Long-term key material for both handshake roles.

pub mod material;

pub use material::{
    KemKeyPair, KemPublicKey, KemSecretKey, KeyMaterial, PeerKeys, SignatureKeyPair,
    SigningKey, VerifyingKey,
};
