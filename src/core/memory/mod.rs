//! Containers for secret material produced during a handshake.

pub mod secret;

pub use secret::{SessionSecret, SharedSecret};
