//! Handshake state tracking.

pub mod state;

pub use self::state::{FailureReason, HandshakeState, Role};
