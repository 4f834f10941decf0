//! Handshake message encoding.

pub mod format;

pub use format::HandshakeMessage;
