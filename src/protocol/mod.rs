//! Protocol implementation for the PQC tunnel.
//!
//! This module contains the typestate handshake, the transport adapter and
//! the engines that run the handshake over a live stream.

// Typestate handshake
pub mod handshake;

// Byte stream adapter
pub mod transport;

// Sync and async engines
pub mod engine;

// Re-export for convenience
pub use engine::{CancellationToken, HandshakeEngine};
pub use handshake::Handshake;
pub use transport::Transport;

// Re-export async components when the "async" feature is enabled
#[cfg(feature = "async")]
pub use engine::AsyncHandshakeEngine;
