//! Handshake engines.
//!
//! Each engine drives one [`Handshake`](crate::protocol::handshake::Handshake)
//! over a transport and records the observable
//! [`HandshakeState`](crate::core::session::HandshakeState). An engine serves exactly one
//! attempt; create a new one per connection.

mod common;

pub mod sync_engine;

#[cfg(feature = "async")]
pub mod async_engine;

pub use common::CancellationToken;
pub use sync_engine::HandshakeEngine;

#[cfg(feature = "async")]
pub use async_engine::AsyncHandshakeEngine;
