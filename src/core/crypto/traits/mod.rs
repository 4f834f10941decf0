/*!
Core traits for cryptographic operations.

The handshake only talks to primitives through these traits, so additional
parameter sets or test doubles can be plugged in without touching the
protocol code.
*/

pub mod kex;
pub mod signature;

pub use kex::KeyExchange;
pub use signature::Signature;
