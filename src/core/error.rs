/*!
Error handling for the PQC tunnel handshake.

Every failure aborts the current handshake attempt. Cryptographic errors carry
deliberately terse messages; the variant tells the caller whether the failure
is security relevant (authentication) or most likely transient (transport).
*/

use std::io;
use thiserror::Error;

use crate::core::session::state::FailureReason;

/// Result type for the PQC tunnel
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the PQC tunnel
#[derive(Error, Debug)]
pub enum Error {
    /// Key pair generation failed
    #[error("Key generation failed")]
    KeyGeneration(#[source] CryptoError),

    /// KEM encapsulation against the remote public key failed
    #[error("Key encapsulation failed")]
    Encapsulation(#[source] CryptoError),

    /// KEM decapsulation of the remote ciphertext failed
    #[error("Key decapsulation failed")]
    Decapsulation(#[source] CryptoError),

    /// Signing the local ciphertext failed
    #[error("Signing failed")]
    Signature(#[source] CryptoError),

    /// The remote handshake message did not authenticate
    #[error("Authentication failed")]
    Authentication(#[source] AuthError),

    /// The transport failed or ended early
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The attempt was cancelled by the caller
    #[error("Handshake cancelled")]
    Cancelled,

    /// Local and remote parties do not use the same algorithms
    #[error("Algorithm mismatch: local {local}, remote {remote}")]
    AlgorithmMismatch {
        local: String,
        remote: String,
    },

    /// Expanding the session secret into a key failed
    #[error("Key derivation failed")]
    KeyDerivation(#[source] CryptoError),

    /// The combined session secret is all zero
    #[error("Derived session secret is degenerate")]
    DegenerateSecret,

    /// Key bytes do not match their declared algorithm
    #[error("Invalid key")]
    InvalidKey(#[source] CryptoError),

    /// Engine is not in the state required for the operation
    #[error("Handshake not in correct state: expected {expected}, but was {actual}")]
    InvalidState {
        expected: String,
        actual: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Cryptographic errors with limited details to prevent leaking information
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Key bytes could not be parsed by the primitive
    #[error("Invalid key format")]
    InvalidKeyFormat,

    /// Ciphertext bytes could not be parsed by the primitive
    #[error("Invalid ciphertext")]
    InvalidCiphertext,

    /// A buffer has the wrong size for its algorithm
    #[error("Unexpected {what} length: expected {expected}, got {actual}")]
    UnexpectedLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Generic cryptographic operation error
    #[error("Cryptographic operation failed")]
    OperationFailed,
}

/// Authentication errors with limited details to prevent leaking information
#[derive(Error, Debug)]
pub enum AuthError {
    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Signature bytes could not be parsed
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Verifying key bytes could not be parsed
    #[error("Invalid key format")]
    InvalidKeyFormat,
}

/// Transport failures while exchanging handshake messages
#[derive(Error, Debug)]
pub enum TransportError {
    /// The stream ended before the full fixed-size message arrived
    #[error("Incomplete handshake message: expected {expected} bytes, received {received}")]
    IncompleteMessage {
        expected: usize,
        received: usize,
    },

    /// More bytes than the fixed message size were handed to the decoder
    #[error("Handshake message too long: expected {expected} bytes, got {actual}")]
    MessageTooLong {
        expected: usize,
        actual: usize,
    },

    /// The stream stopped accepting bytes before the message was written
    #[error("Transport accepted {written} of {expected} bytes")]
    WriteZero {
        written: usize,
        expected: usize,
    },

    /// Underlying I/O failure
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Transport(TransportError::Io(error))
    }
}

impl Error {
    /// Classify this error for the handshake state machine
    pub fn reason(&self) -> FailureReason {
        match self {
            Error::KeyGeneration(_) => FailureReason::KeyGeneration,
            Error::Encapsulation(_) => FailureReason::Encapsulation,
            Error::Decapsulation(_) => FailureReason::Decapsulation,
            Error::Signature(_) => FailureReason::Signature,
            Error::Authentication(_) => FailureReason::Authentication,
            Error::Transport(TransportError::IncompleteMessage { .. }) => {
                FailureReason::IncompleteMessage
            }
            Error::Transport(_) => FailureReason::Transport,
            Error::Cancelled => FailureReason::Cancelled,
            Error::AlgorithmMismatch { .. } => FailureReason::AlgorithmMismatch,
            Error::KeyDerivation(_) => FailureReason::KeyDerivation,
            Error::DegenerateSecret => FailureReason::DegenerateSecret,
            Error::InvalidKey(_) => FailureReason::InvalidKey,
            Error::InvalidState { .. } => FailureReason::InvalidState,
            Error::Config(_) => FailureReason::Config,
        }
    }

    /// Whether this failure should be treated as a potential active attack
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Error::Authentication(_) | Error::DegenerateSecret)
    }

    /// Whether a fresh attempt with a new engine may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Cancelled)
    }
}

/// Create an invalid state error
#[macro_export]
macro_rules! invalid_state_err {
    ($expected:expr, $actual:expr) => {
        Err($crate::core::error::Error::InvalidState {
            expected: $expected.to_string(),
            actual: $actual.to_string(),
        })
    };
}

/// Convert from Error to io::Error (for compatibility)
impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::Transport(TransportError::Io(io_error)) => io_error,
            Error::Transport(TransportError::IncompleteMessage { expected, received }) => {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("Incomplete handshake message: {} of {} bytes", received, expected),
                )
            }
            Error::Transport(TransportError::WriteZero { .. }) => {
                io::Error::new(io::ErrorKind::WriteZero, "Transport stopped accepting bytes")
            }
            Error::Transport(other) => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
            Error::Authentication(_) | Error::DegenerateSecret => {
                io::Error::new(io::ErrorKind::PermissionDenied, "Authentication error")
            }
            Error::Cancelled => io::Error::new(io::ErrorKind::Interrupted, "Handshake cancelled"),
            Error::InvalidState { expected, actual } => io::Error::new(
                io::ErrorKind::NotConnected,
                format!("Invalid state: expected {}, but was {}", expected, actual),
            ),
            Error::Config(msg) => io::Error::new(io::ErrorKind::InvalidInput, msg),
            other => io::Error::new(io::ErrorKind::ConnectionRefused, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Authentication(AuthError::SignatureVerificationFailed);
        assert_eq!(format!("{}", err), "Authentication failed");

        let err = Error::Transport(TransportError::IncompleteMessage {
            expected: 4397,
            received: 100,
        });
        assert_eq!(
            format!("{}", err),
            "Transport error: Incomplete handshake message: expected 4397 bytes, received 100"
        );

        let err = Error::AlgorithmMismatch {
            local: "Kyber768".into(),
            remote: "Kyber512".into(),
        };
        assert_eq!(format!("{}", err), "Algorithm mismatch: local Kyber768, remote Kyber512");
    }

    #[test]
    fn test_classification() {
        let auth = Error::Authentication(AuthError::SignatureVerificationFailed);
        assert!(auth.is_authentication_failure());
        assert!(!auth.is_retryable());
        assert_eq!(auth.reason(), FailureReason::Authentication);

        let eof = Error::Transport(TransportError::IncompleteMessage {
            expected: 10,
            received: 3,
        });
        assert!(eof.is_retryable());
        assert!(!eof.is_authentication_failure());
        assert_eq!(eof.reason(), FailureReason::IncompleteMessage);

        assert!(Error::Cancelled.is_retryable());
        assert!(Error::DegenerateSecret.is_authentication_failure());
    }

    #[test]
    fn test_io_error_conversion() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "pipe").into();
        assert_eq!(err.reason(), FailureReason::Transport);

        let io_err = io::Error::from(err);
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);

        let io_err = io::Error::from(Error::Authentication(AuthError::InvalidSignatureFormat));
        assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_invalid_state_macro() {
        fn check() -> Result<()> {
            invalid_state_err!("Idle", "Established")
        }

        match check() {
            Err(Error::InvalidState { expected, actual }) => {
                assert_eq!(expected, "Idle");
                assert_eq!(actual, "Established");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
