/*!
Handshake state for the PQC tunnel.

The state is recorded by the engines after every transition so callers can
observe how far an attempt progressed. It is linear: there are no retries or
branches within one attempt, and `Failed` is terminal.
*/

use std::fmt;

/// Why a handshake attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    KeyGeneration,
    Encapsulation,
    Decapsulation,
    Signature,
    /// Signature verification of the remote message failed
    Authentication,
    Transport,
    /// The stream ended before a full handshake message arrived
    IncompleteMessage,
    Cancelled,
    AlgorithmMismatch,
    KeyDerivation,
    /// Both shared secrets were identical, e.g. talking to ourselves
    DegenerateSecret,
    InvalidKey,
    InvalidState,
    Config,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureReason::KeyGeneration => "KeyGeneration",
            FailureReason::Encapsulation => "Encapsulation",
            FailureReason::Decapsulation => "Decapsulation",
            FailureReason::Signature => "Signature",
            FailureReason::Authentication => "Authentication",
            FailureReason::Transport => "Transport",
            FailureReason::IncompleteMessage => "IncompleteMessage",
            FailureReason::Cancelled => "Cancelled",
            FailureReason::AlgorithmMismatch => "AlgorithmMismatch",
            FailureReason::KeyDerivation => "KeyDerivation",
            FailureReason::DegenerateSecret => "DegenerateSecret",
            FailureReason::InvalidKey => "InvalidKey",
            FailureReason::InvalidState => "InvalidState",
            FailureReason::Config => "Config",
        };
        f.write_str(name)
    }
}

/// Progress of a single handshake attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Nothing has happened yet
    Idle,
    /// Encapsulated against the remote KEM public key
    LocalEncapsulated,
    /// Local ciphertext and signature fully written
    LocalMessageSent,
    /// Remote message fully read
    RemoteMessageReceived,
    /// Remote signature verified
    RemoteVerified,
    /// Session secret derived; the engine is now inert
    Established,
    /// Attempt aborted; terminal
    Failed(FailureReason),
}

impl HandshakeState {
    /// Whether the attempt has finished, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(self, HandshakeState::Established | HandshakeState::Failed(_))
    }

    /// The failure reason, if the attempt failed
    pub fn failure(&self) -> Option<FailureReason> {
        match self {
            HandshakeState::Failed(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl fmt::Display for HandshakeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakeState::Idle => write!(f, "Idle"),
            HandshakeState::LocalEncapsulated => write!(f, "LocalEncapsulated"),
            HandshakeState::LocalMessageSent => write!(f, "LocalMessageSent"),
            HandshakeState::RemoteMessageReceived => write!(f, "RemoteMessageReceived"),
            HandshakeState::RemoteVerified => write!(f, "RemoteVerified"),
            HandshakeState::Established => write!(f, "Established"),
            HandshakeState::Failed(reason) => write!(f, "Failed({})", reason),
        }
    }
}

/// Endpoint role, used to label logs.
///
/// The protocol itself is symmetric: both roles send first and then read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Side that opened the connection
    Initiator,
    /// Side that accepted the connection
    Responder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Initiator => write!(f, "Initiator"),
            Role::Responder => write!(f, "Responder"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!HandshakeState::Idle.is_terminal());
        assert!(!HandshakeState::RemoteVerified.is_terminal());
        assert!(HandshakeState::Established.is_terminal());
        assert!(HandshakeState::Failed(FailureReason::Cancelled).is_terminal());
    }

    #[test]
    fn test_failure_accessor() {
        assert_eq!(HandshakeState::Established.failure(), None);
        assert_eq!(
            HandshakeState::Failed(FailureReason::Authentication).failure(),
            Some(FailureReason::Authentication)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(HandshakeState::LocalMessageSent.to_string(), "LocalMessageSent");
        assert_eq!(
            HandshakeState::Failed(FailureReason::IncompleteMessage).to_string(),
            "Failed(IncompleteMessage)"
        );
        assert_eq!(Role::Responder.to_string(), "Responder");
    }
}
