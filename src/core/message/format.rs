/*!
Wire format of the handshake message.

Each party sends exactly one message:

- Ciphertext (`ct` bytes): KEM encapsulation to the peer's public key
- Signature (`sig` bytes): detached signature over the ciphertext

There is no header, version byte or length prefix. Both sizes follow from the
cipher suite, which the peers agree on out of band.
*/

use crate::core::error::{Result, TransportError};

/// One party's handshake contribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeMessage {
    /// KEM ciphertext
    pub ciphertext: Vec<u8>,
    /// Signature over `ciphertext`
    pub signature: Vec<u8>,
}

impl HandshakeMessage {
    pub fn new(ciphertext: Vec<u8>, signature: Vec<u8>) -> Self {
        Self { ciphertext, signature }
    }

    /// Encoded size in bytes
    pub fn len(&self) -> usize {
        self.ciphertext.len() + self.signature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty() && self.signature.is_empty()
    }

    /// Encode as `ciphertext || signature`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len());
        bytes.extend_from_slice(&self.ciphertext);
        bytes.extend_from_slice(&self.signature);
        bytes
    }

    /// Split a received message at the ciphertext size.
    ///
    /// The input must be exactly `ciphertext_size + signature_size` bytes.
    pub fn from_bytes(ciphertext_size: usize, signature_size: usize, bytes: &[u8]) -> Result<Self> {
        let expected = ciphertext_size + signature_size;

        if bytes.len() < expected {
            return Err(TransportError::IncompleteMessage {
                expected,
                received: bytes.len(),
            }
            .into());
        }
        if bytes.len() > expected {
            return Err(TransportError::MessageTooLong {
                expected,
                actual: bytes.len(),
            }
            .into());
        }

        let (ciphertext, signature) = bytes.split_at(ciphertext_size);
        Ok(Self {
            ciphertext: ciphertext.to_vec(),
            signature: signature.to_vec(),
        })
    }
}
