/*!
Constant-time helpers for secret comparisons.

Built on the subtle crate so that comparisons over secret bytes do not
branch on their contents.
*/

use subtle::{Choice, ConstantTimeEq};

/// Compare two byte slices for equality in constant time.
///
/// Slices of different lengths compare unequal; only the length is allowed
/// to leak through timing.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Whether every byte of `bytes` is zero, evaluated without early exit.
pub fn is_all_zero(bytes: &[u8]) -> bool {
    let acc = bytes.iter().fold(0u8, |acc, b| acc | b);
    let zero: Choice = acc.ct_eq(&0u8);
    zero.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_is_all_zero() {
        assert!(is_all_zero(&[0u8; 32]));
        assert!(!is_all_zero(&[0, 0, 0, 1]));
        assert!(!is_all_zero(&[0x80, 0, 0, 0]));
        assert!(is_all_zero(&[]));
    }
}
