//! Constant-time equality for secret-derived values.
//!
//! All signature comparisons go through [`constant_time_eq`]. Ordinary `==`
//! on signatures short-circuits at the first differing byte and leaks the
//! length of the matching prefix through timing.

use subtle::ConstantTimeEq;

/// Returns true if and only if `a == b`.
///
/// Running time depends only on the lengths of the inputs, never on where
/// they differ. Lengths are public (signatures have a fixed size).
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq_equal() {
        assert!(constant_time_eq(b"v0=abcdef", b"v0=abcdef"));
    }

    #[test]
    fn test_constant_time_eq_first_byte_differs() {
        assert!(!constant_time_eq(b"x0=abcdef", b"v0=abcdef"));
    }

    #[test]
    fn test_constant_time_eq_last_byte_differs() {
        assert!(!constant_time_eq(b"v0=abcdee", b"v0=abcdef"));
    }

    #[test]
    fn test_constant_time_eq_different_lengths() {
        assert!(!constant_time_eq(b"v0=abc", b"v0=abcdef"));
        assert!(!constant_time_eq(b"", b"v0="));
    }

    #[test]
    fn test_constant_time_eq_empty() {
        assert!(constant_time_eq(b"", b""));
    }
}
