//! The hash-function boundary (`spec.md` §6, §9 Open Question 1).
//!
//! The original Python renders `hash256sum(*argp)` by string-concatenating
//! the `repr()` of each argument with no separator before taking SHA-256.
//! That is ambiguous to port byte-for-byte (Python tuple/int/str `repr`
//! formatting is not a stable cross-language contract), so this crate
//! commits to a canonical, unambiguous rendering instead: each argument
//! contributes an 8-byte little-endian length prefix followed by its own
//! canonical byte form, and the arguments are concatenated in call order.
//! The digest is read back as a big-endian unsigned integer, exactly as
//! the spec's `H(·)` contract requires.

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

/// One argument to the domain hash, in its canonical byte form.
pub enum HashArg<'a> {
    Str(&'a str),
    Int(u64),
    Big(&'a BigUint),
}

impl<'a> HashArg<'a> {
    fn canonical_bytes(&self) -> Vec<u8> {
        match self {
            HashArg::Str(s) => s.as_bytes().to_vec(),
            HashArg::Int(i) => i.to_be_bytes().to_vec(),
            HashArg::Big(b) => b.to_bytes_be(),
        }
    }
}

/// `H(args...)`: SHA-256 over the length-prefixed concatenation of each
/// argument's canonical bytes, read back as a big-endian unsigned integer.
pub fn hash_to_uint(args: &[HashArg]) -> BigUint {
    let mut hasher = Sha256::new();
    for arg in args {
        let bytes = arg.canonical_bytes();
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(&bytes);
    }
    let digest = hasher.finalize();
    BigUint::from_bytes_be(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let a = hash_to_uint(&[HashArg::Str("abc"), HashArg::Int(0)]);
        let b = hash_to_uint(&[HashArg::Str("abc"), HashArg::Int(0)]);
        assert_eq!(a, b);
    }

    #[test]
    fn hash_distinguishes_argument_boundaries() {
        // Without length-prefixing, ("ab","c") and ("a","bc") would collide.
        let first = hash_to_uint(&[HashArg::Str("ab"), HashArg::Str("c")]);
        let second = hash_to_uint(&[HashArg::Str("a"), HashArg::Str("bc")]);
        assert_ne!(first, second);
    }

    #[test]
    fn hash_fits_in_256_bits() {
        let h = hash_to_uint(&[HashArg::Str("abc"), HashArg::Int(7)]);
        assert!(h.bits() <= 256);
    }
}
