use num_bigint::BigUint;
use thiserror::Error;

/// Every fatal condition from the spec's error table (`spec.md` §7): all are
/// terminal for the enclosing request, never recoverable in place.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtError {
    #[error("modulus construction failed: n has {n_bits} bits, expected < {modulus_bits}")]
    ModulusTooLarge { n_bits: u64, modulus_bits: u64 },

    #[error("primelist is empty: modulusbits ({modulus_bits}) too small for primebits ({prime_bits}), no prime fit under the ceiling")]
    EmptyPrimeList { prime_bits: u32, modulus_bits: u32 },

    #[error("block {block} encoding overflow: d0 = {d0} >= primes")]
    EncodingOverflow { block: usize, d0: BigUint },

    #[error("modular inverse of {operand} mod {modulus} does not exist (not coprime)")]
    ModularInverseFailure { operand: BigUint, modulus: BigUint },

    #[error("polynomial {pindex} accumulator overflow: {field} = {value} > pow2sig")]
    PolyOverflow {
        pindex: usize,
        field: &'static str,
        value: BigUint,
    },

    #[error("sanity check '{check}' diverged: expected {expected}, got {got}")]
    SanityCheckFailure {
        check: &'static str,
        expected: BigUint,
        got: BigUint,
    },

    #[error("decode mismatch at block {block}: expected {expected}, got {got}")]
    DecodeMismatch {
        block: usize,
        expected: BigUint,
        got: BigUint,
    },

    #[error("verifier mismatch at polynomial index {poly_index}: expected {expected}, got {got}")]
    VerifierMismatch {
        poly_index: usize,
        expected: BigUint,
        got: BigUint,
    },
}

pub type Result<T> = std::result::Result<T, OtError>;
