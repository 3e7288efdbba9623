//! DecodeEngine (`spec.md` §4.4): unblinds a prover response back to the
//! requester's selected plaintext, and self-tests the result against the
//! known value (any mismatch is a fatal arithmetic bug, per §7).

use num_bigint::BigUint;
use num_traits::One;

use crate::error::{OtError, Result};
use crate::params::Params;
use crate::prime_setup::Moduli;
use crate::response_engine::sigunpad;

/// S1/S2: `decode = (response * unblind) mod primes`.
pub fn decode_s1s2(response: &BigUint, unblind: &BigUint, primes: &BigUint) -> BigUint {
    (response * unblind) % primes
}

/// S3: unpacks the primary carries out of `B`, converts them back to a
/// modular residue via `pow2 - n`, then unblinds exactly as S1/S2.
pub fn decode_s3(b: &BigUint, unblind: &BigUint, params: &Params, moduli: &Moduli) -> BigUint {
    let pow2 = BigUint::one() << params.pow2bits;
    let pow2mask = &pow2 - BigUint::one();
    let neg_n_mod_pow2 = (&pow2 - (&moduli.n % &pow2)) % &pow2;

    let residue = (sigunpad(b, params.sigbuffbits) * &neg_n_mod_pow2) & &pow2mask;
    (residue * unblind) % &moduli.primes
}

/// Self-test: any mismatch between a decoded value and the known
/// plaintext is fatal (`spec.md` §7 "Decode mismatch").
pub fn verify_decode(block_index: usize, decoded: &BigUint, expected: &BigUint) -> Result<()> {
    if decoded == expected {
        Ok(())
    } else {
        Err(OtError::DecodeMismatch {
            block: block_index,
            expected: expected.clone(),
            got: decoded.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_tiny_scenario_decodes_to_d0() {
        // spec.md §8 "S1 tiny": response=15, unblind=3, primes=35 => decode=10
        let decode = decode_s1s2(&BigUint::from(15u32), &BigUint::from(3u32), &BigUint::from(35u32));
        assert_eq!(decode, BigUint::from(10u32));
        verify_decode(0, &decode, &BigUint::from(10u32)).unwrap();
    }

    #[test]
    fn mismatch_is_reported_as_fatal() {
        let result = verify_decode(3, &BigUint::from(1u32), &BigUint::from(2u32));
        assert!(matches!(result, Err(OtError::DecodeMismatch { block: 3, .. })));
    }
}
