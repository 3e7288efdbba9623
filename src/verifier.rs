//! Verifier (`spec.md` §4.6, S3 only): the third-party check that a
//! prover's stored per-block responses `B[0..blockcount)` are consistent
//! with the publisher's signed polynomials, without ever seeing `sindex`.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::seq::index::sample;
use rand::Rng;

use crate::error::{OtError, Result};
use crate::params::Params;
use crate::poly_signer::Poly;
use crate::response_engine::{sigunpad, S3Carry};

/// Draws `polycount/2` distinct polynomial indices, uniformly and without
/// replacement (`spec.md` §4.6 step 1).
pub fn choose_poly_indices<R: Rng>(polycount: usize, rng: &mut R) -> Vec<usize> {
    let vcount = polycount / 2;
    sample(rng, polycount, vcount).into_vec()
}

/// Horner-accumulates `storedB` against one chosen polynomial's `xvalue`
/// modulo its own small `modulus`, ascending block index 0..blockcount
/// to match `PolySigner`'s accumulation order (`spec.md` §4.6 "Tie-breaks").
fn accumulate(poly: &Poly, stored_b: &[BigUint], pow2sig_mask: &BigUint) -> BigUint {
    let mut x_pow = poly.xvalue.clone();
    let mut bacc = BigUint::zero();
    for b in stored_b {
        bacc = (bacc + b * &x_pow) & pow2sig_mask;
        x_pow = (&x_pow * &poly.xvalue) % &poly.modulus;
    }
    bacc
}

/// Checks one chosen polynomial's signed image against the current
/// request's `(B0..B2, F0..F2)` and the stored accumulator
/// (`spec.md` §4.6 step 3).
fn check_one(
    params: &Params,
    poly: &Poly,
    poly_index: usize,
    carry: &S3Carry,
    stored_b: &[BigUint],
) -> Result<()> {
    let pow2mask = (BigUint::one() << params.pow2bits) - BigUint::one();
    let pow2sigmask = (BigUint::one() << params.pow2sigbits) - BigUint::one();

    let bacc = accumulate(poly, stored_b, &pow2sigmask);

    let btestc = &carry.b0 * &poly.sumpoly + &carry.b1 * &poly.d1poly + &carry.b2 * &poly.d2poly;
    let btestf_wide = &carry.f0 * &poly.sumpoly + &carry.f1 * &poly.d1poly + &carry.f2 * &poly.d2poly;
    let btestf = btestf_wide >> params.pow2bits;

    let btest = (btestc + sigunpad(&btestf, params.sigbuffbits)) & &pow2mask;
    let expected = sigunpad(&bacc, params.sigbuffbits);

    if btest != expected {
        return Err(OtError::VerifierMismatch {
            poly_index,
            expected,
            got: btest,
        });
    }
    Ok(())
}

/// Full S3 verification pass: samples `polycount/2` polynomial indices and
/// checks each against `storedB`. Any single mismatch is fatal
/// (`spec.md` §7 "Verifier mismatch").
pub fn verify<R: Rng>(
    params: &Params,
    polys: &[Poly],
    carry: &S3Carry,
    stored_b: &[BigUint],
    rng: &mut R,
) -> Result<Vec<usize>> {
    let chosen = choose_poly_indices(polys.len(), rng);
    for &idx in &chosen {
        check_one(params, &polys[idx], idx, carry, stored_b)?;
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_encoder::{self, Block};
    use crate::poly_signer;
    use crate::prime_setup::Moduli;
    use crate::response_engine::sample3_response;
    use num_bigint::RandBigInt;

    // 2053/2081/2099 are all 12-bit primes; callers must pass a `Params`
    // built with `primebits=12` (and `modulusbits` large enough that
    // `n = primes*qprime` still fits under it) or `encodingrange` is
    // derived from the wrong bit-width and `data_encoder::generate`
    // overflows `primes` on almost every block.
    fn toy_moduli(params: &Params) -> Moduli {
        Moduli::from_parts(
            vec![BigUint::from(2053u32), BigUint::from(2081u32)],
            BigUint::from(2099u32),
            params,
        )
        .unwrap()
    }

    fn build_s3_round(params: &Params, moduli: &Moduli, blocks: &[Block]) -> (S3Carry, Vec<BigUint>, crate::blinding_engine::BlindingState) {
        let mut rng = rand::thread_rng();
        let blinding = crate::blinding_engine::BlindingState::new(moduli, &mut rng).unwrap();
        let selection = crate::blinding_engine::Selection::draw(&mut rng);
        let randomised = crate::blinding_engine::randomisers(moduli, &blinding, &selection, &mut rng).unwrap();
        let carry = S3Carry::prepare(params, moduli, &randomised.b0, &randomised.b1, &randomised.b2).unwrap();
        let stored_b: Vec<BigUint> = blocks.iter().map(|blk| sample3_response(params, &carry, blk)).collect();
        (carry, stored_b, blinding)
    }

    #[test]
    fn verifier_accepts_honestly_built_responses() {
        let params = Params::new(12, 34, 5, 8, 3, 10, "test", false);
        let moduli = toy_moduli(&params);
        let mut rng = rand::thread_rng();
        let blocks = data_encoder::generate(params.blockcount, &moduli, &mut rng).unwrap();
        let polys = poly_signer::generate(&params, &blocks).unwrap();
        let (carry, stored_b, _blinding) = build_s3_round(&params, &moduli, &blocks);

        verify(&params, &polys, &carry, &stored_b, &mut rng).unwrap();
    }

    #[test]
    fn verifier_rejects_a_flipped_low_bit() {
        let params = Params::new(12, 34, 5, 8, 3, 10, "test", false);
        let moduli = toy_moduli(&params);
        let mut rng = rand::thread_rng();
        let blocks = data_encoder::generate(params.blockcount, &moduli, &mut rng).unwrap();
        let polys = poly_signer::generate(&params, &blocks).unwrap();
        let (carry, mut stored_b, _blinding) = build_s3_round(&params, &moduli, &blocks);

        stored_b[0] ^= BigUint::one();

        let result = verify(&params, &polys, &carry, &stored_b, &mut rng);
        assert!(matches!(result, Err(OtError::VerifierMismatch { .. })));
    }

    #[test]
    fn choose_poly_indices_are_distinct_and_in_range() {
        let mut rng = rand::thread_rng();
        let chosen = choose_poly_indices(12, &mut rng);
        assert_eq!(chosen.len(), 6);
        let mut sorted = chosen.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), chosen.len());
        assert!(chosen.iter().all(|&i| i < 12));
    }

    #[test]
    fn accumulator_is_idempotent_across_repeated_runs() {
        // spec.md §8 invariant 4: running the accumulator twice over the
        // same storedB/poly yields identical Bacc, with no mutation.
        let params = Params::new(12, 34, 4, 8, 3, 10, "idempotent", false);
        let moduli = toy_moduli(&params);
        let mut rng = rand::thread_rng();
        let blocks = data_encoder::generate(params.blockcount, &moduli, &mut rng).unwrap();
        let polys = poly_signer::generate(&params, &blocks).unwrap();
        let stored_b: Vec<BigUint> = (0..params.blockcount)
            .map(|_| rng.gen_biguint(params.pow2sigbits as u64))
            .collect();

        let pow2sigmask = (BigUint::one() << params.pow2sigbits) - BigUint::one();
        let first = accumulate(&polys[0], &stored_b, &pow2sigmask);
        let second = accumulate(&polys[0], &stored_b, &pow2sigmask);
        assert_eq!(first, second);
    }
}
