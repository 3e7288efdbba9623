//! BlindingEngine (`spec.md` §4.2): draws the per-request blinding factor
//! `b`, the selection index, and (for S2/S3) the `qspace`-randomised
//! coefficients `b0,b1,b2` that hide `b` modulo `qprime` without perturbing
//! it modulo `primes`.

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::Rng;

use crate::bigmath;
use crate::error::{OtError, Result};
use crate::prime_setup::Moduli;

/// The sign pattern applied to `D1`/`D2` for a given selection index
/// (`spec.md` §3 `Selection` row): exactly one of `s1,s2` is `-2 mod
/// primes`, the other is `1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Multiplier {
    One,
    NegTwo,
}

impl Multiplier {
    pub fn mod_value(&self, modulus: &BigUint) -> BigUint {
        match self {
            Multiplier::One => BigUint::one(),
            Multiplier::NegTwo => (modulus - BigUint::from(2u32)) % modulus,
        }
    }
}

/// Which of the three per-block values the requester will decode.
#[derive(Clone, Copy, Debug)]
pub struct Selection {
    pub sindex: u8,
    pub s1: Multiplier,
    pub s2: Multiplier,
}

impl Selection {
    pub fn draw<R: Rng>(rng: &mut R) -> Selection {
        let sindex = rng.gen_range(0..3u8);
        let (s1, s2) = match sindex {
            0 => (Multiplier::One, Multiplier::One),
            1 => (Multiplier::NegTwo, Multiplier::One),
            _ => (Multiplier::One, Multiplier::NegTwo),
        };
        Selection { sindex, s1, s2 }
    }
}

/// Per-request blinding state: `b`, its CRT-accelerated power `blind =
/// 2^b mod primes`, and the inverses needed to unblind a response.
#[derive(Clone, Debug)]
pub struct BlindingState {
    pub b: BigUint,
    pub blind: BigUint,
    pub iblind: BigUint,
    pub i3: BigUint,
    pub unblind: BigUint,
}

impl BlindingState {
    pub fn new<R: Rng>(moduli: &Moduli, rng: &mut R) -> Result<Self> {
        let b = rng.gen_biguint_below(&moduli.coset);
        let blind = bigmath::powmod_crt(&BigUint::from(2u32), &b, &moduli.primelist)?;
        let iblind = bigmath::inverse_crt(&blind, &moduli.primelist)?;
        let i3 = bigmath::inverse_crt(&BigUint::from(3u32), &moduli.primelist)?;
        let unblind = (&iblind * &i3) % &moduli.primes;
        Ok(BlindingState {
            b,
            blind,
            iblind,
            i3,
            unblind,
        })
    }

    /// Sample 1's coefficients: plain, modulo `primes` only.
    pub fn s1_coefficients(&self, moduli: &Moduli, selection: &Selection) -> (BigUint, BigUint, BigUint) {
        let b0 = self.blind.clone();
        let b1 = (&self.blind * selection.s1.mod_value(&moduli.primes)) % &moduli.primes;
        let b2 = (&self.blind * selection.s2.mod_value(&moduli.primes)) % &moduli.primes;
        (b0, b1, b2)
    }
}

/// Sample 2/3 coefficients, randomised modulo `n` via the extra `qspace`
/// room while staying congruent to the Sample-1 form modulo `primes`.
#[derive(Clone, Debug)]
pub struct Randomisers {
    pub r0q: BigUint,
    pub r1q: BigUint,
    pub r2q: BigUint,
    pub b0: BigUint,
    pub b1: BigUint,
    pub b2: BigUint,
}

pub fn randomisers<R: Rng>(
    moduli: &Moduli,
    blinding: &BlindingState,
    selection: &Selection,
    rng: &mut R,
) -> Result<Randomisers> {
    let r0q = rng.gen_biguint_below(&moduli.qspace);
    let r1q = rng.gen_biguint_below(&moduli.qspace);
    let r2q = rng.gen_biguint_below(&moduli.qspace);

    let qprime_order = &moduli.qprime - BigUint::one();
    let riqpow = |riq: &BigUint| -> BigUint {
        let exponent = (&blinding.b + &moduli.coset * riq) % &qprime_order;
        BigUint::from(2u32).modpow(&exponent, &moduli.qprime)
    };
    let r0qpow = riqpow(&r0q);
    let r1qpow = riqpow(&r1q);
    let r2qpow = riqpow(&r2q);

    let moduli_pair = [moduli.primes.clone(), moduli.qprime.clone()];
    let b0 = bigmath::crt(&[blinding.blind.clone(), r0qpow], &moduli_pair)?;
    let b1 = (bigmath::crt(&[blinding.blind.clone(), r1qpow], &moduli_pair)? * selection.s1.mod_value(&moduli.n)) % &moduli.n;
    let b2 = (bigmath::crt(&[blinding.blind.clone(), r2qpow], &moduli_pair)? * selection.s2.mod_value(&moduli.n)) % &moduli.n;

    Ok(Randomisers {
        r0q,
        r1q,
        r2q,
        b0,
        b1,
        b2,
    })
}

/// Cross-checks `randomisers`' CRT-accelerated `b0,b1,b2` against a direct
/// `powmod(2, b + coset*riq, n)` computation (`SPEC_FULL.md` §3, the
/// original script's `sanitycheck` branch in Sample 2). Off the hot path;
/// only run when `Params::sanitycheck` is set.
pub fn sanity_check_sample2(
    moduli: &Moduli,
    blinding: &BlindingState,
    selection: &Selection,
    randomised: &Randomisers,
) -> Result<()> {
    let direct = |riq: &BigUint| -> BigUint {
        let exponent = &blinding.b + &moduli.coset * riq;
        BigUint::from(2u32).modpow(&exponent, &moduli.n)
    };
    let b0test = direct(&randomised.r0q);
    let b1test = (direct(&randomised.r1q) * selection.s1.mod_value(&moduli.n)) % &moduli.n;
    let b2test = (direct(&randomised.r2q) * selection.s2.mod_value(&moduli.n)) % &moduli.n;

    if b0test != randomised.b0 {
        return Err(OtError::SanityCheckFailure {
            check: "sample2_b0",
            expected: b0test,
            got: randomised.b0.clone(),
        });
    }
    if b1test != randomised.b1 {
        return Err(OtError::SanityCheckFailure {
            check: "sample2_b1",
            expected: b1test,
            got: randomised.b1.clone(),
        });
    }
    if b2test != randomised.b2 {
        return Err(OtError::SanityCheckFailure {
            check: "sample2_b2",
            expected: b2test,
            got: randomised.b2.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;
    use proptest::prelude::*;

    fn toy_moduli() -> Moduli {
        let params = Params::new(3, 64, 1, 12, 3, 12, "abc", false);
        Moduli::from_parts(
            vec![BigUint::from(5u32), BigUint::from(7u32)],
            BigUint::from(11u32),
            &params,
        )
        .unwrap()
    }

    #[test]
    fn blind_and_iblind_are_inverses() {
        // spec.md §8 invariant 1: (2^b * 2^-b) mod primes == 1
        let moduli = toy_moduli();
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let blinding = BlindingState::new(&moduli, &mut rng).unwrap();
            assert_eq!((&blinding.blind * &blinding.iblind) % &moduli.primes, BigUint::one());
        }
    }

    #[test]
    fn s1_tiny_scenario_matches_spec() {
        // spec.md §8 "S1 tiny": b=2, sindex=0 => blind=4, iblind=9, i3=12, unblind=3
        let moduli = toy_moduli();
        let blinding = BlindingState {
            b: BigUint::from(2u32),
            blind: BigUint::from(4u32),
            iblind: BigUint::from(9u32),
            i3: BigUint::from(12u32),
            unblind: BigUint::from(3u32),
        };
        assert_eq!((&blinding.blind * &blinding.iblind) % &moduli.primes, BigUint::one());
        assert_eq!(blinding.unblind, BigUint::from(3u32));

        let selection = Selection { sindex: 0, s1: Multiplier::One, s2: Multiplier::One };
        let (b0, b1, b2) = blinding.s1_coefficients(&moduli, &selection);
        assert_eq!(b0, BigUint::from(4u32));
        assert_eq!(b1, BigUint::from(4u32));
        assert_eq!(b2, BigUint::from(4u32));
    }

    #[test]
    fn randomisers_preserve_s1_congruence_mod_primes() {
        // spec.md §4.2 invariant: b0..b2 mod primes equal the S1 plain form.
        let moduli = toy_moduli();
        let mut rng = rand::thread_rng();
        let blinding = BlindingState::new(&moduli, &mut rng).unwrap();
        let selection = Selection::draw(&mut rng);
        let (s1b0, s1b1, s1b2) = blinding.s1_coefficients(&moduli, &selection);
        let r = randomisers(&moduli, &blinding, &selection, &mut rng).unwrap();
        assert_eq!(&r.b0 % &moduli.primes, s1b0);
        assert_eq!(&r.b1 % &moduli.primes, s1b1);
        assert_eq!(&r.b2 % &moduli.primes, s1b2);
    }

    #[test]
    fn sanity_check_passes_for_honestly_built_randomisers() {
        let moduli = toy_moduli();
        let mut rng = rand::thread_rng();
        let blinding = BlindingState::new(&moduli, &mut rng).unwrap();
        let selection = Selection::draw(&mut rng);
        let r = randomisers(&moduli, &blinding, &selection, &mut rng).unwrap();
        sanity_check_sample2(&moduli, &blinding, &selection, &r).unwrap();
    }

    proptest! {
        /// spec.md §8 invariant 1: for all random b in [0, coset),
        /// (2^b * 2^-b) mod primes == 1. `toy_moduli`'s coset is lcm(4,6)
        /// = 12, so `b` is drawn over the whole valid range rather than a
        /// handful of `thread_rng` samples.
        #[test]
        fn blind_and_iblind_are_inverses_for_any_b_in_coset(b in 0u64..12u64) {
            let moduli = toy_moduli();
            let b = BigUint::from(b);
            let blind = bigmath::powmod_crt(&BigUint::from(2u32), &b, &moduli.primelist).unwrap();
            let iblind = bigmath::inverse_crt(&blind, &moduli.primelist).unwrap();
            prop_assert_eq!((&blind * &iblind) % &moduli.primes, BigUint::one());
        }
    }
}
