//! PrimeSetup (`spec.md` §4.1): builds the public modulus `n = primes *
//! qprime` and the derived blinding lifetimes `coset`/`qspace`, plus the
//! `encodingrange` headroom used by [`crate::data_encoder`].

use num_bigint::BigUint;
use num_traits::One;
use tracing::{debug, info};

use crate::bigmath;
use crate::error::{OtError, Result};
use crate::params::Params;

/// The read-only modulus bundle every other component borrows
/// (`spec.md` §3 `Moduli` row, §9 "Global state" design note).
#[derive(Clone, Debug)]
pub struct Moduli {
    pub primelist: Vec<BigUint>,
    pub qprime: BigUint,
    pub primes: BigUint,
    pub n: BigUint,
    pub coset: BigUint,
    pub qspace: BigUint,
    pub encodingrange: BigUint,
}

impl Moduli {
    /// Derives `primes`, `n`, `coset`, `qspace`, `encodingrange` from an
    /// already-generated `primelist`/`qprime`. Split out from
    /// [`generate`] so tests and `demos/usage.rs` can plug in small, fixed
    /// primes (`spec.md` §8 "S1 tiny" scenario) without paying for a real
    /// `primebits`-sized generation.
    pub fn from_parts(primelist: Vec<BigUint>, qprime: BigUint, params: &Params) -> Result<Self> {
        if primelist.is_empty() {
            return Err(OtError::EmptyPrimeList {
                prime_bits: params.primebits,
                modulus_bits: params.modulusbits,
            });
        }

        let primes = primelist
            .iter()
            .fold(BigUint::one(), |acc, p| acc * p);
        let n = &primes * &qprime;

        // spec.md §4.1: fatal if primes*qprime >= 2^modulusbits.
        if n >= (BigUint::one() << params.modulusbits) {
            return Err(OtError::ModulusTooLarge {
                n_bits: n.bits(),
                modulus_bits: params.modulusbits as u64,
            });
        }

        let mut coset = &primelist[0] - BigUint::one();
        for p in &primelist[1..] {
            coset = bigmath::lcm(&coset, &(p - BigUint::one()));
        }

        let qprime_order = &qprime - BigUint::one();
        // Floor division: resolves spec.md §9 Open Question 2 — BigUint
        // division has no float path to regress into.
        let qspace = bigmath::lcm(&coset, &qprime_order) / &coset;

        let exponent_bits = params.modulusbits - params.primebits
            - 2 * ((params.modulusbits - params.primebits) / params.primebits);
        let encodingrange = BigUint::one() << exponent_bits;

        debug!(
            n_bits = n.bits(),
            qspace_bits = qspace.bits(),
            coset_bits = coset.bits(),
            "moduli derived"
        );

        Ok(Moduli {
            primelist,
            qprime,
            primes,
            n,
            coset,
            qspace,
            encodingrange,
        })
    }

    pub fn n_bits(&self) -> u64 {
        self.n.bits()
    }

    pub fn qspace_bits(&self) -> u64 {
        self.qspace.bits()
    }

    pub fn coset_bits(&self) -> u64 {
        self.coset.bits()
    }
}

/// Draws `primebits`-sized primes until their accumulated bit-length would
/// exceed `modulusbits - primebits`, then a final `primebits`-sized
/// `qprime`, and derives the rest of [`Moduli`]. Uses `num_primes::Generator`
/// for the large-prime search (the teacher crate's own prime-generation
/// dependency); the small search used later by `PolySigner` uses a direct
/// Fermat test instead (see `poly_signer.rs`).
pub fn generate(params: &Params) -> Result<Moduli> {
    info!(primebits = params.primebits, modulusbits = params.modulusbits, "generating primes");

    if params.primebits >= params.modulusbits {
        return Err(OtError::EmptyPrimeList {
            prime_bits: params.primebits,
            modulus_bits: params.modulusbits,
        });
    }
    let ceiling_bits = (params.modulusbits - params.primebits) as u64;
    let mut primelist: Vec<BigUint> = Vec::new();
    let mut accumulated_bits: u64 = 0;

    loop {
        let candidate = next_prime_of_size(params.primebits);
        let candidate_bits = candidate.bits();
        if accumulated_bits + candidate_bits > ceiling_bits {
            break;
        }
        accumulated_bits += candidate_bits;
        primelist.push(candidate);
    }
    if primelist.is_empty() {
        return Err(OtError::EmptyPrimeList {
            prime_bits: params.primebits,
            modulus_bits: params.modulusbits,
        });
    }

    let qprime = next_prime_of_size(params.primebits);

    let moduli = Moduli::from_parts(primelist, qprime, params)?;
    info!(n_bits = moduli.n_bits(), qspace_bits = moduli.qspace_bits(), coset_bits = moduli.coset_bits(), "primes generated");
    Ok(moduli)
}

fn next_prime_of_size(bits: u32) -> BigUint {
    let candidate = num_primes::Generator::new_prime(bits as usize);
    BigUint::from_bytes_be(&candidate.to_bytes_be())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_params() -> Params {
        Params::new(3, 64, 1, 12, 3, 12, "abc", false)
    }

    #[test]
    fn from_parts_matches_spec_tiny_scenario() {
        // spec.md §8: primelist = [5,7] => primes = 35
        let primelist = vec![BigUint::from(5u32), BigUint::from(7u32)];
        let qprime = BigUint::from(11u32);
        let moduli = Moduli::from_parts(primelist, qprime, &toy_params()).unwrap();
        assert_eq!(moduli.primes, BigUint::from(35u32));
        // coset = lcm(4,6) = 12
        assert_eq!(moduli.coset, BigUint::from(12u32));
    }

    #[test]
    fn rejects_modulus_too_large() {
        let primelist = vec![BigUint::from(5u32), BigUint::from(7u32)];
        let qprime = BigUint::from(11u32);
        let tiny = Params::new(3, 8, 1, 12, 3, 12, "abc", false);
        let result = Moduli::from_parts(primelist, qprime, &tiny);
        assert!(matches!(result, Err(OtError::ModulusTooLarge { .. })));
    }

    #[test]
    fn generate_produces_usable_moduli() {
        let params = Params::new(16, 200, 4, 12, 3, 12, "abc", false);
        let moduli = generate(&params).unwrap();
        assert!(moduli.primelist.len() >= 1);
        assert!(moduli.n.bits() < params.modulusbits as u64);
    }

    #[test]
    fn from_parts_rejects_empty_primelist() {
        let result = Moduli::from_parts(Vec::new(), BigUint::from(11u32), &toy_params());
        assert!(matches!(result, Err(OtError::EmptyPrimeList { .. })));
    }

    #[test]
    fn generate_rejects_modulusbits_too_small_for_primebits() {
        // primebits >= modulusbits - primebits leaves no room for even one
        // prime under the ceiling, so the accumulation loop never pushes one.
        let params = Params::new(150, 200, 1, 12, 3, 12, "abc", false);
        let result = generate(&params);
        assert!(matches!(result, Err(OtError::EmptyPrimeList { .. })));
    }

    #[test]
    fn generate_rejects_primebits_at_or_above_modulusbits_without_hanging() {
        // primebits >= modulusbits leaves no bits at all for the ceiling
        // subtraction; must be rejected before the unchecked u32 subtraction
        // that would otherwise underflow/hang the accumulation loop.
        let params = Params::new(300, 200, 1, 12, 3, 12, "abc", false);
        let result = generate(&params);
        assert!(matches!(result, Err(OtError::EmptyPrimeList { .. })));

        let equal = Params::new(200, 200, 1, 12, 3, 12, "abc", false);
        let result = generate(&equal);
        assert!(matches!(result, Err(OtError::EmptyPrimeList { .. })));
    }
}
