//! PolySigner (`spec.md` §4.5, S3 only): the publisher generates
//! `polycount` Horner polynomials over the per-block `(SUM, D1, D2)`
//! triples, each keyed by a small modulus/evaluation-point pair derived
//! from `decodekeys`. Ported from `ot_py3.py`'s poly-signature build loop.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::data_encoder::Block;
use crate::error::{OtError, Result};
use crate::hash::{hash_to_uint, HashArg};
use crate::params::Params;

/// One signed polynomial: `P(x) = sum_i x^(i+1) * value_i`, evaluated over
/// the integers (only `x` itself is reduced mod `m` each Horner step).
#[derive(Clone, Debug)]
pub struct Poly {
    pub modulus: BigUint,
    pub xvalue: BigUint,
    pub sumpoly: BigUint,
    pub d1poly: BigUint,
    pub d2poly: BigUint,
}

/// Fermat base-2 primality test (`original_source/.../utility.py::isprime`):
/// for prime `p`, `2^p ≡ 2 (mod p)`. Only used for the small
/// (`< 2^sigcoefficientmaxbits`) polynomial moduli below; `prime_setup.rs`
/// uses `num_primes` for the large primes instead.
fn is_prime_fermat(p: &BigUint) -> bool {
    if p < &BigUint::from(2u32) {
        return false;
    }
    if p == &BigUint::from(2u32) {
        return true;
    }
    if (p % BigUint::from(2u32)).is_zero() {
        return false;
    }
    BigUint::from(2u32).modpow(p, p) == BigUint::from(2u32)
}

/// `get_ranged_prime`: starting from `hashint mod roof`, advances by one
/// (wrapping at `roof`) until a prime is found.
fn next_ranged_prime(hashint: &BigUint, roof: &BigUint) -> BigUint {
    let mut candidate = hashint % roof;
    while !is_prime_fermat(&candidate) {
        candidate = (candidate + BigUint::one()) % roof;
    }
    candidate
}

/// Builds `params.polycount` polynomials over `blocks`, keyed by
/// `params.decodekeys`. Fails with `PolyOverflow` if any accumulator
/// exceeds `pow2sig` (`spec.md` §4.5 step 4, §7).
pub fn generate(params: &Params, blocks: &[Block]) -> Result<Vec<Poly>> {
    let roof = BigUint::from(params.sigcoefficientmax());
    let pow2sig = BigUint::one() << params.pow2sigbits;

    let mut polys = Vec::with_capacity(params.polycount);
    for pindex in 0..params.polycount {
        let modulus_seed = hash_to_uint(&[HashArg::Str(&params.decodekeys), HashArg::Int(pindex as u64)]);
        let modulus = next_ranged_prime(&modulus_seed, &roof);

        let xvalue_seed = hash_to_uint(&[
            HashArg::Str(&params.decodekeys),
            HashArg::Int(pindex as u64),
            HashArg::Big(&modulus),
        ]);
        let xvalue = xvalue_seed % &modulus;

        let mut sumpoly = BigUint::zero();
        let mut d1poly = BigUint::zero();
        let mut d2poly = BigUint::zero();
        let mut x_power = xvalue.clone();

        for block in blocks {
            sumpoly += &x_power * &block.sum;
            d1poly += &x_power * &block.diff1;
            d2poly += &x_power * &block.diff2;
            x_power = (&x_power * &xvalue) % &modulus;
        }

        for (field, value) in [("SUMPOLY", &sumpoly), ("D1POLY", &d1poly), ("D2POLY", &d2poly)] {
            if value > &pow2sig {
                return Err(OtError::PolyOverflow {
                    pindex,
                    field,
                    value: value.clone(),
                });
            }
        }

        polys.push(Poly {
            modulus,
            xvalue,
            sumpoly,
            d1poly,
            d2poly,
        });
    }
    Ok(polys)
}
