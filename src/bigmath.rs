//! Modular-arithmetic building blocks: gcd/lcm, extended-Euclid inverse, and
//! CRT acceleration over a list of small primes.
//!
//! `spec.md` specifies these only at contract level ("standard
//! number-theoretic utilities"); the implementations below follow the
//! structure of `original_source/.../modmath.py` (`inverse`, `compute_gcd`,
//! `compute_lcm`, `CRT`, `powmodCRT`, `inverseCRT`), ported to `BigUint`
//! with a `BigInt` detour for the signed extended-Euclid bookkeeping.

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Signed, Zero};

use crate::error::{OtError, Result};

pub fn gcd(x: &BigUint, y: &BigUint) -> BigUint {
    let mut a = x.clone();
    let mut b = y.clone();
    while !b.is_zero() {
        let t = b.clone();
        b = &a % &b;
        a = t;
    }
    a
}

pub fn lcm(x: &BigUint, y: &BigUint) -> BigUint {
    if x.is_zero() || y.is_zero() {
        return BigUint::zero();
    }
    (x / gcd(x, y)) * y
}

/// Extended Euclidean algorithm: returns `(g, s, t)` with `g = gcd(a, b)`
/// and `a*s + b*t = g`.
fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;
        let new_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, new_r);
        let new_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, new_s);
        let new_t = &old_t - &quotient * &t;
        old_t = std::mem::replace(&mut t, new_t);
    }
    (old_r, old_s, old_t)
}

/// Modular inverse of `a` modulo `n`. Mirrors `modmath.py::inverse`, but
/// surfaces non-invertibility as `OtError::ModularInverseFailure` rather
/// than a sentinel `-1`.
pub fn inverse(a: &BigUint, n: &BigUint) -> Result<BigUint> {
    if n.is_one() {
        return Ok(BigUint::zero());
    }
    let a_mod = BigInt::from((a % n).clone());
    let modulus = BigInt::from(n.clone());
    let (g, s, _t) = extended_gcd(&a_mod, &modulus);
    if g != BigInt::one() && g != -BigInt::one() {
        return Err(OtError::ModularInverseFailure {
            operand: a.clone(),
            modulus: n.clone(),
        });
    }
    let mut result = s % &modulus;
    if result.is_negative() {
        result += &modulus;
    }
    Ok(result.to_biguint().expect("non-negative by construction"))
}

/// Chinese Remainder Theorem combination: given pairwise-coprime `moduli`
/// and matching `residues`, returns the unique value modulo their product.
pub fn crt(residues: &[BigUint], moduli: &[BigUint]) -> Result<BigUint> {
    assert_eq!(residues.len(), moduli.len(), "CRT: length mismatch");
    let prod = moduli.iter().fold(BigUint::one(), |acc, m| acc * m);
    let mut result = BigUint::zero();
    for (residue, modulus) in residues.iter().zip(moduli.iter()) {
        let partial = &prod / modulus;
        let inv = inverse(&(&partial % modulus), modulus)?;
        result = (result + residue * inv * partial) % &prod;
    }
    Ok(result)
}

/// `powmodCRT`: computes `g^e mod (product of primelist)` by reducing the
/// exponent modulo each `p - 1` and CRT-combining the per-prime results.
pub fn powmod_crt(g: &BigUint, e: &BigUint, primelist: &[BigUint]) -> Result<BigUint> {
    let mut residues = Vec::with_capacity(primelist.len());
    for p in primelist {
        let order = p - BigUint::one();
        let reduced_e = e % &order;
        residues.push(g.modpow(&reduced_e, p));
    }
    crt(&residues, primelist)
}

/// `inverseCRT`: computes the modular inverse of `v` modulo the product of
/// `primelist` by inverting per-prime and CRT-combining.
pub fn inverse_crt(v: &BigUint, primelist: &[BigUint]) -> Result<BigUint> {
    let mut residues = Vec::with_capacity(primelist.len());
    for p in primelist {
        residues.push(inverse(&(v % p), p)?);
    }
    crt(&residues, primelist)
}
