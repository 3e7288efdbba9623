//! # ot-carry-core
//!
//! Cryptographic core of a demonstration oblivious-transfer (OT) protocol:
//! a requester retrieves exactly one of three publisher-held secrets per
//! data block from a prover, without the prover learning which one, while
//! a third party can verify the prover's responses against a
//! publisher-signed polynomial commitment.
//!
//! The crate implements three progressively stronger constructions over the
//! same per-block data:
//!
//! - **Sample 1** — a single modular linear combination, blinded by `2^b
//!   mod primes`.
//! - **Sample 2** — the same formula reduced modulo the larger composite
//!   `n = primes * qprime`, with the blinding coefficients additionally
//!   randomised in the `qspace` room above `primes`.
//! - **Sample 3** — a carry/fractional-split encoding of the Sample 2
//!   response that simultaneously supports decode and a Horner-polynomial
//!   signature check, without leaking the selection index.
//!
//! ## Pipeline
//!
//! ```text
//! PrimeSetup ──► BlindingEngine ──┐
//!                                 ├─► ResponseEngine (S1/S2/S3) ──► DecodeEngine
//! DataEncoder ────────────────────┘                                      │
//!                                                                        ▼
//! PolySigner ──► StoredResponses ──► Verifier
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use ot_carry_core::{params::Params, prime_setup, data_encoder, blinding_engine, response_engine, decode_engine};
//! use rand::thread_rng;
//!
//! let params = Params::new(16, 200, 8, 8, 3, 10, "demo", false);
//! let moduli = prime_setup::generate(&params).unwrap();
//! let mut rng = thread_rng();
//! let blocks = data_encoder::generate(params.blockcount, &moduli, &mut rng).unwrap();
//!
//! let blinding = blinding_engine::BlindingState::new(&moduli, &mut rng).unwrap();
//! let selection = blinding_engine::Selection::draw(&mut rng);
//! let (b0, b1, b2) = blinding.s1_coefficients(&moduli, &selection);
//!
//! for block in &blocks {
//!     let response = response_engine::sample1_response(&b0, &b1, &b2, block, &moduli.primes);
//!     let decoded = decode_engine::decode_s1s2(&response, &blinding.unblind, &moduli.primes);
//!     decode_engine::verify_decode(0, &decoded, &block.data[selection.sindex as usize]).unwrap();
//! }
//! ```
//!
//! For a complete S1 → S2 → S3 → verify walkthrough, see
//! [`demos/usage.rs`](https://github.com/). Run with `cargo run --example usage`
//! (the example lives under `demos/` in this workspace, not `examples/`,
//! because the latter is reserved here for retrieval-pack reference material).
//!
//! ## Notes
//!
//! - **Note 1:** every fatal condition from `spec.md` §7 (encoding overflow,
//!   non-invertible modular arithmetic, poly overflow, sanity-check
//!   divergence, decode mismatch, verifier mismatch) is a tagged
//!   [`error::OtError`] variant; there is no silent recovery path.
//! - **Note 2:** this is a teaching/demo construction. No claim of
//!   production-grade security is made, and its adversary model is not
//!   formalised.
//! - **Note 3:** all arithmetic runs on a single thread; components take an
//!   injected `rand::Rng` so callers can swap in their own CSPRNG, though
//!   `rand::thread_rng()` (backed by the OS CSPRNG) is the recommended
//!   default — see `spec.md` §5.
//!
//! ---

pub mod bigmath;
pub mod blinding_engine;
pub mod data_encoder;
pub mod decode_engine;
pub mod error;
pub mod hash;
pub mod params;
pub mod poly_signer;
pub mod prime_setup;
pub mod response_engine;
pub mod verifier;

pub use error::{OtError, Result};
pub use params::Params;
