//! DataEncoder (`spec.md` §3 "Block i" row, §4 overview): draws the
//! publisher's per-block secret triple and derives the `(SUM, D1, D2)`
//! values the rest of the pipeline actually operates on.

use num_bigint::{BigUint, RandBigInt};
use rand::Rng;

use crate::error::{OtError, Result};
use crate::prime_setup::Moduli;

/// One block's secret triple plus its derived linear combinations.
///
/// `d0` is boosted by `+encodingrange` so `d0 > d1` and `d0 > d2`
/// unconditionally, which keeps `diff1`/`diff2` non-negative — `BigUint`
/// has no signed representation, and the non-negativity is also an
/// intentional (if mildly leaky) design choice per `spec.md` §9 Open
/// Question 4: an adversary observing non-negative differences learns a
/// faint restriction on the plaintext space. No mitigation is in scope.
#[derive(Clone, Debug)]
pub struct Block {
    pub data: [BigUint; 3],
    pub sum: BigUint,
    pub diff1: BigUint,
    pub diff2: BigUint,
}

impl Block {
    fn new(d0: BigUint, d1: BigUint, d2: BigUint) -> Block {
        let sum = &d0 + &d1 + &d2;
        let diff1 = &d0 - &d1;
        let diff2 = &d0 - &d2;
        Block {
            data: [d0, d1, d2],
            sum,
            diff1,
            diff2,
        }
    }
}

/// Draws `blockcount` blocks. Fails with `EncodingOverflow` the moment a
/// boosted `d0` reaches or exceeds `primes` (`spec.md` §4.1/§7) — this is
/// checked eagerly, per block, matching the original script's fail-fast
/// behavior rather than batching the check at the end.
pub fn generate<R: Rng>(
    blockcount: usize,
    moduli: &Moduli,
    rng: &mut R,
) -> Result<Vec<Block>> {
    let mut blocks = Vec::with_capacity(blockcount);
    for block_index in 0..blockcount {
        let d0 = rng.gen_biguint_below(&moduli.encodingrange) + &moduli.encodingrange;
        let d1 = rng.gen_biguint_below(&moduli.encodingrange);
        let d2 = rng.gen_biguint_below(&moduli.encodingrange);

        if d0 >= moduli.primes {
            return Err(OtError::EncodingOverflow {
                block: block_index,
                d0,
            });
        }

        blocks.push(Block::new(d0, d1, d2));
    }
    Ok(blocks)
}
