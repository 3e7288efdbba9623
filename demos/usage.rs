//! Example showing how to drive the OT carry/signature core directly,
//! without the CLI demo binary: build a small modulus, encode a handful of
//! blocks, and run Sample 1 end to end.
use ot_carry_core::{blinding_engine, data_encoder, decode_engine, params::Params, prime_setup};
use rand::thread_rng;

fn main() {
    // Small, fast parameters for illustration; the reference defaults
    // (primebits=128, modulusbits=8320, blockcount=1000) are what
    // `cargo run --bin ot_demo` uses.
    let params = Params::new(16, 200, 8, 8, 3, 10, "usage-example", false);

    // PrimeSetup: generates primelist/qprime and derives primes/n/coset/qspace.
    let moduli = prime_setup::generate(&params).expect("prime generation");
    println!(
        "n has {} bits, coset has {} bits, qspace has {} bits",
        moduli.n_bits(),
        moduli.coset_bits(),
        moduli.qspace_bits()
    );

    let mut rng = thread_rng();

    // DataEncoder: one random (SUM,D1,D2) triple per block.
    let blocks = data_encoder::generate(params.blockcount, &moduli, &mut rng).expect("data encoding");

    // BlindingEngine: one blinding factor and selection per request.
    let blinding = blinding_engine::BlindingState::new(&moduli, &mut rng).expect("blinding state");
    let selection = blinding_engine::Selection::draw(&mut rng);
    println!("requester selected index {}", selection.sindex);

    // ResponseEngine (Sample 1) + DecodeEngine, one block at a time.
    let (b0, b1, b2) = blinding.s1_coefficients(&moduli, &selection);
    for (i, block) in blocks.iter().enumerate() {
        let response = ot_carry_core::response_engine::sample1_response(&b0, &b1, &b2, block, &moduli.primes);
        let decoded = decode_engine::decode_s1s2(&response, &blinding.unblind, &moduli.primes);
        decode_engine::verify_decode(i, &decoded, &block.data[selection.sindex as usize]).expect("decode matches");
    }

    println!("Sample 1 round-trip succeeded over {} blocks", blocks.len());
}
