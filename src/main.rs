//! Demo driver: builds one modulus, runs Sample 1, Sample 2, and Sample 3
//! end to end over a batch of blocks, and (for Sample 3) a Verifier pass.
//! Illustrative only — `spec.md` §1 explicitly places the CLI driver,
//! timing prints, and process wiring out of the cryptographic core's scope.

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use rand::Rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ot_carry_core::{
    blinding_engine, data_encoder, decode_engine, params::Params, poly_signer, prime_setup,
    response_engine, verifier, Result,
};

/// Oblivious-transfer carry/signature core demo.
///
/// Every flag mirrors a `spec.md` §6 input; the defaults reproduce the
/// reference configuration (`primebits=128`, `modulusbits=8320`,
/// `blockcount=1000`, ...).
#[derive(Parser, Debug)]
#[command(name = "ot_demo", about = "Run Sample 1/2/3 of the OT carry/signature core")]
struct Cli {
    /// Bit-size of each generated prime (primelist entries and qprime).
    #[arg(long, env = "OT_PRIMEBITS", default_value_t = 128)]
    primebits: u32,

    /// Target bit-size of the composite modulus n.
    #[arg(long, env = "OT_MODULUSBITS", default_value_t = 8320)]
    modulusbits: u32,

    /// Number of data blocks to encode and transfer.
    #[arg(long, env = "OT_BLOCKCOUNT", default_value_t = 1000)]
    blockcount: usize,

    /// Number of publisher-signed polynomials (Sample 3 only).
    #[arg(long, env = "OT_POLYCOUNT", default_value_t = 12)]
    polycount: usize,

    /// Number of values offered per block (fixed at 3 by the construction).
    #[arg(long, env = "OT_BRAID_ELEMENT_COUNT", default_value_t = 3)]
    braid_element_count: usize,

    /// Bit-size roof for the small polynomial moduli.
    #[arg(long, env = "OT_SIGCOEFFICIENTMAXBITS", default_value_t = 12)]
    sigcoefficientmaxbits: u32,

    /// Domain-separation string folded into every polynomial's hash seed.
    #[arg(long, env = "OT_DECODEKEYS", default_value = "abc")]
    decodekeys: String,

    /// Cross-check CRT-accelerated blinding and carry precompute against a
    /// direct (slower) computation before trusting them.
    #[arg(long, env = "OT_SANITYCHECK", default_value_t = false)]
    sanitycheck: bool,

    /// Reduce blockcount/modulusbits to a fast, illustrative size instead of
    /// the full reference configuration.
    #[arg(long)]
    quick: bool,
}

fn run() -> Result<()> {
    let mut cli = Cli::parse();
    if cli.quick {
        cli.modulusbits = 400;
        cli.primebits = 32;
        cli.blockcount = 32;
    }

    let params = Params::new(
        cli.primebits,
        cli.modulusbits,
        cli.blockcount,
        cli.polycount,
        cli.braid_element_count,
        cli.sigcoefficientmaxbits,
        cli.decodekeys.clone(),
        cli.sanitycheck,
    );

    let t0 = Instant::now();
    let moduli = prime_setup::generate(&params)?;
    info!(
        elapsed_ms = t0.elapsed().as_millis() as u64,
        n_bits = moduli.n_bits(),
        qspace_bits = moduli.qspace_bits(),
        coset_bits = moduli.coset_bits(),
        "PrimeSetup complete"
    );

    let mut rng = rand::thread_rng();

    let t0 = Instant::now();
    let blocks = data_encoder::generate(params.blockcount, &moduli, &mut rng)?;
    info!(elapsed_ms = t0.elapsed().as_millis() as u64, blockcount = blocks.len(), "DataEncoder complete");

    // Sample 1
    let t0 = Instant::now();
    let blinding = blinding_engine::BlindingState::new(&moduli, &mut rng)?;
    let selection = blinding_engine::Selection::draw(&mut rng);
    let (b0, b1, b2) = blinding.s1_coefficients(&moduli, &selection);
    for (i, block) in blocks.iter().enumerate() {
        let response = response_engine::sample1_response(&b0, &b1, &b2, block, &moduli.primes);
        let decoded = decode_engine::decode_s1s2(&response, &blinding.unblind, &moduli.primes);
        decode_engine::verify_decode(i, &decoded, &block.data[selection.sindex as usize])?;
    }
    info!(elapsed_ms = t0.elapsed().as_millis() as u64, sindex = selection.sindex, "Sample 1 pass");

    // Sample 2
    let t0 = Instant::now();
    let randomised = blinding_engine::randomisers(&moduli, &blinding, &selection, &mut rng)?;
    if params.sanitycheck {
        blinding_engine::sanity_check_sample2(&moduli, &blinding, &selection, &randomised)?;
    }
    for (i, block) in blocks.iter().enumerate() {
        let response = response_engine::sample2_response(&randomised.b0, &randomised.b1, &randomised.b2, block, &moduli.n);
        let decoded = decode_engine::decode_s1s2(&response, &blinding.unblind, &moduli.primes);
        decode_engine::verify_decode(i, &decoded, &block.data[selection.sindex as usize])?;
    }
    info!(elapsed_ms = t0.elapsed().as_millis() as u64, "Sample 2 pass");

    // Sample 3
    let t0 = Instant::now();
    let carry = response_engine::S3Carry::prepare(&params, &moduli, &randomised.b0, &randomised.b1, &randomised.b2)?;
    if params.sanitycheck {
        carry.sanity_check(&params, &moduli, &randomised.b0, &randomised.b1, &randomised.b2)?;
    }
    let mut stored_b = Vec::with_capacity(blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        let response = response_engine::sample3_response(&params, &carry, block);
        let decoded = decode_engine::decode_s3(&response, &blinding.unblind, &params, &moduli);
        decode_engine::verify_decode(i, &decoded, &block.data[selection.sindex as usize])?;
        stored_b.push(response);
    }
    info!(elapsed_ms = t0.elapsed().as_millis() as u64, "Sample 3 pass");

    // PolySigner + Verifier
    let t0 = Instant::now();
    let polys = poly_signer::generate(&params, &blocks)?;
    info!(elapsed_ms = t0.elapsed().as_millis() as u64, polycount = polys.len(), "PolySigner complete");

    let t0 = Instant::now();
    let chosen = verifier::verify(&params, &polys, &carry, &stored_b, &mut rng)?;
    info!(elapsed_ms = t0.elapsed().as_millis() as u64, checked = chosen.len(), "Verifier pass");

    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "fatal");
            ExitCode::FAILURE
        }
    }
}
