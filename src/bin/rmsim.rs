//! Reed-Muller channel simulator
//!
//! Reads a file, expands its payload into bits, encodes them with RM(r, m),
//! sends the codewords through a binary symmetric channel and decodes them
//! again. The decoded file, and optionally the same payload sent without any
//! coding, are written back with the leading header bytes left untouched so
//! formats such as bitmaps stay viewable.

use anyhow::{Context, Result};
use clap::ArgMatches;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rmcode::args::SimulationArgs;
use rmcode::bits::{bits_to_bytes, bytes_to_bits};
use rmcode::reporters::{
    ConsoleSimulationReporter, Reporter, SilentSimulationReporter, SimulationReporter,
};
use rmcode::{BinarySymmetricChannel, CancelToken, ReedMullerCodec};
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let matches = rmcode::parse_args();

    // Errors reach stderr even in quiet mode
    let console = ConsoleSimulationReporter::new();
    if let Err(e) = run(&matches, &console) {
        console.report_error(&format!("{e:#}"));
        process::exit(1);
    }
}

fn run(matches: &ArgMatches, console: &ConsoleSimulationReporter) -> Result<()> {
    let args = SimulationArgs::from_matches(matches).context("Invalid code parameters")?;

    let silent = SilentSimulationReporter::new();
    let reporter: &dyn SimulationReporter = if args.quiet { &silent } else { console };

    let data = fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let header_len = args.header_bytes.min(data.len());
    let (header, payload) = data.split_at(header_len);
    let message = bytes_to_bits(payload);

    let channel = BinarySymmetricChannel::new(args.error_probability)
        .context("Invalid error probability")?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let codec = ReedMullerCodec::new(args.order, args.config.clone())
        .with_context(|| format!("Failed to set up {}", args.order))?;

    let report = codec
        .simulate(&message, &channel, &mut rng, reporter, &CancelToken::new())
        .context("Simulation failed")?;

    if let Some(output) = &args.output {
        write_bits(output, header, &report.decoded)?;
        reporter.report_complete(&format!("Decoded file written to {}", output.display()));
    }
    if let Some(output) = &args.uncoded_output {
        write_bits(output, header, &report.uncoded)?;
        reporter.report_complete(&format!("Uncoded file written to {}", output.display()));
    }

    Ok(())
}

fn write_bits(path: &Path, header: &[u8], bits: &[u8]) -> Result<()> {
    let mut bytes = header.to_vec();
    bytes.extend(bits_to_bytes(bits)?);
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
