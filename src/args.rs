use crate::config::CodecConfig;
use crate::error::Result;
use crate::reed_muller::CodeOrder;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};

/// Command line of the `rmsim` binary
pub fn build_command() -> Command {
    Command::new("rmsim")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Send a file through a noisy binary channel protected by a Reed-Muller code")
        .arg(
            Arg::new("input")
                .help("Input file")
                .required(true)
                .value_parser(|input: &str| {
                    let path = Path::new(input);
                    if path.is_file() {
                        Ok(path.to_path_buf())
                    } else {
                        Err(String::from("Input file does not exist"))
                    }
                }),
        )
        .arg(
            Arg::new("output")
                .help("Where to write the decoded file")
                .required(false)
                .value_parser(existing_parent),
        )
        .arg(
            Arg::new("variables")
                .short('m')
                .long("variables")
                .help("Number of variables m; blocks are 2^m bits long")
                .value_name("M")
                .value_parser(value_parser!(usize))
                .default_value("3"),
        )
        .arg(
            Arg::new("degree")
                .short('r')
                .long("degree")
                .help("Maximum monomial degree r")
                .value_name("R")
                .value_parser(value_parser!(usize))
                .default_value("1"),
        )
        .arg(
            Arg::new("error-probability")
                .short('p')
                .long("error-probability")
                .help("Probability that the channel flips a bit")
                .value_name("PE")
                .value_parser(value_parser!(f64))
                .default_value("0.0"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for reproducible channel noise")
                .value_name("SEED")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("header-bytes")
                .long("header-bytes")
                .help("Leading bytes copied to the outputs without coding or noise")
                .value_name("BYTES")
                .value_parser(value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            Arg::new("uncoded-output")
                .long("uncoded-output")
                .help("Also write the file as received without any coding")
                .value_name("FILE")
                .value_parser(existing_parent),
        )
        .arg(
            Arg::new("decoder")
                .long("decoder")
                .help("Decoder to use")
                .value_parser(["majority", "hadamard"])
                .default_value("majority"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of CPU threads for computation (0 = auto-detect)")
                .value_name("N"),
        )
        .arg(
            Arg::new("no-parallel")
                .long("no-parallel")
                .help("Disable parallel block processing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print errors")
                .action(ArgAction::SetTrue),
        )
}

pub fn parse_args() -> ArgMatches {
    build_command().get_matches()
}

fn existing_parent(output: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(output);
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            Err(String::from("Output directory does not exist"))
        }
        _ => Ok(path),
    }
}

/// Everything `rmsim` needs, pulled out of the parsed command line
#[derive(Debug, Clone)]
pub struct SimulationArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub uncoded_output: Option<PathBuf>,
    pub order: CodeOrder,
    pub error_probability: f64,
    pub seed: Option<u64>,
    pub header_bytes: usize,
    pub quiet: bool,
    pub config: CodecConfig,
}

impl SimulationArgs {
    /// Validates the code order; the error probability is checked by the
    /// channel itself
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let variables = matches.get_one::<usize>("variables").copied().unwrap_or(3);
        let degree = matches.get_one::<usize>("degree").copied().unwrap_or(1);
        Ok(Self {
            input: matches.get_one::<PathBuf>("input").cloned().unwrap_or_default(),
            output: matches.get_one::<PathBuf>("output").cloned(),
            uncoded_output: matches.get_one::<PathBuf>("uncoded-output").cloned(),
            order: CodeOrder::new(degree, variables)?,
            error_probability: matches
                .get_one::<f64>("error-probability")
                .copied()
                .unwrap_or(0.0),
            seed: matches.get_one::<u64>("seed").copied(),
            header_bytes: matches.get_one::<usize>("header-bytes").copied().unwrap_or(0),
            quiet: matches.get_flag("quiet"),
            config: CodecConfig::from_args(matches)?,
        })
    }
}
