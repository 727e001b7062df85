use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use tracing_subscriber::EnvFilter;

use textbook_rsa::ui::demo::{
    deterministic_demo, probabilistic_demo, run_deterministic_demo, run_probabilistic_demo,
    DemoReport, DETERMINISTIC_MESSAGE, PROBABILISTIC_MESSAGE,
};
use textbook_rsa::{GeneratorConfig, RsaResult};

#[derive(Parser)]
#[command(name = "textbook-rsa", about = "Walk through RSA key generation, encryption and decryption")]
struct Cli {
    /// Miller-Rabin rounds per candidate
    #[arg(long, global = true, env = "RSA_MR_ROUNDS")]
    rounds: Option<u32>,

    /// Public exponent e
    #[arg(long, global = true)]
    exponent: Option<u64>,

    /// Message to encrypt (decimal, must be smaller than the modulus)
    #[arg(long, global = true)]
    message: Option<BigUint>,

    /// Give up on a prime after this many candidates
    #[arg(long, global = true)]
    max_steps: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Slow, guaranteed primes found by trial division
    Deterministic {
        /// Bit width of each generated prime (multiple of 8, at most 64)
        #[arg(long)]
        bits: Option<u32>,
    },
    /// Miller-Rabin probable primes
    Probabilistic {
        /// Bit width of each generated prime (positive multiple of 8)
        #[arg(long)]
        bits: Option<u32>,
    },
    /// Both scenarios with their default widths, deterministic first
    All,
}

impl Cli {
    /// Whether any setting differs from the scenario defaults
    fn has_overrides(&self, bits: Option<u32>) -> bool {
        bits.is_some()
            || self.rounds.is_some()
            || self.exponent.is_some()
            || self.message.is_some()
            || self.max_steps.is_some()
    }

    fn apply(&self, mut config: GeneratorConfig, bits: Option<u32>) -> GeneratorConfig {
        if let Some(bits) = bits {
            config = config.with_prime_bits(bits);
        }
        if let Some(rounds) = self.rounds {
            config = config.with_rounds(rounds);
        }
        if let Some(e) = self.exponent {
            config = config.with_public_exponent(e);
        }
        if let Some(steps) = self.max_steps {
            config = config.with_max_search_steps(steps);
        }
        config
    }

    fn message_or(&self, default: u64) -> BigUint {
        self.message.clone().unwrap_or_else(|| BigUint::from(default))
    }
}

fn deterministic(cli: &Cli, bits: Option<u32>) -> RsaResult<DemoReport> {
    if !cli.has_overrides(bits) {
        return deterministic_demo();
    }
    let config = cli.apply(GeneratorConfig::deterministic_demo(), bits);
    run_deterministic_demo(&config, &cli.message_or(DETERMINISTIC_MESSAGE), &mut OsRng)
}

fn probabilistic(cli: &Cli, bits: Option<u32>) -> RsaResult<DemoReport> {
    if !cli.has_overrides(bits) {
        return probabilistic_demo();
    }
    let config = cli.apply(GeneratorConfig::probabilistic_demo(), bits);
    run_probabilistic_demo(&config, &cli.message_or(PROBABILISTIC_MESSAGE), &mut OsRng)
}

fn run(cli: &Cli) -> Result<()> {
    let (run_deterministic, run_probabilistic, bits) = match cli.command {
        Command::Deterministic { bits } => (true, false, bits),
        Command::Probabilistic { bits } => (false, true, bits),
        Command::All => (true, true, None),
    };

    if run_deterministic {
        let report = deterministic(cli, bits).context("deterministic scenario failed")?;
        println!("{}\n", report);
    }

    if run_probabilistic {
        let report = probabilistic(cli, bits).context("probabilistic scenario failed")?;
        println!("{}\n", report);
    }

    Ok(())
}

fn main() {
    // LOG_FORMAT=json for machine-readable logs, human-readable otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
