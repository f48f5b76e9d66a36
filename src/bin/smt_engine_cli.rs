//! CLI driver for the SMT update engine. Thin shell, per `SPEC_FULL.md` §1: all
//! processor logic lives in the library, this binary only parses flags, loads
//! fixtures, and reports results.

use clap::{Parser, Subcommand};
use smt_engine::field::from_decimal;
use smt_engine::{engine, testvec, EngineError, PoseidonHasher, SmtUpdate};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "smt-engine-cli")]
#[command(about = "Run and verify Sparse Merkle Tree update operations")]
struct Cli {
    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single insert/update/delete/no-op and print the resulting newRoot.
    Run {
        #[arg(long)]
        n_levels: usize,
        #[arg(long)]
        old_root: String,
        /// Comma-separated decimal siblings, root-to-leaf.
        #[arg(long, value_delimiter = ',')]
        siblings: Vec<String>,
        #[arg(long)]
        old_key: String,
        #[arg(long)]
        old_value: String,
        #[arg(long)]
        is_old0: bool,
        #[arg(long)]
        new_key: String,
        #[arg(long)]
        new_value: String,
        /// `fnc` as two comma-separated bits, e.g. "1,0" for insert.
        #[arg(long, value_delimiter = ',')]
        fnc: Vec<String>,
    },

    /// Replay every record in a circomlib-style JSON test-vector file and report
    /// pass/fail per record.
    VerifyVectors {
        path: std::path::PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .init();
}

fn parse_field(name: &str, value: &str) -> anyhow::Result<smt_engine::F> {
    from_decimal(value)
        .ok_or_else(|| EngineError::InputOutOfField {
            field: name.to_string(),
            value: value.to_string(),
        })
        .map_err(Into::into)
}

fn run(
    n_levels: usize,
    old_root: &str,
    siblings: &[String],
    old_key: &str,
    old_value: &str,
    is_old0: bool,
    new_key: &str,
    new_value: &str,
    fnc: &[String],
) -> anyhow::Result<()> {
    anyhow::ensure!(fnc.len() == 2, "--fnc must have exactly two comma-separated bits");

    let siblings = siblings
        .iter()
        .map(|s| parse_field("siblings[]", s))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let input = SmtUpdate {
        n_levels,
        old_root: parse_field("old_root", old_root)?,
        siblings,
        old_key: parse_field("old_key", old_key)?,
        old_value: parse_field("old_value", old_value)?,
        is_old0,
        new_key: parse_field("new_key", new_key)?,
        new_value: parse_field("new_value", new_value)?,
        fnc: (parse_field("fnc[0]", &fnc[0])?, parse_field("fnc[1]", &fnc[1])?),
    };

    let hasher = PoseidonHasher::new();
    match engine::process(&input, &hasher) {
        Ok(new_root) => {
            println!("{new_root}");
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn verify_vectors(path: &std::path::Path) -> anyhow::Result<()> {
    let vectors = testvec::load(path)?;
    let hasher = PoseidonHasher::new();

    let mut failed = 0usize;
    for (i, vector) in vectors.iter().enumerate() {
        match engine::process(&vector.input, &hasher) {
            Ok(new_root) if new_root == vector.expected_new_root => {
                println!("vector {i}: pass");
            }
            Ok(new_root) => {
                failed += 1;
                println!(
                    "vector {i}: FAIL (expected {}, got {})",
                    vector.expected_new_root, new_root
                );
            }
            Err(e) => {
                failed += 1;
                println!("vector {i}: FAIL (engine error: {e})");
            }
        }
    }

    println!("{}/{} vectors passed", vectors.len() - failed, vectors.len());
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            n_levels,
            old_root,
            siblings,
            old_key,
            old_value,
            is_old0,
            new_key,
            new_value,
            fnc,
        } => run(
            n_levels, &old_root, &siblings, &old_key, &old_value, is_old0, &new_key, &new_value,
            &fnc,
        ),
        Commands::VerifyVectors { path } => verify_vectors(&path),
    }
}
