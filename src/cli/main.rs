//! # MinDB CLI
//!
//! An interactive shell that compiles each query and prints its AST.
//!
//! Usage: `mindb [QUERY] [--format text|json]`. With a QUERY the shell runs
//! it once and exits; otherwise it reads queries at a `db > ` prompt until
//! `:q` or end of input. Log verbosity follows `RUST_LOG`.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mindb::{Database, DescribeExecutor, OutputFormat};

const PROMPT: &str = "db > ";
const QUIT: &str = ":q";

#[derive(Parser, Debug)]
#[command(name = "mindb")]
#[command(about = "Compile MinDB queries and show their syntax tree", long_about = None)]
struct Args {
    /// Run this single query and exit instead of starting the shell
    query: Option<String>,

    /// How to print compiled queries
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mindb=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut db = Database::new(DescribeExecutor::new(args.format.into()));

    if let Some(query) = args.query {
        return if execute_query(&mut db, &query) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    if let Err(e) = run_shell(&mut db) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_shell(db: &mut Database<DescribeExecutor>) -> mindb::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{PROMPT}");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let input = line.trim_end_matches(['\r', '\n']);
        if input.trim().eq_ignore_ascii_case(QUIT) {
            break;
        }

        execute_query(db, input);
    }

    println!();
    Ok(())
}

/// Run one query and print its outcome. Returns `false` on error.
fn execute_query(db: &mut Database<DescribeExecutor>, input: &str) -> bool {
    match db.execute(input) {
        Ok(result) => {
            for row in result {
                println!("{}", row.values.join("|"));
            }
            true
        }
        Err(e) => {
            eprintln!("Error: {e}");
            false
        }
    }
}
