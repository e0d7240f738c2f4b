use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use asset_ledger_cli::handler::AssetHandler;
use asset_ledger_cli::script::run_script;
use asset_ledger_cli::store::MemStore;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a transcript of transaction proposals against a fresh ledger
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Transcript file (one JSON record per line); reads stdin when omitted
    script: Option<PathBuf>,

    /// Print the final state digest to stderr after the replay
    #[arg(long)]
    digest: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Command::Run(args) => run_cmd(&args),
    };
    process::exit(code);
}

fn run_cmd(args: &RunArgs) -> i32 {
    let handler = AssetHandler::new();
    let mut store = MemStore::new();

    let result = match &args.script {
        Some(path) => match File::open(path) {
            Ok(file) => run_script(BufReader::new(file), &handler, &mut store),
            Err(err) => {
                eprintln!("error: cannot open {}: {err}", path.display());
                return 2;
            }
        },
        None => run_script(io::stdin().lock(), &handler, &mut store),
    };

    let responses = match result {
        Ok(responses) => responses,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };

    let mut failures = 0usize;
    for response in &responses {
        if !response.is_success() {
            failures += 1;
        }
        match serde_json::to_string(response) {
            Ok(line) => println!("{line}"),
            Err(err) => {
                eprintln!("error: cannot encode response: {err}");
                return 1;
            }
        }
    }
    info!(transactions = responses.len(), failures, "replay finished");

    if args.digest {
        eprintln!("state digest: {}", hex::encode(store.digest()));
    }
    0
}
