//! lazer-link - Browse an osu!lazer library as a folder tree
//!
//! Usage:
//!   lazer-link --out <dir> --catalog <file> --all      Link every beatmap set
//!   lazer-link --out <dir> --validate                  Prune dangling links
//!   lazer-link --catalog <file> --export json          Export the catalog
//!   lazer-link --help                                  Show help

use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        cli::print_help();
        return Ok(());
    }

    let options = match cli::parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            cli::print_help();
            std::process::exit(2);
        }
    };

    init_logging(options.quiet);
    cli::run(options)
}

/// Logs go to stderr so catalog exports on stdout stay clean.
fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
