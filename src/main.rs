//! secure-pillar - Encrypt values in Salt pillar files with GnuPG.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use secure_pillar::cli::output;
use secure_pillar::cli::{execute, Cli};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("SECURE_PILLAR_LOG").unwrap_or_else(|_| {
        if cli.global.verbose {
            EnvFilter::new("secure_pillar=debug")
        } else {
            EnvFilter::new("secure_pillar=warn")
        }
    });

    // Logs go to stderr; stdout carries pillar output.
    let json = std::env::var("SECURE_PILLAR_LOG_FORMAT").is_ok_and(|format| format == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    if let Err(e) = execute(cli.command, &cli.global) {
        output::error(&e.to_string());
        if let Some(hint) = e.hint() {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
