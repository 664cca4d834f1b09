//! `fingeo-verify` — Checks declared finite-geometry claims with the fingeo engine.
//!
//! Builds every incidence space in the suite, recomputes the declared
//! properties (point counts, SRG parameters, spectra, orbits, idempotents,
//! isomorphisms) and prints a conformance report.
//!
//! **Usage:**
//! ```text
//! fingeo-verify [--suite <file.toml>] [--format text|json] [--records <out.json>] [--log-level <level>]
//! ```
//!
//! Without `--suite` the built-in W(3,3) / Q(4,3) suite runs.
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fingeo_conformance::{collect_artifacts, render_json, render_text, run_suite, SuiteConfig};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

/// Report output format.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Human-readable lines.
    Text,
    /// The report as JSON.
    Json,
}

/// Check finite-geometry claims.
#[derive(Parser)]
#[command(
    name = "fingeo-verify",
    about = "Check declared finite-geometry claims with exact and spectral computation"
)]
struct Args {
    /// Suite configuration (TOML). Defaults to the built-in suite.
    #[arg(long)]
    suite: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// Write the artifact bundle (points, lines, orbits, idempotents,
    /// certificates) to this JSON file.
    #[arg(long)]
    records: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(
            args.log_level
                .parse::<LevelFilter>()
                .unwrap_or(LevelFilter::WARN),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let suite = match &args.suite {
        Some(path) => SuiteConfig::load(path)?,
        None => SuiteConfig::builtin()?,
    };
    info!(
        spaces = suite.spaces.len(),
        claims = suite.isomorphisms.len(),
        "suite loaded"
    );

    let run = run_suite(&suite)?;
    let report = &run.report;

    match args.format {
        Format::Text => print!("{}", render_text(report)),
        Format::Json => println!("{}", render_json(report)?),
    }

    if let Some(path) = &args.records {
        let artifacts = collect_artifacts(&suite, &run)?;
        let json = serde_json::to_string_pretty(&artifacts)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "artifact bundle written");
    }

    let failed = report.failure_count();
    if failed > 0 {
        eprintln!("Conformance FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }
    if matches!(args.format, Format::Text) {
        println!("Conformance PASSED.");
    }
    Ok(())
}
