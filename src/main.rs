mod cli;

use std::io::{self, BufRead, Write};

use clap::Parser;
use miette::{IntoDiagnostic, NamedSource};
use simcalc::{AngleMode, ERROR, math::normalize::normalize};
use tracing_subscriber::EnvFilter;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = cli::Cli::parse();
    tracing::debug!(?cli, "starting");

    if let Some(input) = &cli.input {
        println!("{}", display(input, cli.angle, cli.explain));
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in io::stdin().lock().lines() {
        let line = line.into_diagnostic()?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(out, "{}", display(&line, cli.angle, cli.explain)).into_diagnostic()?;
        out.flush().into_diagnostic()?;
    }
    Ok(())
}

fn display(input: &str, angle: AngleMode, explain: bool) -> String {
    if !explain {
        return simcalc::evaluate_with(input, angle);
    }

    simcalc::try_display(input, angle).unwrap_or_else(|e| {
        let report =
            miette::Report::new(e).with_source_code(NamedSource::new("display", normalize(input)));
        eprintln!("{report:?}");
        ERROR.to_string()
    })
}
