mod args;
mod output;

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use mailprobe_lib::Verifier;
use tracing_subscriber::EnvFilter;

use crate::args::Cli;
use crate::output::{Report, all_deliverable, write_reports};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut addresses = cli.emails.clone();
    if cli.stdin {
        for line in io::stdin().lock().lines() {
            let line = line.context("read stdin")?;
            let line = line.trim();
            if !line.is_empty() {
                addresses.push(line.to_string());
            }
        }
    }
    if addresses.is_empty() {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    }

    let verifier = Verifier::from_system_conf(cli.probe_options())?;
    let reports: Vec<Report> = addresses
        .iter()
        .map(|address| Report::new(address, verifier.verify(address)))
        .collect();

    write_reports(&reports, &cli)?;

    // exit codes: 0 all deliverable, 2 otherwise, 1 fatal
    if !all_deliverable(&reports) {
        std::process::exit(2);
    }
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::try_from_default_env().context("invalid RUST_LOG")?
    } else {
        EnvFilter::new(format!(
            "mailprobe={level},mailprobe_lib={level}",
            level = cli.log_level()
        ))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}
