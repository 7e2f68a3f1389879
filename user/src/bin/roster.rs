//! Reads student records from the terminal and prints them sorted by ID.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use input::Prompter;
use roster::{default_filter, log_subscriber, populate, render, Roster};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log admissions and rejected input to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(cli.verbose));
    let ansi = io::stderr().is_terminal();
    let subscriber = log_subscriber(filter, io::stderr, ansi);
    tracing::subscriber::set_global_default(subscriber)?;

    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
    let mut roster = Roster::new();
    populate(&mut prompter, &mut roster)?;

    let (_, stdout) = prompter.into_inner();
    render(&roster, stdout)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("{err:?}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
