#![forbid(unsafe_code)]
//! Interactive issuance session over stdin.

use clap::Parser;
use colored::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;
use ticketchain::cli::{render, render_error, Outcome, Session};
use ticketchain::config::{load_config, load_config_from};
use ticketchain::issuer::TicketIssuer;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./ticketchain.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Read commands from this file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let issuer = TicketIssuer::from_config(&config)?;
    let session = Session::new(issuer, config.export.path.clone());
    info!(proof = session.issuer().proof(), "session started");

    let interactive = cli.script.is_none() && io::stdin().is_terminal();
    let reader: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };

    if interactive {
        println!("{}", "🎟️  TicketChain session - type 'help' for commands".bright_cyan().bold());
        prompt()?;
    }

    for line in reader.lines() {
        let line = line?;
        match session.execute(&line) {
            Ok(Outcome::Quit) => break,
            Ok(outcome) => {
                let text = render(&outcome);
                if !text.is_empty() {
                    println!("{}", text);
                }
            }
            Err(e) => eprintln!("{}", render_error(&e)),
        }
        if interactive {
            prompt()?;
        }
    }

    let status = session.issuer().status();
    info!(length = status.length, valid = status.valid, "session ended");
    Ok(())
}

fn prompt() -> io::Result<()> {
    print!("{} ", "ticketchain>".bright_magenta());
    io::stdout().flush()
}
