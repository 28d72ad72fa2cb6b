#![forbid(unsafe_code)]
//! Offline tamper check for an exported chain.

use clap::Parser;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};
use std::path::PathBuf;
use std::process::ExitCode;
use ticketchain::blockchain::{audit_blocks, FaultKind};
use ticketchain::export::load_from;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON Lines snapshot written by `export`
    snapshot: PathBuf,
    /// Do not recompute the genesis block's own hash
    #[arg(long)]
    skip_genesis_hash: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let blocks = match load_from(&cli.snapshot) {
        Ok(blocks) => blocks,
        Err(e) => {
            eprintln!("{}", format!("❌ Failed to read {}: {}", cli.snapshot.display(), e).red());
            return ExitCode::from(2);
        }
    };

    let faults = audit_blocks(&blocks, !cli.skip_genesis_hash);
    println!(
        "{} {} block(s), {} ticket(s)",
        "📜 Snapshot:".bright_cyan(),
        blocks.len(),
        blocks.iter().map(|b| b.transactions.len()).sum::<usize>()
    );

    if faults.is_empty() {
        println!("{}", "✅ Chain is valid".green().bold());
        return ExitCode::SUCCESS;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Position").add_attribute(Attribute::Bold),
            Cell::new("Block").add_attribute(Attribute::Bold),
            Cell::new("Fault").add_attribute(Attribute::Bold),
            Cell::new("Detail").add_attribute(Attribute::Bold),
        ]);
    for fault in &faults {
        let (name, detail) = match &fault.kind {
            FaultKind::PreviousHashMismatch { expected, found } => {
                ("previous_hash", format!("expected {}\nfound    {}", expected, found))
            }
            FaultKind::HashMismatch { stored, computed } => {
                ("hash", format!("stored   {}\ncomputed {}", stored, computed))
            }
            FaultKind::IndexGap { expected, found } => {
                ("index", format!("expected {}, found {}", expected, found))
            }
        };
        table.add_row(vec![
            Cell::new(fault.position),
            Cell::new(fault.block_index),
            Cell::new(name).fg(TableColor::Red),
            Cell::new(detail),
        ]);
    }

    println!("{}", table);
    println!("{}", format!("❌ {} fault(s) found", faults.len()).red().bold());
    ExitCode::FAILURE
}
