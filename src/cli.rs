//! Line-oriented issuance session
//!
//! Each input line is split into words (single or double quotes group words)
//! and parsed with clap. [`Session::execute`] runs the command against a
//! [`TicketIssuer`]; [`render`] and [`render_error`] turn results into
//! terminal text.

use crate::blockchain::Block;
use crate::error::{LedgerError, Result};
use crate::export;
use crate::issuer::{ChainStatus, TicketIssuer};
use crate::transaction::Transaction;
use chrono::{DateTime, Utc};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ticketchain", no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Issue a new ticket and seal it into its own block
    Issue {
        organizer: String,
        event: String,
        ticket_id: String,
        buyer: String,
    },
    /// Look up a sealed ticket
    Verify { ticket_id: String },
    /// Show chain length and validity
    Status,
    /// List every block, newest first
    Explore,
    /// Write the chain to a JSON Lines file
    Export { path: Option<PathBuf> },
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Issued(Block),
    Verified(Transaction),
    Status(ChainStatus),
    Explorer(Vec<Block>),
    Exported { path: PathBuf, blocks: usize },
    /// Help text requested by the user.
    Help(String),
    /// The line did not parse; carries clap's message.
    Usage(String),
    Empty,
    Quit,
}

/// Split a line into words. Quotes group words and are removed; an
/// unterminated quote is an error.
pub fn split_words(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {} quote", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Parse one line. `Ok(None)` for a blank line.
pub fn parse_line(line: &str) -> std::result::Result<Option<Command>, clap::Error> {
    let words = split_words(line).map_err(|msg| {
        clap::Error::raw(ErrorKind::InvalidValue, format!("{}\n", msg))
    })?;
    if words.is_empty() {
        return Ok(None);
    }
    SessionLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}

pub struct Session {
    issuer: TicketIssuer,
    export_path: Option<PathBuf>,
}

impl Session {
    pub fn new(issuer: TicketIssuer, export_path: Option<PathBuf>) -> Self {
        Self {
            issuer,
            export_path,
        }
    }

    pub fn issuer(&self) -> &TicketIssuer {
        &self.issuer
    }

    pub fn execute(&self, line: &str) -> Result<Outcome> {
        match parse_line(line) {
            Ok(Some(command)) => self.run(command),
            Ok(None) => Ok(Outcome::Empty),
            Err(e) if e.kind() == ErrorKind::DisplayHelp => Ok(Outcome::Help(e.to_string())),
            Err(e) if e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                Ok(Outcome::Help(e.to_string()))
            }
            Err(e) => Ok(Outcome::Usage(e.to_string())),
        }
    }

    pub fn run(&self, command: Command) -> Result<Outcome> {
        match command {
            Command::Issue {
                organizer,
                event,
                ticket_id,
                buyer,
            } => self
                .issuer
                .issue(&organizer, &event, &ticket_id, &buyer)
                .map(Outcome::Issued),
            Command::Verify { ticket_id } => {
                self.issuer.verify_ticket(&ticket_id).map(Outcome::Verified)
            }
            Command::Status => Ok(Outcome::Status(self.issuer.status())),
            Command::Explore => Ok(Outcome::Explorer(self.issuer.explorer())),
            Command::Export { path } => {
                let path = path.or_else(|| self.export_path.clone()).ok_or_else(|| {
                    LedgerError::ConfigError(
                        "no export path given and export.path is not configured".to_string(),
                    )
                })?;
                let blocks = self.issuer.snapshot();
                export::save_to(&path, &blocks)?;
                Ok(Outcome::Exported {
                    path,
                    blocks: blocks.len(),
                })
            }
            Command::Quit => Ok(Outcome::Quit),
        }
    }
}

pub fn render(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Issued(block) => {
            let ticket_id = block
                .transactions
                .first()
                .map(|tx| tx.ticket_id.as_str())
                .unwrap_or("?");
            format!(
                "{}\n{}",
                format!("✅ Ticket {} added in Block {}", ticket_id, block.index).green(),
                format!("   hash {}", block.hash).dimmed()
            )
        }
        Outcome::Verified(tx) => format!(
            "{}\n{}",
            "✅ Ticket Found!".green().bold(),
            transaction_table(std::slice::from_ref(tx))
        ),
        Outcome::Status(status) => render_status(status),
        Outcome::Explorer(blocks) => render_explorer(blocks),
        Outcome::Exported { path, blocks } => format!(
            "{}",
            format!("💾 Exported {} block(s) to {}", blocks, path.display()).cyan()
        ),
        Outcome::Help(text) => text.clone(),
        Outcome::Usage(text) => format!("{}", text.yellow()),
        Outcome::Empty | Outcome::Quit => String::new(),
    }
}

pub fn render_error(err: &LedgerError) -> String {
    let message = match err {
        LedgerError::DuplicateTicket(_) => {
            "❌ Ticket ID already exists! Duplicate not allowed.".to_string()
        }
        LedgerError::TicketNotFound(_) => "❌ Invalid or Fake Ticket!".to_string(),
        other => format!("❌ {}", other),
    };
    format!("{}", message.red())
}

fn render_status(status: &ChainStatus) -> String {
    let validity = if status.valid {
        "✅ Yes".green().to_string()
    } else {
        "❌ No".red().bold().to_string()
    };
    format!(
        "{} {}   {} {}",
        "Chain Length:".bright_cyan(),
        status.length,
        "Is Chain Valid?".bright_cyan(),
        validity
    )
}

fn render_explorer(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new(format!("Block {}", block.index))
                    .add_attribute(Attribute::Bold)
                    .fg(TableColor::Cyan),
                Cell::new(""),
            ]);
        table.add_row(vec![Cell::new("Timestamp"), Cell::new(format_timestamp(block.timestamp))]);
        table.add_row(vec![Cell::new("Proof"), Cell::new(block.proof)]);
        table.add_row(vec![Cell::new("Previous Hash"), Cell::new(&block.previous_hash)]);
        table.add_row(vec![Cell::new("Hash"), Cell::new(&block.hash)]);
        table.add_row(vec![
            Cell::new("Transactions"),
            Cell::new(block.transactions.len()),
        ]);
        out.push_str(&table.to_string());
        out.push('\n');
        if !block.transactions.is_empty() {
            out.push_str(&transaction_table(&block.transactions));
            out.push('\n');
        }
    }
    out
}

fn transaction_table(transactions: &[Transaction]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Ticket ID").add_attribute(Attribute::Bold),
            Cell::new("Organizer").add_attribute(Attribute::Bold),
            Cell::new("Event").add_attribute(Attribute::Bold),
            Cell::new("Buyer").add_attribute(Attribute::Bold),
        ]);
    for tx in transactions {
        table.add_row(vec![
            Cell::new(&tx.ticket_id).fg(TableColor::Green),
            Cell::new(&tx.organizer),
            Cell::new(&tx.event),
            Cell::new(&tx.buyer),
        ]);
    }
    table.to_string()
}

fn format_timestamp(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}
