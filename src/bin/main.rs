#![forbid(unsafe_code)]

use colored::*;

fn main() {
    println!("{}", "TicketChain CLI".bright_cyan().bold());
    println!("{}", "---------------".bright_cyan());
    println!();
    println!(
        "{}",
        "This is the main entry point, but the tools are separate binaries.".yellow()
    );
    println!(
        "{}",
        "Use 'cargo run --bin <binary_name>' to run a specific command.".yellow()
    );
    println!();
    println!("{}", "Available binaries:".bright_green().underline());
    println!(
        "  - {}  {}",
        "ticketchain-shell".bright_white(),
        "issue, verify and explore tickets in one session".dimmed()
    );
    println!(
        "  - {}  {}",
        "ticketchain-audit".bright_white(),
        "check an exported chain for tampering".dimmed()
    );
    println!();
    println!("{}", "Example:".bright_green().underline());
    println!(
        "{}",
        "  printf 'issue Org1 Gig T1 Alice\\nverify T1\\nstatus\\n' | cargo run --bin ticketchain-shell"
            .italic()
    );
}
