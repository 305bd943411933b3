//! Terminal styling utilities for the operator console

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "");
pub static BEE: Emoji<'_, '_> = Emoji("🐝 ", "");

/// Print the application banner with ASCII art
pub fn print_banner(version: &str) {
    let banner = r#"
    ██╗  ██╗██╗██╗   ██╗███████╗ ██████╗████████╗██╗
    ██║  ██║██║██║   ██║██╔════╝██╔════╝╚══██╔══╝██║
    ███████║██║██║   ██║█████╗  ██║        ██║   ██║
    ██╔══██║██║╚██╗ ██╔╝██╔══╝  ██║        ██║   ██║
    ██║  ██║██║ ╚████╔╝ ███████╗╚██████╗   ██║   ███████╗
    ╚═╝  ╚═╝╚═╝  ╚═══╝  ╚══════╝ ╚═════╝   ╚═╝   ╚══════╝
    "#;

    println!();
    println!("{}", style(banner).yellow().bold());
    println!(
        "    {}{}",
        BEE,
        style("Operator console for agents, swarms and wallets").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the backend connection card
pub fn print_backend_card(program: &Path, args: &[String], timeout: Duration) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    let command = if args.is_empty() {
        program.display().to_string()
    } else {
        format!("{} {}", program.display(), args.join(" "))
    };

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Backend").cyan().bold(),
        " ".repeat(box_width - 14)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {}Command: {:<41}│",
        LINK,
        truncate_string(&command, 40)
    );
    println!(
        "    │  {}Timeout: {:<41}│",
        CLOCK,
        style(format!("{}s", timeout.as_secs())).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a menu header with the breadcrumb path
pub fn print_menu_header(path: &str, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(path).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {}{}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", style("!").yellow().bold(), style(message).yellow());
}

/// Print a failure message
pub fn print_failure(message: &str) {
    println!("    {} {}", style("✗").red().bold(), style(message).red());
}

/// Print the final message when the operator leaves the console
pub fn print_completion() {
    println!();
    println!("    {}{}", ROCKET, style("Session closed.").green().bold());
    println!();
}

/// Shorten a string to `max_len` characters, keeping its tail
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(count - max_len.saturating_sub(3)).collect();
        format!("...{}", tail)
    }
}
