//! Terminal output: ANSI styling for command reports and notes.

use taskpilot_commands::{CommandOutcome, CommandResult, Report};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Print a formatted INFO note to stderr.
pub fn note_info(msg: &str) {
    if supports_color() {
        eprintln!("{CYAN}{BOLD}ℹ{RESET} {msg}");
    } else {
        eprintln!("INFO: {msg}");
    }
}

/// Print a formatted ERROR note to stderr.
pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

/// Render a dispatch result the way it is printed on stdout.
///
/// The text is always `result.report()`; color only wraps it.
pub fn render_result(result: &CommandResult, color: bool) -> String {
    let text = result.report();
    if !color {
        return text;
    }
    match result {
        Ok(CommandOutcome::Reply(_)) => text,
        Ok(CommandOutcome::Shutdown { .. }) => format!("{YELLOW}{BOLD}{text}{RESET}"),
        Err(_) => format!("{RED}{text}{RESET}"),
    }
}

/// Print a dispatch result on stdout.
pub fn print_result(result: &CommandResult) {
    println!("{}", render_result(result, supports_color()));
}

/// Echo a directive in dim text before its result.
pub fn echo_directive(text: &str) {
    if supports_color() {
        eprintln!("{DIM}> {}{RESET}", text.replace('\n', "\n> "));
    }
}
