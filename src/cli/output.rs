//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print a visible segment: path in green, placement plain
pub fn segment(path: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {} {}", path.green(), msg);
}

/// Print a hidden (zero-weight) segment, dimmed
pub fn hidden(path: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {} {}", path.dimmed(), msg.to_string().dimmed());
}

/// Print a moving segment (yellow arrow between old and new)
pub fn moved(
    path: &str,
    from: &(impl std::fmt::Display + ?Sized),
    to: &(impl std::fmt::Display + ?Sized),
) {
    println!("  {} {} {} {}", path.green(), from, "->".yellow(), to);
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
