// src/utils/console.rs

//! User-facing console output with server-style formatting.
//!
//! Diagnostics go through the `log` facade; this module prints the
//! results a user asked for (listings, confirmations, summaries).

use std::sync::OnceLock;

use chrono::Local;

/// Whether output is suppressed
static QUIET: OnceLock<bool> = OnceLock::new();

/// Initialize the console with the quiet flag
pub fn init(quiet: bool) {
    let _ = QUIET.set(quiet);
}

fn enabled() -> bool {
    !QUIET.get().copied().unwrap_or(false)
}

/// Format a line with timestamp and tag
fn format_line(tag: &str, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{}] [{}] {}", timestamp, tag, message)
}

/// Print a plain result line
pub fn line(message: &str) {
    if enabled() {
        println!("{}", message);
    }
}

/// Print a success message
pub fn success(message: &str) {
    if enabled() {
        println!("{}", format_line("OK", &format!("✓ {}", message)));
    }
}

/// Print a blocking alert; shown even in quiet mode
pub fn alert(message: &str) {
    eprintln!("{}", format_line("ALERT", message));
}

/// Print a header
pub fn header(title: &str) {
    if enabled() {
        let border = "═".repeat(60);
        println!("{}", border);
        println!("  {}", title);
        println!("{}", border);
    }
}

/// Print a sub-item (indented)
pub fn sub_item(message: &str) {
    if enabled() {
        println!("    {}", message);
    }
}

/// Print a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    if enabled() {
        println!();
        println!("{}", format_line("SUMMARY", title));
        for (key, value) in items {
            println!("    {}: {}", key, value);
        }
    }
}
