//! One-line user messages with an icon and a colour per severity.
//! Errors go to stderr so scripted callers can keep stdout clean.

use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};
use std::fmt::Display;
use std::io::{self, BufRead, Write};

const BOLD: &str = "\x1b[1m";

fn line(color: &str, icon: &str, msg: impl Display) -> String {
    format!("{color}{BOLD}{icon}{RESET} {msg}")
}

pub fn info<T: Display>(msg: T) {
    println!("{}", line(CYAN, "ℹ️", msg));
}

pub fn success<T: Display>(msg: T) {
    println!("{}", line(GREEN, "✅", msg));
}

pub fn warning<T: Display>(msg: T) {
    println!("{}", line(YELLOW, "⚠️", msg));
}

pub fn error<T: Display>(msg: T) {
    eprintln!("{}", line(RED, "❌", msg));
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no,
/// including a closed stdin.
pub fn confirm<T: Display>(question: T) -> io::Result<bool> {
    print!("{} [y/N]: ", line(YELLOW, "⚠️", question));
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_keeps_message_after_reset() {
        let out = line(GREEN, "✅", "done");
        assert!(out.ends_with(&format!("{RESET} done")));
    }
}
