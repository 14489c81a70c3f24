use crate::ui::theme;
use std::fmt;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    let (color, _, _, _) = theme::palette();
    println!("{}{}{} {}{}", color, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    let (_, color, _, _) = theme::palette();
    println!("{}{}{} {}{}", color, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    let (_, _, color, _) = theme::palette();
    println!("{}{}{} {}{}", color, BOLD, ICON_WARN, RESET, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    let (_, _, _, color) = theme::palette();
    eprintln!("{}{}{} {}{}", color, BOLD, ICON_ERR, RESET, msg);
}

/// Formatted section header
pub fn header<T: fmt::Display>(msg: T) {
    let (color, _, _, _) = theme::palette();
    println!("{}{}=== {} ==={}", color, BOLD, msg, RESET);
}
