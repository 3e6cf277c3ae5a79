/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Color used when printing an attendance status.
pub fn color_for_status(status: &str) -> &'static str {
    match status {
        "present" => GREEN,
        "late" => YELLOW,
        "early_leave" => MAGENTA,
        "absent" => RED,
        "incomplete" => CYAN,
        _ => RESET,
    }
}

/// Grey out empty fields (`--:--`, zero hours).
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--:--" || value.trim() == "00h 00m" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
