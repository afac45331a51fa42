//! Terminal detection utilities.

use std::env;
use std::sync::atomic::{AtomicU8, Ordering};

const COLOR_AUTO: u8 = 0;
const COLOR_ALWAYS: u8 = 1;
const COLOR_NEVER: u8 = 2;

static COLOR_OVERRIDE: AtomicU8 = AtomicU8::new(COLOR_AUTO);

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Forces color on or off for the rest of the process, or restores
/// detection with `None`.
pub fn set_color_override(force: Option<bool>) {
    let value = match force {
        None => COLOR_AUTO,
        Some(true) => COLOR_ALWAYS,
        Some(false) => COLOR_NEVER,
    };
    COLOR_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Determines if ANSI color codes should be used.
///
/// An override from [`set_color_override`] wins. Otherwise respects standard
/// conventions:
/// - `NO_COLOR` (any value): disables color (<https://no-color.org/>)
/// - `CLICOLOR=0`: disables color
/// - `TERM=dumb`: disables color
/// - `CLICOLOR_FORCE` (any value): forces color even in non-TTY
/// - Falls back to TTY detection
pub fn supports_color() -> bool {
    match COLOR_OVERRIDE.load(Ordering::Relaxed) {
        COLOR_ALWAYS => return true,
        COLOR_NEVER => return false,
        _ => {}
    }

    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").as_deref() == Ok("0") {
        return false;
    }
    if env::var("TERM").as_deref() == Ok("dumb") {
        return false;
    }
    if env::var_os("CLICOLOR_FORCE").is_some() {
        return true;
    }

    is_tty()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the process-wide override is never raced.
    #[test]
    fn override_wins_over_detection() {
        set_color_override(Some(true));
        assert!(supports_color());
        set_color_override(Some(false));
        assert!(!supports_color());
        set_color_override(None);
        let _ = supports_color();
    }
}
