//! Ayu color theme and styling functions for brewlint output.
//!
//! Uses the Ayu Dark color palette. Only outcomes get color: passing records
//! in green, violations in red, bookkeeping in muted gray.

use brewlint_core::validation::ValidationError;
use owo_colors::OwoColorize;

use crate::terminal::supports_color;

// ---------------------------------------------------------------------------
// Ayu Dark color palette (RGB values)
// ---------------------------------------------------------------------------

const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - bright green
const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - bright yellow
const FAIL: (u8, u8, u8) = (0xf0, 0x71, 0x78); // #f07178 - bright red
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - muted gray
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - bright blue

// General icons
pub const ICON_PASS: &str = "\u{2713}"; // ✓
pub const ICON_WARN: &str = "\u{26A0}"; // ⚠
pub const ICON_FAIL: &str = "\u{2716}"; // ✖

// ---------------------------------------------------------------------------
// Helper: apply truecolor only when color is supported
// ---------------------------------------------------------------------------

fn paint(s: &str, rgb: (u8, u8, u8), enabled: bool) -> String {
    if enabled {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    paint(s, rgb, supports_color())
}

// ---------------------------------------------------------------------------
// Core semantic render helpers
// ---------------------------------------------------------------------------

/// Renders text with pass (green) styling.
pub fn render_pass(s: &str) -> String {
    color_str(s, PASS)
}

/// Renders text with fail (red) styling.
pub fn render_fail(s: &str) -> String {
    color_str(s, FAIL)
}

/// Renders text with muted (gray) styling.
pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

/// Renders text with accent (blue) styling.
pub fn render_accent(s: &str) -> String {
    color_str(s, ACCENT)
}

// ---------------------------------------------------------------------------
// Icon renderers
// ---------------------------------------------------------------------------

pub fn render_pass_icon() -> String {
    color_str(ICON_PASS, PASS)
}

pub fn render_warn_icon() -> String {
    color_str(ICON_WARN, WARN)
}

pub fn render_fail_icon() -> String {
    color_str(ICON_FAIL, FAIL)
}

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

fn format_violation(err: &ValidationError, enabled: bool) -> String {
    let code = match err {
        // A conflict involves another file, so it reads as a warning.
        ValidationError::ConflictingDuplicate { .. } => paint(err.code(), WARN, enabled),
        _ => paint(err.code(), FAIL, enabled),
    };
    format!("{}: {}", code, err)
}

/// One violation as `code: message`, with the code colored by severity.
pub fn render_violation(err: &ValidationError) -> String {
    format_violation(err, supports_color())
}

/// `name version`, with the version in the accent color.
pub fn render_name_version(name: &str, version: &str) -> String {
    format!("{} {}", name, render_accent(version))
}
