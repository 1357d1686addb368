// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use std::io::IsTerminal;

pub mod codes {
    /// Section headers and frames: steel blue
    pub const HEADER: u8 = 74;
    /// Paths and ids: light grey
    pub const LITERAL: u8 = 250;
    /// Placeholders in help: medium grey
    pub const CONTEXT: u8 = 245;
    /// Secondary text: darker grey
    pub const MUTED: u8 = 240;
    /// Repository warnings: amber
    pub const WARN: u8 = 178;
}

/// Whether text written to `stream` gets color.
///
/// `NO_COLOR=1` disables, `COLOR=1` forces, otherwise only terminals do.
pub fn enabled_for(stream: &impl IsTerminal) -> bool {
    match (std::env::var("NO_COLOR").as_deref(), std::env::var("COLOR").as_deref()) {
        (Ok("1"), _) => false,
        (_, Ok("1")) => true,
        _ => stream.is_terminal(),
    }
}

/// Color setting for stdout, where the launch report goes.
pub fn should_colorize() -> bool {
    enabled_for(&std::io::stdout())
}

fn fg(code: u8) -> Style {
    Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))))
}

/// Help palette for clap.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(fg(codes::HEADER))
        .literal(fg(codes::LITERAL))
        .placeholder(fg(codes::CONTEXT))
}

const RESET: &str = "\x1b[0m";

fn paint(enabled: bool, code: u8, text: &str) -> String {
    if enabled {
        format!("\x1b[38;5;{code}m{text}{RESET}")
    } else {
        text.to_string()
    }
}

pub fn header(text: &str) -> String {
    paint(should_colorize(), codes::HEADER, text)
}

pub fn literal(text: &str) -> String {
    paint(should_colorize(), codes::LITERAL, text)
}

pub fn muted(text: &str) -> String {
    paint(should_colorize(), codes::MUTED, text)
}

/// Warnings are printed on stderr, so they follow its terminal state.
pub fn warn(text: &str) -> String {
    paint(enabled_for(&std::io::stderr()), codes::WARN, text)
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
