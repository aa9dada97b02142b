//! ANSI coloring for console output
//!
//! Coloring is presentation only: captured tool output is always kept
//! uncolored so keyword counting sees the original text.

use crate::config::Keywords;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Color::Red => RED,
            Color::Green => GREEN,
            Color::Yellow => YELLOW,
        }
    }
}

/// Wrap `text` in the color's escape codes when `enabled`.
pub fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("{}{}{}", color.code(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Color every pass keyword green and every fail keyword red.
///
/// Single left-to-right scan, so a keyword is never wrapped twice even when one
/// keyword contains the other.
pub fn highlight_keywords(line: &str, keywords: &Keywords, enabled: bool) -> String {
    let pass = Some(keywords.pass.as_str()).filter(|k| !k.is_empty());
    let fail = Some(keywords.fail.as_str()).filter(|k| !k.is_empty());
    if !enabled || (pass.is_none() && fail.is_none()) {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + 16);
    let mut rest = line;
    loop {
        let pass_hit = pass.and_then(|k| rest.find(k).map(|i| (i, k, Color::Green)));
        let fail_hit = fail.and_then(|k| rest.find(k).map(|i| (i, k, Color::Red)));
        let hit = match (pass_hit, fail_hit) {
            (Some(p), Some(f)) => {
                // Earliest match wins; on a tie the longer keyword wins
                if p.0 < f.0 || (p.0 == f.0 && p.1.len() >= f.1.len()) {
                    Some(p)
                } else {
                    Some(f)
                }
            }
            (p, f) => p.or(f),
        };
        let Some((idx, keyword, color)) = hit else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..idx]);
        out.push_str(&paint(keyword, color, true));
        rest = &rest[idx + keyword.len()..];
    }
}
