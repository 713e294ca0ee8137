// src/miner/parser.rs
//! Miner log-line parsing
//!
//! Translates one line of cpuminer output into at most one status delta.
//! The parser is stateless; the supervisor folds deltas into its session.

/// A single status change extracted from one line of miner output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusDelta {
    /// The pool accepted a share; the share counter increments by one
    ShareAccepted,
    /// A fresh hashrate estimate in MH/s, replacing the previous one
    Hashrate(f64),
}

/// Parses one line of miner output
///
/// Rules, in precedence order:
/// 1. A line containing "accepted" (case-insensitive) is a share.
/// 2. A line containing "mh/s" is scanned for the hashrate figure: the
///    numeric prefix of the token carrying "mh/s", or the preceding token
///    when the unit stands alone ("5.23 MH/s").
///
/// Anything else, including a malformed hashrate figure, yields `None`.
pub fn parse_line(line: &str) -> Option<StatusDelta> {
    let lower = line.to_lowercase();

    if lower.contains("accepted") {
        return Some(StatusDelta::ShareAccepted);
    }

    if lower.contains("mh/s") {
        return parse_hashrate(&lower).map(StatusDelta::Hashrate);
    }

    None
}

/// Extracts the MH/s figure from a lowercased line, if any token carries one
fn parse_hashrate(lower: &str) -> Option<f64> {
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    for (i, token) in tokens.iter().enumerate() {
        if !token.contains("mh/s") {
            continue;
        }
        let prefix = token.split("mh").next().unwrap_or("");
        let candidate = if prefix.is_empty() {
            // Unit stands alone; the figure is the previous token.
            match i.checked_sub(1).and_then(|p| tokens.get(p)) {
                Some(prev) => *prev,
                None => continue,
            }
        } else {
            prefix
        };
        if let Ok(value) = candidate.parse::<f64>() {
            return Some(value);
        }
    }
    None
}
