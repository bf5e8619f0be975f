//! Cumulative win totals, one `name:count` line per player.

use std::collections::BTreeMap;

use crate::error::PersistenceError;

pub type WinTotals = BTreeMap<String, u32>;

/// Parse a totals file. Blank lines are skipped; anything else malformed
/// fails the whole read so a later rewrite cannot drop entries.
pub fn parse_totals(text: &str) -> Result<WinTotals, PersistenceError> {
    let mut totals = WinTotals::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let corrupt = |reason: String| PersistenceError::CorruptScores {
            line: i + 1,
            reason,
        };

        let (name, count) = line
            .split_once(':')
            .ok_or_else(|| corrupt(format!("missing ':' in {line:?}")))?;
        let count = count
            .trim()
            .parse::<u32>()
            .map_err(|_| corrupt(format!("bad count {count:?}")))?;
        totals.insert(name.trim().to_string(), count);
    }
    Ok(totals)
}

pub fn render_totals(totals: &WinTotals) -> String {
    totals
        .iter()
        .map(|(name, count)| format!("{name}:{count}\n"))
        .collect()
}
