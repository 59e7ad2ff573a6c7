// src/config/duration.rs

use std::time::Duration;

/// Parse a duration string like `"250ms"`, `"6s"`, `"10m"`, `"2h"`.
///
/// Compound values are accepted as a sum of parts (`"1m30s"`).
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let mut total = Duration::ZERO;
    let mut rest = s;

    while !rest.is_empty() {
        // Find the boundary between digits and suffix.
        let idx = rest
            .chars()
            .position(|c| !c.is_ascii_digit())
            .ok_or_else(|| format!("duration '{s}' is missing a unit suffix"))?;

        let (num_part, tail) = rest.split_at(idx);
        let value: u64 = num_part
            .parse()
            .map_err(|e| format!("invalid duration number '{num_part}' in '{s}': {e}"))?;

        let unit_len = tail
            .chars()
            .position(|c| c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);

        let secs_per_unit = match unit.trim().to_lowercase().as_str() {
            "ms" => None,
            "s" => Some(1),
            "m" => Some(60),
            "h" => Some(60 * 60),
            other => {
                return Err(format!(
                    "unsupported duration unit '{other}' in '{s}'; expected ms, s, m, or h"
                ));
            }
        };

        let part = match secs_per_unit {
            None => Duration::from_millis(value),
            Some(factor) => value
                .checked_mul(factor)
                .map(Duration::from_secs)
                .ok_or_else(|| format!("duration '{s}' is out of range"))?,
        };

        total = total
            .checked_add(part)
            .ok_or_else(|| format!("duration '{s}' is out of range"))?;
        rest = next;
    }

    Ok(total)
}
