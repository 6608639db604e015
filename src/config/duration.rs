// src/config/duration.rs

use std::time::Duration;

/// Parse a duration such as `"1500ms"`, `"2s"`, `"1m30s"` or `"1h"`.
///
/// Each component is an integer followed by one of `ms`, `s`, `m`, `h`
/// (case-insensitive). Components may be chained and are summed.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim().to_ascii_lowercase();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let mut total = Duration::ZERO;
    let mut rest = s.as_str();
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(format!("expected a number at '{rest}'"));
        }
        let (num, tail) = rest.split_at(digits);
        let value: u64 = num
            .parse()
            .map_err(|e| format!("invalid duration number '{num}': {e}"))?;

        let tail = tail.trim_start();
        let unit_len = tail.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let part = match unit {
            "ms" => Some(Duration::from_millis(value)),
            "s" => Some(Duration::from_secs(value)),
            "m" => value.checked_mul(60).map(Duration::from_secs),
            "h" => value.checked_mul(3600).map(Duration::from_secs),
            "" => return Err(format!("duration '{s}' is missing a unit (ms, s, m or h)")),
            other => {
                return Err(format!(
                    "unsupported duration unit '{other}'; expected ms, s, m or h"
                ));
            }
        };

        total = part
            .and_then(|p| total.checked_add(p))
            .ok_or_else(|| format!("duration '{s}' is too large"))?;
        rest = next.trim_start();
    }

    Ok(total)
}
