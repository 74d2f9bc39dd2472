use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;

fn bad(what: &str) -> AppError {
    AppError::InvalidDate(what.to_string())
}

/// First and last day covered by one `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
/// token.
fn span(token: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let parts: Vec<&str> = token.split('-').collect();
    let year: i32 = parts[0]
        .parse()
        .ok()
        .filter(|_| parts[0].len() == 4)
        .ok_or_else(|| bad(token))?;

    match parts.as_slice() {
        [_] => {
            let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| bad(token))?;
            let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(|| bad(token))?;
            Ok((first, last))
        }
        [_, m] if m.len() == 2 => {
            let month: u32 = m.parse().map_err(|_| bad(token))?;
            let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| bad(token))?;
            let next = if month == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)
            };
            let last = next.and_then(|d| d.pred_opt()).ok_or_else(|| bad(token))?;
            Ok((first, last))
        }
        [_, _, _] if token.len() == 10 => {
            let day = NaiveDate::parse_from_str(token, "%Y-%m-%d").map_err(|_| bad(token))?;
            Ok((day, day))
        }
        _ => Err(bad(token)),
    }
}

/// Parse `--range`/`--period` into inclusive (from, to) dates.
///
/// A single token is `YYYY`, `YYYY-MM` or `YYYY-MM-DD`; `A:B` spans from
/// the start of `A` to the end of `B`, both written in the same shape.
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let r = r.trim();
    match r.split_once(':') {
        None => span(r),
        Some((a, b)) => {
            let (a, b) = (a.trim(), b.trim());
            if a.len() != b.len() {
                return Err(bad("range bounds must use the same format"));
            }
            let (from, _) = span(a)?;
            let (_, to) = span(b)?;
            if from > to {
                return Err(bad(r));
            }
            Ok((from, to))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn single_period_shapes() {
        assert_eq!(parse_range("2024").unwrap(), (d("2024-01-01"), d("2024-12-31")));
        assert_eq!(parse_range("2024-02").unwrap(), (d("2024-02-01"), d("2024-02-29")));
        assert_eq!(parse_range("2024-12").unwrap(), (d("2024-12-01"), d("2024-12-31")));
        assert_eq!(parse_range("2025-03-10").unwrap(), (d("2025-03-10"), d("2025-03-10")));
    }

    #[test]
    fn intervals_need_matching_shapes() {
        assert_eq!(
            parse_range("2025-01:2025-03").unwrap(),
            (d("2025-01-01"), d("2025-03-31"))
        );
        assert!(parse_range("2025:2025-03").is_err());
        assert!(parse_range("2025-03:2025-01").is_err());
        assert!(parse_range("spring").is_err());
        assert!(parse_range("2025-13").is_err());
    }
}
