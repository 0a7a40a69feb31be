//! Timeout value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::error::TimeoutParseError;

/// Default dispatch timeout (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A positive, human-writable timeout such as `500ms`, `10s` or `1m30s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timeout {
    millis: u64,
}

impl Timeout {
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self {
            millis: secs * 1000,
        }
    }

    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> Duration {
        Duration::from_millis(self.millis)
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::from_secs(DEFAULT_TIMEOUT_SECS)
    }
}

impl FromStr for Timeout {
    type Err = TimeoutParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TimeoutParseError {
            input: s.to_string(),
        };
        let input = s.trim().to_ascii_lowercase();
        let mut rest = input.as_str();
        let mut total: u64 = 0;
        let mut found_any = false;

        while !rest.is_empty() {
            let digits_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .ok_or_else(err)?;
            if digits_end == 0 {
                return Err(err());
            }
            let value: u64 = rest[..digits_end].parse().map_err(|_| err())?;
            rest = &rest[digits_end..];

            // "ms" must be checked before "m"
            let (factor, unit_len) = if rest.starts_with("ms") {
                (1, 2)
            } else if rest.starts_with('m') {
                (60_000, 1)
            } else if rest.starts_with('s') {
                (1000, 1)
            } else {
                return Err(err());
            };
            rest = &rest[unit_len..];

            total = value
                .checked_mul(factor)
                .and_then(|ms| total.checked_add(ms))
                .ok_or_else(err)?;
            found_any = true;
        }

        if !found_any || total == 0 {
            return Err(err());
        }

        Ok(Self { millis: total })
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.millis % 1000 != 0 {
            return write!(f, "{}ms", self.millis);
        }
        let secs = self.millis / 1000;
        match (secs / 60, secs % 60) {
            (0, s) => write!(f, "{}s", s),
            (m, 0) => write!(f, "{}m", m),
            (m, s) => write!(f, "{}m{}s", m, s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_units() {
        assert_eq!("500ms".parse::<Timeout>().unwrap().as_millis(), 500);
        assert_eq!("10s".parse::<Timeout>().unwrap().as_millis(), 10_000);
        assert_eq!("2m".parse::<Timeout>().unwrap().as_millis(), 120_000);
        assert_eq!("1m30s".parse::<Timeout>().unwrap().as_millis(), 90_000);
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(" 5S ".parse::<Timeout>().unwrap().as_millis(), 5000);
        assert_eq!("250MS".parse::<Timeout>().unwrap().as_millis(), 250);
    }

    #[test]
    fn parse_rejects_invalid() {
        for input in ["", "10", "s", "0s", "0ms", "10h", "abc", "1.5s", "-3s"] {
            assert!(input.parse::<Timeout>().is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn display_picks_compact_form() {
        assert_eq!(Timeout::from_millis(750).to_string(), "750ms");
        assert_eq!(Timeout::from_secs(10).to_string(), "10s");
        assert_eq!(Timeout::from_secs(120).to_string(), "2m");
        assert_eq!(Timeout::from_secs(90).to_string(), "1m30s");
    }

    #[test]
    fn default_is_ten_seconds() {
        assert_eq!(Timeout::default().as_std(), Duration::from_secs(10));
    }
}
