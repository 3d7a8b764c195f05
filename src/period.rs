// src/period.rs
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::error::ExtractError;

/// Month abbreviations used in report filenames, in calendar order.
/// These are the publisher's own codes, not ISO ones.
static MONTH_CODES: [&str; 12] = [
    "en", "fe", "ma", "ab", "my", "jn", "jl", "ag", "se", "oc", "no", "di",
];

pub const DEFAULT_PREFIX: &str = "SF";

/// Calendar month covered by one report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
    /// Last calendar day of the month.
    pub date: NaiveDate,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        let date = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))?;
        Some(Self { year, month, date })
    }

    /// Two-letter filename code for this month (`fe` for February).
    pub fn code(&self) -> &'static str {
        MONTH_CODES[(self.month - 1) as usize]
    }

    /// Filename the publisher uses for this period, e.g. `SF-ma2024.xls`.
    pub fn file_name(&self, prefix: &str, ext: &str) -> String {
        format!("{}-{}{:04}.{}", prefix, self.code(), self.year, ext)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Derives a [`Period`] from `<PREFIX>-<mm><yyyy>.xls[x]` filenames.
#[derive(Debug, Clone)]
pub struct PeriodResolver {
    pattern: Regex,
}

impl PeriodResolver {
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"(?i)^{}-([a-z]{{2}})(\d{{4}})\.xlsx?$",
            regex::escape(prefix)
        ))?;
        Ok(Self { pattern })
    }

    /// Resolve a bare filename (no directory part).
    pub fn resolve(&self, file_name: &str) -> Result<Period, ExtractError> {
        let unrecognized = || ExtractError::UnrecognizedFilename(file_name.to_string());

        let caps = self.pattern.captures(file_name).ok_or_else(unrecognized)?;
        let code = caps[1].to_ascii_lowercase();
        let month = MONTH_CODES
            .iter()
            .position(|c| *c == code)
            .ok_or_else(unrecognized)? as u32
            + 1;
        let year: i32 = caps[2].parse().map_err(|_| unrecognized())?;

        Period::new(year, month).ok_or_else(unrecognized)
    }
}

impl Default for PeriodResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX).expect("default filename pattern is valid")
    }
}
