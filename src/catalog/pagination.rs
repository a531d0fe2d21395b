//! # Pagination
//!
//! Page/limit slicing of an already filtered result.
//!
//! Raw values are coerced the lenient way query strings usually are: a
//! leading (optionally signed) integer is taken, anything else falls back
//! to the default. Values are not range-checked at parse time; a page or
//! limit below 1 simply selects nothing.

/// Default page when none is given
pub const DEFAULT_PAGE: i64 = 1;

/// A requested page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    pub page: i64,
    /// Records per page
    pub limit: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Coerce raw query values, using defaults where they do not parse
    pub fn from_raw(page: Option<&str>, limit: Option<&str>, default_limit: usize) -> Self {
        let default_limit = i64::try_from(default_limit).unwrap_or(i64::MAX);
        Self {
            page: page.and_then(parse_leading_int).unwrap_or(DEFAULT_PAGE),
            limit: limit.and_then(parse_leading_int).unwrap_or(default_limit),
        }
    }

    /// Index of the first record on this page, if the page selects anything
    pub fn offset(&self) -> Option<usize> {
        if self.page < 1 || self.limit < 1 {
            return None;
        }
        let offset = (self.page - 1).checked_mul(self.limit)?;
        usize::try_from(offset).ok()
    }

    /// Slice `items` to this page; out-of-range pages are empty
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let Some(offset) = self.offset() else {
            return Vec::new();
        };
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);

        items.into_iter().skip(offset).take(limit).collect()
    }
}

/// Parse the leading integer of `raw`, e.g. `"12abc"` -> 12.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Saturate absurdly long inputs instead of rejecting them.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
