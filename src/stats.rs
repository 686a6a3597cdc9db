//! Per-run counters of organized files and bytes, keyed by category.

use std::collections::HashMap;

/// Unit suffixes above bytes, in order.
const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];

/// Count and byte sum for a single category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    pub count: u64,
    pub bytes: u64,
}

/// Counters for one run. Only ever grows.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    total_count: u64,
    total_bytes: u64,
    by_category: HashMap<String, CategoryTotals>,
}

/// Rendered totals, ready to print or log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSummary {
    pub total_files: u64,
    pub total_size: String,
    /// `"<category>: <count> files, <size>"`, sorted by category name.
    pub breakdown: Vec<String>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one file of `size_bytes` to `category`. An empty category is ignored.
    pub fn record(&mut self, category: &str, size_bytes: u64) {
        if category.is_empty() {
            return;
        }
        self.total_count += 1;
        self.total_bytes += size_bytes;

        let totals = self.by_category.entry(category.to_string()).or_default();
        totals.count += 1;
        totals.bytes += size_bytes;
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Totals for `category`, if anything was recorded under it.
    pub fn category(&self, category: &str) -> Option<CategoryTotals> {
        self.by_category.get(category).copied()
    }

    /// Iterates over every recorded category in no particular order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, CategoryTotals)> {
        self.by_category
            .iter()
            .map(|(name, totals)| (name.as_str(), *totals))
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Renders the totals and the per-category breakdown.
    pub fn summarize(&self) -> StatsSummary {
        let mut categories: Vec<_> = self.by_category.iter().collect();
        categories.sort_by_key(|&(name, _)| name);

        StatsSummary {
            total_files: self.total_count,
            total_size: humanize_bytes(self.total_bytes),
            breakdown: categories
                .into_iter()
                .map(|(name, totals)| {
                    format!(
                        "{}: {} files, {}",
                        name,
                        totals.count,
                        humanize_bytes(totals.bytes)
                    )
                })
                .collect(),
        }
    }
}

/// Formats a byte count with base-1024 units.
///
/// Values below 1024 print as whole bytes; anything larger is divided until it
/// drops below 1024 (or runs out of units) and printed with two decimals.
///
/// # Examples
///
/// ```
/// use typesort::stats::humanize_bytes;
///
/// assert_eq!(humanize_bytes(1023), "1023 B");
/// assert_eq!(humanize_bytes(1536), "1.50 KB");
/// assert_eq!(humanize_bytes(1024 * 1024 * 1024), "1.00 GB");
/// ```
pub fn humanize_bytes(bytes: u64) -> String {
    const UNIT: f64 = 1024.0;

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut scaled = bytes as f64;
    for unit in &UNITS[..UNITS.len() - 1] {
        scaled /= UNIT;
        if scaled < UNIT {
            return format!("{:.2} {}", scaled, unit);
        }
    }
    scaled /= UNIT;
    format!("{:.2} {}", scaled, UNITS[UNITS.len() - 1])
}
