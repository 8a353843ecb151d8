//! Measurement results.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Character layout of an outcome key.
///
/// Backends report outcomes with [`BitOrder::LsbRight`]: classical bit 0 is
/// the rightmost character, so the key reads as a binary numeral of the
/// measured register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitOrder {
    /// Bit 0 is the rightmost character.
    LsbRight,
    /// Bit 0 is the leftmost character.
    LsbLeft,
}

impl BitOrder {
    /// The convention every backend uses for [`Counts`] keys.
    pub const BACKEND: BitOrder = BitOrder::LsbRight;

    /// Render the low `width` bits of `value` as a key.
    pub fn key(self, value: u64, width: usize) -> String {
        let mut bits: Vec<char> = (0..width)
            .map(|i| if i < 64 && (value >> i) & 1 == 1 { '1' } else { '0' })
            .collect();
        if self == BitOrder::LsbRight {
            bits.reverse();
        }
        bits.into_iter().collect()
    }

    /// Parse a key back into its integer value.
    ///
    /// Returns `None` for keys with characters other than `0`/`1` or
    /// wider than 64 bits.
    pub fn value(self, key: &str) -> Option<u64> {
        if key.len() > 64 || !key.bytes().all(|b| b == b'0' || b == b'1') {
            return None;
        }
        if key.is_empty() {
            return Some(0);
        }
        match self {
            BitOrder::LsbRight => u64::from_str_radix(key, 2).ok(),
            BitOrder::LsbLeft => {
                let reversed: String = key.chars().rev().collect();
                u64::from_str_radix(&reversed, 2).ok()
            }
        }
    }

    /// Convert a key written in this order into `other`.
    pub fn convert(self, key: &str, other: BitOrder) -> String {
        if self == other {
            key.to_string()
        } else {
            key.chars().rev().collect()
        }
    }
}

/// Histogram of measurement outcomes: bit-string → count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Observations of `bitstring`, zero when absent.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of observations.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Outcomes sorted by count descending, then key ascending.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// The most frequent outcome. Ties resolve to the smallest key.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.sorted().into_iter().next()
    }

    /// Rewrite every key with `f`, merging counts of keys that collide.
    #[must_use]
    pub fn map_keys<F>(&self, mut f: F) -> Counts
    where
        F: FnMut(&str) -> String,
    {
        let mut out = Counts::new();
        for (key, count) in self.iter() {
            out.insert(f(key), count);
        }
        out
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (key, count) in iter {
            counts.insert(key, count);
        }
        counts
    }
}

/// Result of a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Measured outcomes.
    pub counts: Counts,
    /// Number of shots executed.
    pub shots: u32,
    /// Execution time in milliseconds, if measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a new result.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            shots,
            execution_time_ms: None,
        }
    }

    /// Attach the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}
