//! Problem and run parameters.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{SearchError, SearchResult};

/// Widest running total the adder supports.
pub const MAX_DIGITS: u32 = 32;

/// Widest counting register accepted. The counter applies the controlled
/// Grover iterate `2^m − 1` times.
pub const MAX_COUNTER_DIGITS: u32 = 16;

/// A validated subset-sum instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetSumProblem {
    numbers: Vec<u64>,
    expected_sum: u64,
    digits: u32,
}

impl SubsetSumProblem {
    /// Create a problem whose running total is `digits` bits wide.
    ///
    /// Totals wrap modulo `2^digits`. A width too small for
    /// `sum(numbers)` is accepted with a warning: wraparound can then
    /// produce false matches.
    pub fn new(numbers: Vec<u64>, expected_sum: u64, digits: u32) -> SearchResult<Self> {
        if numbers.is_empty() {
            return Err(SearchError::InvalidParameters(
                "numbers must not be empty".into(),
            ));
        }
        register_width(numbers.len())?;
        check_digits(digits)?;
        if expected_sum >> digits != 0 {
            return Err(SearchError::InvalidParameters(format!(
                "expected sum {expected_sum} does not fit in {digits} bits"
            )));
        }

        let problem = Self {
            numbers,
            expected_sum,
            digits,
        };
        let total = problem.total();
        if total >> digits != 0 {
            warn!(
                total,
                digits, "sum of numbers does not fit the running total; results may wrap"
            );
        }
        Ok(problem)
    }

    /// Create a problem with the narrowest width that cannot wrap.
    pub fn with_auto_digits(numbers: Vec<u64>, expected_sum: u64) -> SearchResult<Self> {
        let total: u128 = numbers.iter().map(|&n| u128::from(n)).sum();
        let widest = total.max(u128::from(expected_sum));
        let digits = (128 - widest.leading_zeros()).max(1);
        Self::new(numbers, expected_sum, digits)
    }

    /// The candidate numbers.
    pub fn numbers(&self) -> &[u64] {
        &self.numbers
    }

    /// Number of candidates, the width of the `x` register.
    pub fn len(&self) -> u32 {
        self.numbers.len() as u32
    }

    /// Always false: validation rejects empty problems.
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// The target value.
    pub fn expected_sum(&self) -> u64 {
        self.expected_sum
    }

    /// Width of the running total.
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Sum of all numbers, saturating.
    pub fn total(&self) -> u64 {
        self.numbers
            .iter()
            .fold(0u64, |acc, &n| acc.saturating_add(n))
    }

    /// Sum of the numbers selected by `mask` (bit `i` ↔ `numbers[i]`),
    /// modulo `2^digits` as the adder computes it.
    pub fn subset_sum(&self, mask: u64) -> u64 {
        let sum = self
            .numbers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i < 64 && mask >> i & 1 == 1)
            .fold(0u64, |acc, (_, &n)| acc.wrapping_add(n));
        if self.digits >= 64 {
            sum
        } else {
            sum & ((1u64 << self.digits) - 1)
        }
    }

    /// Whether `mask` selects a subset the oracle marks.
    pub fn is_solution(&self, mask: u64) -> bool {
        self.subset_sum(mask) == self.expected_sum
    }

    /// Every marked mask, by classical enumeration. Intended for small
    /// instances and for checking results.
    pub fn solutions(&self) -> Vec<u64> {
        (0..1u64 << self.len().min(63))
            .filter(|&mask| self.is_solution(mask))
            .collect()
    }
}

/// Everything a search run needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// The instance to solve.
    pub problem: SubsetSumProblem,
    /// Width of the counting register.
    pub digits_counter: u32,
    /// Shots for the amplified search.
    pub shots: u32,
    /// Shots for the counting stage.
    pub shots_counter: u32,
}

impl SearchParams {
    /// Create and validate run parameters.
    pub fn new(
        problem: SubsetSumProblem,
        digits_counter: u32,
        shots: u32,
        shots_counter: u32,
    ) -> SearchResult<Self> {
        let params = Self {
            problem,
            digits_counter,
            shots,
            shots_counter,
        };
        params.validate()?;
        Ok(params)
    }

    /// Run parameters with the counting width `ceil(len / 2) + 1`, roughly
    /// the square root of the search space plus one qubit of precision.
    pub fn with_default_counter(
        problem: SubsetSumProblem,
        shots: u32,
        shots_counter: u32,
    ) -> SearchResult<Self> {
        let digits_counter = default_counter_digits(problem.len());
        Self::new(problem, digits_counter, shots, shots_counter)
    }

    /// Check ranges. Called by the constructors and again by the search.
    pub fn validate(&self) -> SearchResult<()> {
        check_counter_digits(self.digits_counter)?;
        if self.shots == 0 || self.shots_counter == 0 {
            return Err(SearchError::InvalidParameters(
                "shot counts must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Reject a running-total width outside `1..=MAX_DIGITS`.
pub(crate) fn check_digits(digits: u32) -> SearchResult<()> {
    if !(1..=MAX_DIGITS).contains(&digits) {
        return Err(SearchError::InvalidParameters(format!(
            "digits must be in 1..={MAX_DIGITS}, got {digits}"
        )));
    }
    Ok(())
}

/// Reject a counting register width outside `1..=MAX_COUNTER_DIGITS`.
pub(crate) fn check_counter_digits(digits_counter: u32) -> SearchResult<()> {
    if !(1..=MAX_COUNTER_DIGITS).contains(&digits_counter) {
        return Err(SearchError::InvalidParameters(format!(
            "digits_counter must be in 1..={MAX_COUNTER_DIGITS}, got {digits_counter}"
        )));
    }
    Ok(())
}

/// One qubit per number, as a register width.
pub(crate) fn register_width(len: usize) -> SearchResult<u32> {
    u32::try_from(len).map_err(|_| {
        SearchError::InvalidParameters(format!("{len} numbers do not fit a register"))
    })
}

/// `ceil(len / 2) + 1`.
pub fn default_counter_digits(len_numbers: u32) -> u32 {
    len_numbers.div_ceil(2) + 1
}
