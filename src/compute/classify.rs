//! Diversity scoring and threshold classification.

use crate::compute::aggregate::FrequencyTable;
use serde::{Deserialize, Serialize};

/// Diversity score and highlight flag of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Distinct categories with a non-zero count.
    pub diversity: usize,
    /// `diversity >= threshold`.
    pub highlighted: bool,
}

/// Highlights cells whose diversity reaches a threshold.
///
/// Total over all inputs; threshold range checks happen at configuration
/// time.
///
/// # Examples
///
/// ```
/// use hexdiv::compute::aggregate::FrequencyTable;
/// use hexdiv::compute::classify::Classifier;
///
/// let table: FrequencyTable = ["cafe", "bank", "cafe"].into_iter().collect();
/// let class = Classifier::new(2).classify(&table);
/// assert_eq!(class.diversity, 2);
/// assert!(class.highlighted);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    threshold: u32,
}

impl Classifier {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn classify(&self, table: &FrequencyTable) -> Classification {
        let diversity = table.diversity();
        Classification {
            diversity,
            highlighted: diversity as u64 >= self.threshold as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_never_highlighted() {
        let table = FrequencyTable::new();
        for n in 1..=50 {
            let class = Classifier::new(n).classify(&table);
            assert_eq!(class.diversity, 0);
            assert!(!class.highlighted);
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let table: FrequencyTable = ["a", "b", "c"].into_iter().collect();
        assert!(Classifier::new(3).classify(&table).highlighted);
        assert!(!Classifier::new(4).classify(&table).highlighted);
    }

    #[test]
    fn test_repeat_counts_do_not_raise_diversity() {
        let table: FrequencyTable = ["cafe"; 10].into_iter().collect();
        let class = Classifier::new(2).classify(&table);
        assert_eq!(class.diversity, 1);
        assert!(!class.highlighted);
    }

    #[test]
    fn test_zero_threshold_highlights_everything() {
        let class = Classifier::new(0).classify(&FrequencyTable::new());
        assert!(class.highlighted);
    }
}
