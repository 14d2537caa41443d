//! Binning of features into per-cell category frequency tables.

use crate::compute::grid::Grid;
use crate::compute::tessellation::Tessellation;
use hexdiv_types::cell::CellId;
use hexdiv_types::feature::Feature;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Category label to occurrence count for one cell.
///
/// Iteration order is unspecified; use [`FrequencyTable::sorted`] when a
/// stable display order is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    counts: FxHashMap<String, u32>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `category`.
    pub fn record(&mut self, category: &str) {
        match self.counts.get_mut(category) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(category.to_string(), 1);
            }
        }
    }

    pub fn get(&self, category: &str) -> u32 {
        self.counts.get(category).copied().unwrap_or(0)
    }

    /// Number of distinct categories with a non-zero count.
    pub fn diversity(&self) -> usize {
        self.counts.values().filter(|count| **count > 0).count()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|count| *count as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries by descending count, ties broken by label.
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> = self.iter().collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Additive union: counts of shared categories are summed.
    pub fn merge(&mut self, other: FrequencyTable) {
        for (category, count) in other.counts {
            *self.counts.entry(category).or_insert(0) += count;
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for category in iter {
            table.record(category.as_ref());
        }
        table
    }
}

/// What happened to each input feature during aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationReport {
    /// Counted into some cell's table.
    pub accepted: u64,
    /// No category label, or an empty one.
    pub missing_category: u64,
    /// Non-finite or out-of-range coordinate.
    pub invalid_coordinate: u64,
    /// Located in a cell outside the generated grid.
    pub outside_coverage: u64,
}

impl AggregationReport {
    /// Total number of features seen.
    pub fn total(&self) -> u64 {
        self.accepted + self.missing_category + self.invalid_coordinate + self.outside_coverage
    }

    pub fn skipped(&self) -> u64 {
        self.total() - self.accepted
    }

    pub fn merge(&mut self, other: AggregationReport) {
        self.accepted += other.accepted;
        self.missing_category += other.missing_category;
        self.invalid_coordinate += other.invalid_coordinate;
        self.outside_coverage += other.outside_coverage;
    }
}

/// Per-cell tables plus the bookkeeping of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub tables: FxHashMap<CellId, FrequencyTable>,
    pub report: AggregationReport,
}

impl Aggregation {
    /// Additive union per `(cell, category)`. Commutative and associative,
    /// so partial aggregations can be combined in any order.
    pub fn merge(mut self, other: Aggregation) -> Aggregation {
        for (cell, table) in other.tables {
            self.tables.entry(cell).or_default().merge(table);
        }
        self.report.merge(other.report);
        self
    }

    /// Sum of every count in every table.
    pub fn total_count(&self) -> u64 {
        self.tables.values().map(FrequencyTable::total).sum()
    }
}

enum Assignment<'f> {
    Accepted(CellId, &'f str),
    MissingCategory,
    InvalidCoordinate,
    OutsideCoverage,
}

/// Folds features into the frequency tables of one grid.
pub struct Aggregator<'a, T: ?Sized> {
    tessellation: &'a T,
    grid: &'a Grid,
}

impl<'a, T: Tessellation + ?Sized> Aggregator<'a, T> {
    pub fn new(tessellation: &'a T, grid: &'a Grid) -> Self {
        Self { tessellation, grid }
    }

    /// Aggregate `features` sequentially.
    ///
    /// Every grid cell gets a table, empty or not. Features without a
    /// category, with a bad coordinate, or outside the grid are counted in
    /// the report and otherwise ignored.
    pub fn aggregate(&self, features: &[Feature]) -> Aggregation {
        let partial = self.bin(features.iter());
        self.seeded().merge(partial)
    }

    /// Aggregate `features` on the rayon thread pool.
    ///
    /// Produces exactly the result of [`Aggregator::aggregate`].
    #[cfg(feature = "parallel")]
    pub fn aggregate_parallel(&self, features: &[Feature]) -> Aggregation {
        use rayon::prelude::*;

        const CHUNK: usize = 4096;
        let partial = features
            .par_chunks(CHUNK)
            .map(|chunk| self.bin(chunk.iter()))
            .reduce(Aggregation::default, Aggregation::merge);
        self.seeded().merge(partial)
    }

    /// One empty table per grid cell.
    fn seeded(&self) -> Aggregation {
        Aggregation {
            tables: self
                .grid
                .iter()
                .map(|cell| (*cell, FrequencyTable::new()))
                .collect(),
            report: AggregationReport::default(),
        }
    }

    fn bin<'f>(&self, features: impl Iterator<Item = &'f Feature>) -> Aggregation {
        let mut out = Aggregation::default();
        for feature in features {
            match self.assign(feature) {
                Assignment::Accepted(cell, category) => {
                    out.tables.entry(cell).or_default().record(category);
                    out.report.accepted += 1;
                }
                Assignment::MissingCategory => out.report.missing_category += 1,
                Assignment::InvalidCoordinate => out.report.invalid_coordinate += 1,
                Assignment::OutsideCoverage => out.report.outside_coverage += 1,
            }
        }
        out
    }

    fn assign<'f>(&self, feature: &'f Feature) -> Assignment<'f> {
        let Some(category) = feature.label() else {
            return Assignment::MissingCategory;
        };

        let cell = match self
            .tessellation
            .locate(&feature.coordinate(), self.grid.resolution())
        {
            Ok(cell) => cell,
            Err(e) => {
                log::trace!("Skipping feature: {}", e);
                return Assignment::InvalidCoordinate;
            }
        };

        if self.grid.contains(&cell) {
            Assignment::Accepted(cell, category)
        } else {
            Assignment::OutsideCoverage
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::grid;
    use crate::compute::tessellation::HexGrid;
    use crate::config::SamplingConfig;
    use hexdiv_types::cell::Resolution;
    use hexdiv_types::region::Region;

    fn grid_for(region: &Region, level: u8) -> Grid {
        grid::generate(
            &HexGrid,
            region,
            Resolution::new(level),
            &SamplingConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_frequency_table_counts() {
        let table: FrequencyTable = ["cafe", "bank", "cafe"].into_iter().collect();
        assert_eq!(table.get("cafe"), 2);
        assert_eq!(table.get("bank"), 1);
        assert_eq!(table.get("school"), 0);
        assert_eq!(table.diversity(), 2);
        assert_eq!(table.total(), 3);
        assert_eq!(table.sorted(), vec![("cafe", 2), ("bank", 1)]);
    }

    #[test]
    fn test_sorted_breaks_ties_by_label() {
        let table: FrequencyTable = ["pub", "bar", "cafe"].into_iter().collect();
        assert_eq!(table.sorted(), vec![("bar", 1), ("cafe", 1), ("pub", 1)]);
    }

    #[test]
    fn test_merge_is_additive() {
        let mut a: FrequencyTable = ["cafe", "bank"].into_iter().collect();
        let b: FrequencyTable = ["cafe", "school"].into_iter().collect();
        a.merge(b);
        assert_eq!(a.get("cafe"), 2);
        assert_eq!(a.get("bank"), 1);
        assert_eq!(a.get("school"), 1);
    }

    #[test]
    fn test_every_cell_present_without_features() {
        let region = Region::new(0.0, 0.0, 0.01, 0.01);
        let grid = grid_for(&region, 9);
        let aggregation = Aggregator::new(&HexGrid, &grid).aggregate(&[]);

        assert_eq!(aggregation.tables.len(), grid.len());
        assert!(aggregation.tables.values().all(FrequencyTable::is_empty));
        assert_eq!(aggregation.report, AggregationReport::default());
    }

    #[test]
    fn test_skips_are_reported() {
        let region = Region::new(0.0, 0.0, 0.01, 0.01);
        let grid = grid_for(&region, 9);
        let features = vec![
            Feature::new(0.005, 0.005, "cafe"),
            Feature::uncategorized(0.005, 0.005),
            Feature::new(0.005, 0.005, ""),
            Feature::new(f64::NAN, 0.005, "cafe"),
            Feature::new(95.0, 0.005, "cafe"),
            Feature::new(45.0, 45.0, "cafe"),
        ];

        let aggregation = Aggregator::new(&HexGrid, &grid).aggregate(&features);
        assert_eq!(
            aggregation.report,
            AggregationReport {
                accepted: 1,
                missing_category: 2,
                invalid_coordinate: 2,
                outside_coverage: 1,
            }
        );
        assert_eq!(aggregation.total_count(), 1);
        assert_eq!(aggregation.tables.len(), grid.len());
    }

    #[test]
    fn test_partition_merge_matches_sequential() {
        let region = Region::new(37.70, -122.52, 37.81, -122.35);
        let grid = grid_for(&region, 8);
        let categories = ["cafe", "bank", "school", "pharmacy", "bar"];
        let features: Vec<Feature> = (0..500)
            .map(|i| {
                let lat = 37.70 + (i % 25) as f64 * 0.0044;
                let lon = -122.52 + (i / 25) as f64 * 0.0085;
                Feature::new(lat, lon, categories[i % categories.len()])
            })
            .collect();

        let aggregator = Aggregator::new(&HexGrid, &grid);
        let sequential = aggregator.aggregate(&features);

        for split in [1, 7, 250, 499] {
            let (left, right) = features.split_at(split);
            let merged = aggregator
                .aggregate(right)
                .merge(aggregator.aggregate(left));
            assert_eq!(merged.tables, sequential.tables);
            assert_eq!(merged.report.accepted, sequential.report.accepted);
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let region = Region::new(40.70, -74.02, 40.80, -73.93);
        let grid = grid_for(&region, 8);
        let features: Vec<Feature> = (0..20_000)
            .map(|i| {
                let lat = 40.69 + (i % 137) as f64 * 0.0009;
                let lon = -74.03 + (i % 211) as f64 * 0.0005;
                Feature::new(lat, lon, format!("kind{}", i % 13))
            })
            .collect();

        let aggregator = Aggregator::new(&HexGrid, &grid);
        assert_eq!(
            aggregator.aggregate_parallel(&features),
            aggregator.aggregate(&features)
        );
    }
}
