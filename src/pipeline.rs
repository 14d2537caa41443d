//! End-to-end aggregation runs and their results.
//!
//! A run is stateless: generate the grid, bin the features, classify every
//! cell, and emit one [`CellRecord`] per cell. Nothing is carried over
//! between runs.

use crate::builder::PipelineBuilder;
use crate::compute::aggregate::{AggregationReport, Aggregator, FrequencyTable};
use crate::compute::classify::Classifier;
use crate::compute::grid::Grid;
use crate::compute::tessellation::{HexGrid, Tessellation};
use crate::compute::validation::{validate_region, validate_threshold};
use crate::config::Config;
use crate::error::{HexDivError, Result};
use crate::provider::{FeatureProvider, fetch_or_empty};
use geo::Polygon;
use hexdiv_types::cell::{CellId, Resolution};
use hexdiv_types::feature::Feature;
use hexdiv_types::region::Region;
use serde::Serialize;

/// Non-fatal conditions surfaced alongside a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Features could not be fetched; the run used an empty feature list.
    ProviderUnavailable { message: String },
    /// The cell has no boundary; it is still aggregated and classified.
    RenderingSkipped { cell: CellId, reason: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProviderUnavailable { message } => {
                write!(f, "Feature provider unavailable: {}", message)
            }
            Self::RenderingSkipped { cell, reason } => {
                write!(f, "Boundary of cell {} skipped: {}", cell, reason)
            }
        }
    }
}

/// Everything the presentation layer needs about one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellRecord {
    pub cell: CellId,
    /// `None` when the boundary could not be computed.
    pub boundary: Option<Polygon<f64>>,
    pub counts: FrequencyTable,
    pub diversity: usize,
    pub highlighted: bool,
}

impl CellRecord {
    /// Category counts in display order.
    pub fn sorted_counts(&self) -> Vec<(&str, u32)> {
        self.counts.sorted()
    }
}

/// One record per generated cell, sorted by cell identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub region: Region,
    pub resolution: Resolution,
    pub threshold: u32,
    pub records: Vec<CellRecord>,
    pub report: AggregationReport,
    pub diagnostics: Vec<Diagnostic>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, cell: CellId) -> Option<&CellRecord> {
        self.records
            .binary_search_by_key(&cell, |record| record.cell)
            .ok()
            .map(|idx| &self.records[idx])
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &CellRecord> {
        self.records.iter().filter(|record| record.highlighted)
    }

    pub fn highlighted_count(&self) -> usize {
        self.highlighted().count()
    }

    /// Sum of all counts over all cells.
    pub fn total_count(&self) -> u64 {
        self.records.iter().map(|record| record.counts.total()).sum()
    }

    /// Re-derive diversity and highlight flags for a new threshold.
    pub fn reclassify(&self, classifier: Classifier) -> ResultSet {
        let records = self
            .records
            .iter()
            .map(|record| {
                let class = classifier.classify(&record.counts);
                CellRecord {
                    diversity: class.diversity,
                    highlighted: class.highlighted,
                    ..record.clone()
                }
            })
            .collect();

        ResultSet {
            region: self.region,
            resolution: self.resolution,
            threshold: classifier.threshold(),
            records,
            report: self.report,
            diagnostics: self.diagnostics.clone(),
        }
    }
}

/// Grid generation, aggregation and classification over one tessellation.
///
/// # Examples
///
/// ```
/// use hexdiv::{Feature, Pipeline, Region};
///
/// let pipeline = Pipeline::builder().resolution(9).threshold(2).build()?;
/// let region = Region::new(0.0, 0.0, 0.01, 0.01);
/// let features = vec![
///     Feature::new(0.005, 0.005, "cafe"),
///     Feature::new(0.005, 0.0051, "bank"),
/// ];
///
/// let result = pipeline.run(&region, &features)?;
/// assert_eq!(result.total_count(), 2);
/// # Ok::<(), hexdiv::HexDivError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline<T = HexGrid> {
    tessellation: T,
    config: Config,
}

impl Pipeline<HexGrid> {
    /// Builder for a pipeline over the H3 hexagonal grid.
    pub fn builder() -> PipelineBuilder<HexGrid> {
        PipelineBuilder::new(HexGrid)
    }
}

impl<T: Tessellation> Pipeline<T> {
    /// Create a pipeline, rejecting invalid configuration up front.
    pub fn new(tessellation: T, config: Config) -> Result<Self> {
        config.validate()?;
        tessellation.validate_resolution(config.resolution())?;
        Ok(Self {
            tessellation,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tessellation(&self) -> &T {
        &self.tessellation
    }

    /// The cells covering `region` at the configured resolution.
    pub fn generate_grid(&self, region: &Region) -> Result<Grid> {
        self.tessellation
            .generate_cells(region, self.config.resolution(), &self.config.sampling)
    }

    /// Run the whole pipeline over an already fetched feature list.
    pub fn run(&self, region: &Region, features: &[Feature]) -> Result<ResultSet> {
        self.run_with_diagnostics(region, features, Vec::new())
    }

    /// Fetch features from `provider` and run the pipeline.
    ///
    /// Provider failures never abort the run: the pipeline continues with no
    /// features and reports a [`Diagnostic::ProviderUnavailable`].
    pub fn run_with_provider<P: FeatureProvider + ?Sized>(
        &self,
        region: &Region,
        provider: &P,
    ) -> Result<ResultSet> {
        validate_region(region)?;
        let outcome = fetch_or_empty(provider, region);
        let diagnostics = outcome.diagnostic.into_iter().collect();
        self.run_with_diagnostics(region, &outcome.features, diagnostics)
    }

    /// Classify an existing result with a different threshold.
    pub fn reclassify(&self, result: &ResultSet, threshold: u32) -> Result<ResultSet> {
        validate_threshold(threshold)?;
        Ok(result.reclassify(Classifier::new(threshold)))
    }

    fn run_with_diagnostics(
        &self,
        region: &Region,
        features: &[Feature],
        mut diagnostics: Vec<Diagnostic>,
    ) -> Result<ResultSet> {
        let grid = self.generate_grid(region)?;
        let aggregation = self.aggregate(&grid, features);
        let classifier = Classifier::new(self.config.threshold);

        let mut tables = aggregation.tables;
        let mut records = Vec::with_capacity(grid.len());
        for cell in grid.iter() {
            let counts = tables.remove(cell).unwrap_or_default();
            let class = classifier.classify(&counts);

            let boundary = match self.tessellation.boundary(*cell) {
                Ok(boundary) => Some(boundary),
                Err(HexDivError::RenderingSkipped { cell, reason }) => {
                    log::warn!("Boundary of cell {} skipped: {}", cell, reason);
                    diagnostics.push(Diagnostic::RenderingSkipped { cell, reason });
                    None
                }
                Err(e) => return Err(e),
            };

            records.push(CellRecord {
                cell: *cell,
                boundary,
                counts,
                diversity: class.diversity,
                highlighted: class.highlighted,
            });
        }

        let result = ResultSet {
            region: *region,
            resolution: grid.resolution(),
            threshold: classifier.threshold(),
            records,
            report: aggregation.report,
            diagnostics,
        };

        log::debug!(
            "{} cells, {} highlighted at threshold {}; {} of {} features counted",
            result.len(),
            result.highlighted_count(),
            result.threshold,
            result.report.accepted,
            result.report.total()
        );

        Ok(result)
    }

    #[cfg(feature = "parallel")]
    fn aggregate(&self, grid: &Grid, features: &[Feature]) -> crate::compute::Aggregation {
        let aggregator = Aggregator::new(&self.tessellation, grid);
        if self.config.parallel {
            aggregator.aggregate_parallel(features)
        } else {
            aggregator.aggregate(features)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn aggregate(&self, grid: &Grid, features: &[Feature]) -> crate::compute::Aggregation {
        Aggregator::new(&self.tessellation, grid).aggregate(features)
    }
}
