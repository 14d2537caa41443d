//! Feature sources.
//!
//! The pipeline only needs a list of features for a region. Where the list
//! comes from is hidden behind [`FeatureProvider`]; transport and parse
//! failures are turned into an empty list plus a diagnostic by
//! [`fetch_or_empty`].

pub mod overpass;

#[cfg(feature = "overpass")]
pub use overpass::OverpassProvider;

use crate::error::Result;
use crate::pipeline::Diagnostic;
use hexdiv_types::feature::Feature;
use hexdiv_types::region::Region;

/// Supplies point features for a bounding box.
pub trait FeatureProvider {
    fn fetch(&self, region: &Region) -> Result<Vec<Feature>>;
}

impl<F> FeatureProvider for F
where
    F: Fn(&Region) -> Result<Vec<Feature>>,
{
    fn fetch(&self, region: &Region) -> Result<Vec<Feature>> {
        self(region)
    }
}

/// A fixed, in-memory feature list.
///
/// Returns the whole list for any region; features outside the generated
/// grid are dropped by the aggregator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticProvider {
    features: Vec<Feature>,
}

impl StaticProvider {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Parse a JSON array of `{"lat", "lon", "category"}` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }
}

impl FeatureProvider for StaticProvider {
    fn fetch(&self, _region: &Region) -> Result<Vec<Feature>> {
        Ok(self.features.clone())
    }
}

/// Features plus the diagnostic raised while fetching them, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub features: Vec<Feature>,
    pub diagnostic: Option<Diagnostic>,
}

/// Fetch from `provider`, degrading any failure to an empty feature list.
pub fn fetch_or_empty<P: FeatureProvider + ?Sized>(provider: &P, region: &Region) -> FetchOutcome {
    match provider.fetch(region) {
        Ok(features) => {
            log::debug!("Fetched {} features", features.len());
            FetchOutcome {
                features,
                diagnostic: None,
            }
        }
        Err(e) => {
            log::warn!("Feature provider failed, continuing without features: {}", e);
            FetchOutcome {
                features: Vec::new(),
                diagnostic: Some(Diagnostic::ProviderUnavailable {
                    message: e.to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HexDivError;

    fn region() -> Region {
        Region::new(0.0, 0.0, 1.0, 1.0)
    }

    #[test]
    fn test_static_provider_returns_everything() {
        let provider = StaticProvider::new(vec![
            Feature::new(0.5, 0.5, "cafe"),
            Feature::new(50.0, 50.0, "bank"),
        ]);
        assert_eq!(provider.fetch(&region()).unwrap().len(), 2);
    }

    #[test]
    fn test_static_provider_from_json() {
        let provider = StaticProvider::from_json(
            r#"[{"lat": 0.1, "lon": 0.2, "category": "cafe"}, {"lat": 0.3, "lon": 0.4}]"#,
        )
        .unwrap();
        assert_eq!(
            provider.features(),
            &[Feature::new(0.1, 0.2, "cafe"), Feature::uncategorized(0.3, 0.4)]
        );
    }

    #[test]
    fn test_fetch_failure_degrades_to_empty() {
        let failing = |_: &Region| -> Result<Vec<Feature>> {
            Err(HexDivError::ProviderUnavailable("status 504".into()))
        };

        let outcome = fetch_or_empty(&failing, &region());
        assert!(outcome.features.is_empty());
        assert_eq!(
            outcome.diagnostic,
            Some(Diagnostic::ProviderUnavailable {
                message: "Feature provider unavailable: status 504".into()
            })
        );
    }

    #[test]
    fn test_fetch_success_has_no_diagnostic() {
        let provider = StaticProvider::new(vec![Feature::new(0.5, 0.5, "cafe")]);
        let outcome = fetch_or_empty(&provider, &region());
        assert_eq!(outcome.features.len(), 1);
        assert!(outcome.diagnostic.is_none());
    }
}
