//! Locating the analysis object inside the payload layouts that successive
//! versions of the satellite analysis service have produced.

use serde_json::Value;

/// Keys that mark an object as an environmental analysis.
const ANALYSIS_KEYS: &[&str] = &[
    "temperature",
    "vegetation",
    "geometry_info",
    "elevation",
    "precipitation",
    "urban",
    "ndvi_mean",
];

/// A known payload layout, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadShape {
    /// `analysis_results[0].analysis`
    ResultsAnalysis,
    /// `analysis_results[0]`
    Results,
    /// `data.analysis_results[0].analysis`
    DataResultsAnalysis,
    /// `data.analysis_results[0]`
    DataResults,
    /// `analysis`
    Analysis,
    /// The payload itself.
    Root,
}

impl PayloadShape {
    /// JSON pointer to the analysis object for this layout.
    #[must_use]
    pub const fn pointer(self) -> &'static str {
        match self {
            Self::ResultsAnalysis => "/analysis_results/0/analysis",
            Self::Results => "/analysis_results/0",
            Self::DataResultsAnalysis => "/data/analysis_results/0/analysis",
            Self::DataResults => "/data/analysis_results/0",
            Self::Analysis => "/analysis",
            Self::Root => "",
        }
    }

    /// Returns all layouts in resolution order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ResultsAnalysis,
            Self::Results,
            Self::DataResultsAnalysis,
            Self::DataResults,
            Self::Analysis,
            Self::Root,
        ]
    }
}

/// Finds the first layout whose target is an object carrying at least one
/// analysis section.
///
/// Returns `None` when nothing in the payload looks like an analysis, in
/// which case every baseline field falls back to its default.
#[must_use]
pub fn resolve(payload: &Value) -> Option<(PayloadShape, &Value)> {
    PayloadShape::all().iter().find_map(|shape| {
        let candidate = payload.pointer(shape.pointer())?;
        let object = candidate.as_object()?;
        ANALYSIS_KEYS
            .iter()
            .any(|key| object.contains_key(*key))
            .then_some((*shape, candidate))
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn prefers_nested_analysis_over_wrapper() {
        let payload = json!({
            "analysis_results": [{
                "analysis": { "temperature": { "mean": 305.0 } },
                "ndvi_mean": 0.9
            }]
        });
        let (shape, analysis) = resolve(&payload).unwrap();
        assert_eq!(shape, PayloadShape::ResultsAnalysis);
        assert!(analysis.get("temperature").is_some());
    }

    #[test]
    fn falls_through_to_data_wrapper() {
        let payload = json!({
            "data": { "analysis_results": [{ "vegetation": { "ndvi_mean": 0.4 } }] }
        });
        let (shape, _) = resolve(&payload).unwrap();
        assert_eq!(shape, PayloadShape::DataResults);
    }

    #[test]
    fn empty_results_array_is_skipped() {
        let payload = json!({
            "analysis_results": [],
            "analysis": { "elevation": { "mean": 12.0 } }
        });
        let (shape, _) = resolve(&payload).unwrap();
        assert_eq!(shape, PayloadShape::Analysis);
    }

    #[test]
    fn root_payload_resolves_last() {
        let payload = json!({ "geometry_info": { "area_m2": 5000.0 } });
        assert_eq!(resolve(&payload).unwrap().0, PayloadShape::Root);
    }

    #[test]
    fn unrelated_payload_does_not_resolve() {
        assert!(resolve(&json!({ "status": "ok" })).is_none());
        assert!(resolve(&json!([1, 2, 3])).is_none());
    }
}
