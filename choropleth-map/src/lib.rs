//! Turns a table of values keyed by region identifier into a classed color
//! scale, a fill-layer styling expression and a legend for a map renderer.
//!
//! The algorithmic core (optimal 1-D k-means binning and classed color
//! lookup) lives in `choropleth-scales`; this crate binds it to a validated
//! configuration, a tabular row model and the renderer-facing output shapes.

pub mod config;
pub mod error;
pub mod layer;
pub mod legend;
pub mod source;
pub mod table;

use async_trait::async_trait;

pub use crate::config::ChoroplethConfig;
pub use crate::error::ChoroplethError;
pub use crate::layer::{FeatureStateUpdate, FillLayer};
pub use crate::legend::Legend;
pub use crate::source::GeometrySource;
pub use crate::table::{Row, TableValue};
pub use choropleth_scales::classed_color::ClassedColorScale;
pub use choropleth_scales::classify::Bin;

/// Supplies table rows. Retrieval (CSV over HTTP, a database, in-memory
/// fixtures) is entirely the implementor's concern, including any timeout or
/// cancellation policy.
#[async_trait]
pub trait RowSource {
    async fn fetch_rows(&self) -> Result<Vec<Row>, ChoroplethError>;
}

/// Everything derived from one row binding, replaced wholesale on refresh.
///
/// Holding the outputs in a single immutable value means a caller either sees
/// the previous complete state or the next complete state, never a scale from
/// one row set paired with a layer from another.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedState {
    pub scale: ClassedColorScale,
    pub layer: FillLayer,
    pub legend: Legend,
    /// Present only in feature-state mode.
    pub feature_states: Option<Vec<FeatureStateUpdate>>,
}

impl DerivedState {
    pub fn bins(&self) -> &[Bin] {
        self.scale.bins()
    }
}

/// A configured choropleth: validates its configuration up front, then turns
/// row sets into [`DerivedState`] values.
#[derive(Debug, Clone)]
pub struct Choropleth {
    config: ChoroplethConfig,
    source: GeometrySource,
}

impl Choropleth {
    /// Configuration errors surface here, before any rows are touched.
    pub fn try_new(
        config: ChoroplethConfig,
        source: GeometrySource,
    ) -> Result<Self, ChoroplethError> {
        config.validate(&source)?;
        Ok(Self { config, source })
    }

    pub fn config(&self) -> &ChoroplethConfig {
        &self.config
    }

    pub fn source(&self) -> &GeometrySource {
        &self.source
    }

    /// Classifies the rows' numeric column and builds the scale, layer and
    /// legend in one step. Pure with respect to `self`; call it again with
    /// new rows and replace the previous [`DerivedState`] wholesale.
    pub fn bind_rows(&self, rows: &[Row]) -> Result<DerivedState, ChoroplethError> {
        let values = table::numeric_values(rows, &self.config.numeric_field);
        if values.is_empty() {
            return Err(ChoroplethError::EmptyDataset {
                column: self.config.numeric_field.clone(),
            });
        }

        let bins = choropleth_scales::classify::classify(&values, self.config.bin_count)?;
        let ramp = self.config.color_scheme.resolve()?;
        let scale = ClassedColorScale::try_new(bins, &ramp)?;
        log::debug!(
            "classified {} values into {} bins over [{}, {}]",
            values.len(),
            scale.bins().len(),
            scale.domain().0,
            scale.domain().1
        );

        let (layer, feature_states) = if self.config.use_feature_state {
            (
                layer::build_feature_state_layer(&self.config, &self.source, &scale),
                Some(layer::feature_state_updates(rows, &self.config, &scale)),
            )
        } else {
            (
                layer::build_match_layer(rows, &self.config, &self.source, &scale),
                None,
            )
        };

        let legend = Legend::from_scale(&scale);
        Ok(DerivedState {
            scale,
            layer,
            legend,
            feature_states,
        })
    }

    /// Fetches rows from `source` and binds them. The returned future
    /// completes exactly once, when the full derived state is ready.
    pub async fn load<S: RowSource + Sync>(&self, source: &S) -> Result<DerivedState, ChoroplethError> {
        let rows = source.fetch_rows().await?;
        self.bind_rows(&rows)
    }
}
