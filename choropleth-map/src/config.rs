use crate::error::ChoroplethError;
use crate::source::GeometrySource;
use choropleth_scales::ramp::RampSpec;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BIN_COUNT: usize = 7;

/// Validated choropleth configuration.
///
/// Every recognized option is an explicit field with a default; `validate`
/// runs before any derived state is constructed, so configuration errors
/// surface synchronously at setup time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethConfig {
    /// Column in the table carrying the region identifier.
    pub table_id_field: String,
    /// Column in the table carrying the numeric value to color by.
    pub numeric_field: String,
    /// Feature property carrying the matching identifier. Not needed when
    /// `use_feature_id` is set.
    pub geometry_id_field: Option<String>,
    /// Layer within a vector source.
    pub source_layer: Option<String>,
    /// Requested class count; the classifier may produce fewer.
    pub bin_count: usize,
    /// Named scheme or explicit color stops.
    pub color_scheme: RampSpec,
    /// Match features by their feature id instead of a property.
    pub use_feature_id: bool,
    /// Color via feature-state updates instead of a baked match expression.
    pub use_feature_state: bool,
}

impl ChoroplethConfig {
    pub fn new(table_id_field: impl Into<String>, numeric_field: impl Into<String>) -> Self {
        Self {
            table_id_field: table_id_field.into(),
            numeric_field: numeric_field.into(),
            geometry_id_field: None,
            source_layer: None,
            bin_count: DEFAULT_BIN_COUNT,
            color_scheme: RampSpec::default(),
            use_feature_id: false,
            use_feature_state: false,
        }
    }

    pub fn with_geometry_id_field(mut self, field: impl Into<String>) -> Self {
        self.geometry_id_field = Some(field.into());
        self
    }

    pub fn with_source_layer(mut self, layer: impl Into<String>) -> Self {
        self.source_layer = Some(layer.into());
        self
    }

    pub fn with_bin_count(mut self, bin_count: usize) -> Self {
        self.bin_count = bin_count;
        self
    }

    pub fn with_color_scheme(mut self, scheme: RampSpec) -> Self {
        self.color_scheme = scheme;
        self
    }

    pub fn with_feature_id(mut self, use_feature_id: bool) -> Self {
        self.use_feature_id = use_feature_id;
        self
    }

    pub fn with_feature_state(mut self, use_feature_state: bool) -> Self {
        self.use_feature_state = use_feature_state;
        self
    }

    /// Source-layer to stamp on the fill layer: explicit config wins, then
    /// whatever the source carries.
    pub fn resolved_source_layer<'a>(&'a self, source: &'a GeometrySource) -> Option<&'a str> {
        self.source_layer.as_deref().or(source.source_layer())
    }

    pub fn validate(&self, source: &GeometrySource) -> Result<(), ChoroplethError> {
        if self.table_id_field.is_empty() {
            return Err(ChoroplethError::EmptyFieldBinding("table_id_field"));
        }
        if self.numeric_field.is_empty() {
            return Err(ChoroplethError::EmptyFieldBinding("numeric_field"));
        }
        if self.bin_count == 0 {
            return Err(ChoroplethError::InvalidBinCount);
        }
        if !self.use_feature_id && self.geometry_id_field.is_none() {
            return Err(ChoroplethError::MissingGeometryIdField);
        }
        if source.is_vector() && self.resolved_source_layer(source).is_none() {
            return Err(ChoroplethError::MissingSourceLayer);
        }
        self.color_scheme.resolve()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use choropleth_scales::error::ChoroplethScaleError;

    fn geojson() -> GeometrySource {
        GeometrySource::from_url("boundaries.geojson")
    }

    fn base_config() -> ChoroplethConfig {
        ChoroplethConfig::new("boundary_id", "val").with_geometry_id_field("id")
    }

    #[test]
    fn test_valid_config() {
        assert_eq!(base_config().validate(&geojson()), Ok(()));
    }

    #[test]
    fn test_defaults() {
        let config = base_config();
        assert_eq!(config.bin_count, DEFAULT_BIN_COUNT);
        assert_eq!(config.color_scheme, RampSpec::Named("OrRd".to_string()));
        assert!(!config.use_feature_id);
        assert!(!config.use_feature_state);
    }

    #[test]
    fn test_empty_field_bindings_rejected() {
        let config = ChoroplethConfig::new("", "val").with_geometry_id_field("id");
        assert_eq!(
            config.validate(&geojson()),
            Err(ChoroplethError::EmptyFieldBinding("table_id_field"))
        );

        let config = ChoroplethConfig::new("boundary_id", "").with_geometry_id_field("id");
        assert_eq!(
            config.validate(&geojson()),
            Err(ChoroplethError::EmptyFieldBinding("numeric_field"))
        );
    }

    #[test]
    fn test_zero_bin_count_rejected() {
        let config = base_config().with_bin_count(0);
        assert_eq!(
            config.validate(&geojson()),
            Err(ChoroplethError::InvalidBinCount)
        );
    }

    #[test]
    fn test_geometry_id_required_unless_feature_id() {
        let config = ChoroplethConfig::new("boundary_id", "val");
        assert_eq!(
            config.validate(&geojson()),
            Err(ChoroplethError::MissingGeometryIdField)
        );
        assert_eq!(
            ChoroplethConfig::new("boundary_id", "val")
                .with_feature_id(true)
                .validate(&geojson()),
            Ok(())
        );
    }

    #[test]
    fn test_vector_source_requires_source_layer() {
        let vector = GeometrySource::from_url("mapbox://stevage.7ux6xzbz");
        assert_eq!(
            base_config().validate(&vector),
            Err(ChoroplethError::MissingSourceLayer)
        );
        assert_eq!(base_config().with_source_layer("ELB").validate(&vector), Ok(()));

        // A source-layer carried by an existing source also satisfies it.
        let existing = GeometrySource::Existing {
            source: "mysource".to_string(),
            source_layer: Some("lga-boundaries".to_string()),
        };
        assert_eq!(base_config().validate(&existing), Ok(()));
    }

    #[test]
    fn test_unknown_scheme_rejected_at_setup() {
        let config = base_config().with_color_scheme(RampSpec::Named("Sunset".to_string()));
        assert_eq!(
            config.validate(&geojson()),
            Err(ChoroplethError::Scale(
                ChoroplethScaleError::UnknownColorScheme("Sunset".to_string())
            ))
        );
    }
}
