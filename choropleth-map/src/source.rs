use serde_json::{json, Value};

/// Default id under which the geometry source and fill layer are registered
/// with the renderer.
pub const SOURCE_ID: &str = "choropleth";

/// Where the region geometry comes from.
///
/// A url ending in `.geojson` is a GeoJSON document; any other url (e.g. a
/// `mapbox://` tileset) is a vector source and needs a source-layer. An
/// `Existing` source is one already registered with the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometrySource {
    GeoJson { url: String },
    Vector { url: String },
    Existing { source: String, source_layer: Option<String> },
}

impl GeometrySource {
    pub fn from_url(url: &str) -> Self {
        if url.ends_with(".geojson") {
            GeometrySource::GeoJson {
                url: url.to_string(),
            }
        } else {
            GeometrySource::Vector {
                url: url.to_string(),
            }
        }
    }

    pub fn is_vector(&self) -> bool {
        !matches!(self, GeometrySource::GeoJson { .. })
    }

    /// Source id to register the layer against.
    pub fn source_id(&self) -> &str {
        match self {
            GeometrySource::Existing { source, .. } => source,
            _ => SOURCE_ID,
        }
    }

    /// Source-layer carried by the source itself, if any.
    pub fn source_layer(&self) -> Option<&str> {
        match self {
            GeometrySource::Existing { source_layer, .. } => source_layer.as_deref(),
            _ => None,
        }
    }

    /// The renderer-facing source definition, or `None` when the source is
    /// already registered.
    pub fn source_def(&self) -> Option<Value> {
        match self {
            GeometrySource::GeoJson { url } => Some(json!({"type": "geojson", "url": url})),
            GeometrySource::Vector { url } => Some(json!({"type": "vector", "url": url})),
            GeometrySource::Existing { .. } => None,
        }
    }
}
