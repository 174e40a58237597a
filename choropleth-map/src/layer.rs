use crate::config::ChoroplethConfig;
use crate::source::GeometrySource;
use crate::table::{Row, TableValue};
use choropleth_scales::classed_color::ClassedColorScale;
use serde::Serialize;
use std::collections::HashSet;

pub const LAYER_ID: &str = "choropleth";

/// Feature-state property the incremental recolor path writes to.
pub const FEATURE_STATE_KEY: &str = "choropleth-color";

/// A renderer styling expression, built as a typed tree and serialized to the
/// renderer's JSON array form. The renderer's expression language is treated
/// as an opaque output contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Expr {
    Bool(bool),
    Number(f64),
    String(String),
    Op(Vec<Expr>),
}

impl Expr {
    pub fn get(property: &str) -> Expr {
        Expr::Op(vec!["get".into(), property.into()])
    }

    pub fn feature_id() -> Expr {
        Expr::Op(vec!["id".into()])
    }

    pub fn feature_state(key: &str) -> Expr {
        Expr::Op(vec!["feature-state".into(), key.into()])
    }

    pub fn coalesce(exprs: Vec<Expr>) -> Expr {
        let mut op: Vec<Expr> = vec!["coalesce".into()];
        op.extend(exprs);
        Expr::Op(op)
    }

    /// `["match", input, label_1, output_1, ..., fallback]`
    pub fn match_expr(input: Expr, branches: Vec<(Expr, Expr)>, fallback: Expr) -> Expr {
        let mut op: Vec<Expr> = vec!["match".into(), input];
        for (label, output) in branches {
            op.push(label);
            op.push(output);
        }
        op.push(fallback);
        Expr::Op(op)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::String(s.to_string())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::String(s)
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Number(v)
    }
}

impl From<&TableValue> for Expr {
    fn from(value: &TableValue) -> Self {
        match value {
            TableValue::Number(v) => Expr::Number(*v),
            TableValue::String(s) => Expr::String(s.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillPaint {
    #[serde(rename = "fill-color")]
    pub fill_color: Expr,
}

/// The fill layer definition handed to the map renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillLayer {
    pub id: String,
    #[serde(rename = "type")]
    pub layer_type: String,
    pub source: String,
    #[serde(rename = "source-layer", skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    pub paint: FillPaint,
}

impl FillLayer {
    fn new(config: &ChoroplethConfig, source: &GeometrySource, fill_color: Expr) -> Self {
        Self {
            id: LAYER_ID.to_string(),
            layer_type: "fill".to_string(),
            source: source.source_id().to_string(),
            source_layer: config.resolved_source_layer(source).map(str::to_string),
            paint: FillPaint { fill_color },
        }
    }
}

/// One feature-state write: attaches the resolved color to a single feature
/// so the renderer can recolor it without rebuilding the layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStateUpdate {
    pub id: TableValue,
    pub state: FeatureColorState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureColorState {
    #[serde(rename = "choropleth-color")]
    pub color: String,
}

/// Builds the baked match-expression layer: one branch per row with a usable
/// id and finite value, falling back to the sentinel color for everything
/// else. Duplicate ids keep the first row's branch.
///
/// Features are matched on `geometry_id_field`, or on their feature id when
/// `use_feature_id` is set. A config with neither (rejected by
/// [`ChoroplethConfig::validate`], but representable when this is called
/// directly) also matches on feature ids.
pub fn build_match_layer(
    rows: &[Row],
    config: &ChoroplethConfig,
    source: &GeometrySource,
    scale: &ClassedColorScale,
) -> FillLayer {
    let input = match (&config.geometry_id_field, config.use_feature_id) {
        (Some(field), false) => Expr::get(field),
        _ => Expr::feature_id(),
    };

    let branches: Vec<(Expr, Expr)> = row_colors(rows, config, scale)
        .map(|(id, color)| (Expr::from(&id), Expr::from(color)))
        .collect();

    let sentinel: Expr = scale.default_color().to_hex().into();
    let fill_color = if branches.is_empty() {
        sentinel
    } else {
        Expr::match_expr(input, branches, sentinel)
    };

    FillLayer::new(config, source, fill_color)
}

/// Builds the feature-state layer variant: the paint reads the per-feature
/// color written by [`feature_state_updates`], with the sentinel as fallback.
pub fn build_feature_state_layer(config: &ChoroplethConfig, source: &GeometrySource, scale: &ClassedColorScale) -> FillLayer {
    let fill_color = Expr::coalesce(vec![
        Expr::feature_state(FEATURE_STATE_KEY),
        scale.default_color().to_hex().into(),
    ]);
    FillLayer::new(config, source, fill_color)
}

/// The feature-state batch for one row binding, in row order.
pub fn feature_state_updates(
    rows: &[Row],
    config: &ChoroplethConfig,
    scale: &ClassedColorScale,
) -> Vec<FeatureStateUpdate> {
    row_colors(rows, config, scale)
        .map(|(id, color)| FeatureStateUpdate {
            id,
            state: FeatureColorState { color },
        })
        .collect()
}

/// (id, hex color) per row with a usable id and finite value, first
/// occurrence of each id winning.
fn row_colors<'a>(
    rows: &'a [Row],
    config: &'a ChoroplethConfig,
    scale: &'a ClassedColorScale,
) -> impl Iterator<Item = (TableValue, String)> + 'a {
    let mut seen: HashSet<String> = HashSet::new();
    rows.iter().filter_map(move |row| {
        let id = row.get(&config.table_id_field)?;
        let value = row.get(&config.numeric_field)?.as_numeric()?;
        if !seen.insert(id.id_key()) {
            return None;
        }
        Some((id.clone(), scale.color_for(value).to_hex()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_row as row;
    use choropleth_scales::classify::classify;
    use choropleth_scales::ramp::RampSpec;
    use serde_json::json;

    fn fixture() -> (Vec<Row>, ChoroplethConfig, GeometrySource, ClassedColorScale) {
        let rows = vec![
            row(&[("boundary_id", "a".into()), ("val", 1.0.into())]),
            row(&[("boundary_id", "b".into()), ("val", 9.0.into())]),
            row(&[("boundary_id", "c".into()), ("val", "".into())]),
        ];
        let config = ChoroplethConfig::new("boundary_id", "val")
            .with_geometry_id_field("id")
            .with_bin_count(2)
            .with_color_scheme(RampSpec::Stops(vec![
                "#000000".to_string(),
                "#ffffff".to_string(),
            ]));
        let source = GeometrySource::from_url("boundaries.geojson");
        let bins = classify(&[1.0, 9.0], 2).unwrap();
        let scale =
            ClassedColorScale::try_new(bins, &config.color_scheme.resolve().unwrap()).unwrap();
        (rows, config, source, scale)
    }

    #[test]
    fn test_match_layer_shape() {
        let (rows, config, source, scale) = fixture();
        let layer = build_match_layer(&rows, &config, &source, &scale);
        assert_eq!(
            serde_json::to_value(&layer).unwrap(),
            json!({
                "id": "choropleth",
                "type": "fill",
                "source": "choropleth",
                "paint": {
                    "fill-color": [
                        "match", ["get", "id"],
                        "a", "#000000",
                        "b", "#ffffff",
                        "#00000000"
                    ]
                }
            })
        );
    }

    #[test]
    fn test_match_layer_by_feature_id() {
        let (rows, config, source, scale) = fixture();
        let config = config.with_feature_id(true);
        let layer = build_match_layer(&rows, &config, &source, &scale);
        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(value["paint"]["fill-color"][1], json!(["id"]));
    }

    #[test]
    fn test_missing_geometry_id_field_matches_feature_ids() {
        let (rows, config, source, scale) = fixture();
        let config = ChoroplethConfig {
            geometry_id_field: None,
            use_feature_id: false,
            ..config
        };
        let layer = build_match_layer(&rows, &config, &source, &scale);
        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(value["paint"]["fill-color"][1], json!(["id"]));
    }

    #[test]
    fn test_duplicate_ids_keep_first_row() {
        let (mut rows, config, source, scale) = fixture();
        rows.push(row(&[("boundary_id", "a".into()), ("val", 9.0.into())]));
        let layer = build_match_layer(&rows, &config, &source, &scale);
        let value = serde_json::to_value(&layer).unwrap();
        let expr = value["paint"]["fill-color"].as_array().unwrap();
        // "a" appears once, with the first row's color.
        let labels: Vec<_> = expr.iter().filter(|v| *v == &json!("a")).collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(expr[3], json!("#000000"));
    }

    #[test]
    fn test_rows_without_finite_value_fall_through() {
        let (rows, config, source, scale) = fixture();
        let layer = build_match_layer(&rows, &config, &source, &scale);
        let value = serde_json::to_value(&layer).unwrap();
        let expr = value["paint"]["fill-color"].as_array().unwrap();
        assert!(!expr.iter().any(|v| v == &json!("c")));
    }

    #[test]
    fn test_vector_source_layer_stamped() {
        let (rows, config, _, scale) = fixture();
        let config = config.with_source_layer("ELB");
        let source = GeometrySource::from_url("mapbox://stevage.7ux6xzbz");
        let layer = build_match_layer(&rows, &config, &source, &scale);
        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(value["source-layer"], json!("ELB"));
    }

    #[test]
    fn test_feature_state_layer_and_updates() {
        let (rows, config, source, scale) = fixture();
        let layer = build_feature_state_layer(&config, &source, &scale);
        assert_eq!(
            serde_json::to_value(&layer.paint).unwrap(),
            json!({
                "fill-color": [
                    "coalesce",
                    ["feature-state", "choropleth-color"],
                    "#00000000"
                ]
            })
        );

        let updates = feature_state_updates(&rows, &config, &scale);
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].id, TableValue::from("a"));
        assert_eq!(updates[0].state.color, "#000000");
        assert_eq!(updates[1].id, TableValue::from("b"));
        assert_eq!(updates[1].state.color, "#ffffff");
    }

    #[test]
    fn test_numeric_ids_serialize_as_numbers() {
        let rows = vec![row(&[("boundary_id", 42.0.into()), ("val", 1.0.into())])];
        let (_, config, source, scale) = fixture();
        let layer = build_match_layer(&rows, &config, &source, &scale);
        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(value["paint"]["fill-color"][2], json!(42.0));
    }
}
