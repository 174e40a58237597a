use crate::error::ChoroplethScaleError;
use choropleth_common::types::RgbaColor;
use palette::{Mix, Srgba};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumString, VariantNames};

/// Built-in sequential and diverging schemes, Color-Brewer style identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, VariantNames)]
pub enum NamedRamp {
    OrRd,
    RdBu,
    RdYlBu,
    Spectral,
    Blues,
    Greens,
    Greys,
    YlGnBu,
    YlOrRd,
    Viridis,
}

impl NamedRamp {
    /// Gradient stops, low to high.
    pub fn stops(&self) -> &'static [&'static str] {
        match self {
            NamedRamp::OrRd => &[
                "#fff7ec", "#fee8c8", "#fdd49e", "#fdbb84", "#fc8d59", "#ef6548", "#d7301f",
                "#b30000", "#7f0000",
            ],
            NamedRamp::RdBu => &[
                "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0",
                "#92c5de", "#4393c3", "#2166ac", "#053061",
            ],
            NamedRamp::RdYlBu => &[
                "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee090", "#e0f3f8", "#abd9e9",
                "#74add1", "#4575b4", "#313695",
            ],
            NamedRamp::Spectral => &[
                "#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#e6f598",
                "#abdda4", "#66c2a5", "#3288bd", "#5e4fa2",
            ],
            NamedRamp::Blues => &[
                "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5",
                "#08519c", "#08306b",
            ],
            NamedRamp::Greens => &[
                "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45",
                "#006d2c", "#00441b",
            ],
            NamedRamp::Greys => &[
                "#ffffff", "#f0f0f0", "#d9d9d9", "#bdbdbd", "#969696", "#737373", "#525252",
                "#252525", "#000000",
            ],
            NamedRamp::YlGnBu => &[
                "#ffffd9", "#edf8b1", "#c7e9b4", "#7fcdbb", "#41b6c4", "#1d91c0", "#225ea8",
                "#253494", "#081d58",
            ],
            NamedRamp::YlOrRd => &[
                "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c",
                "#bd0026", "#800026",
            ],
            NamedRamp::Viridis => &["#440154", "#31688e", "#35b779", "#fde725"],
        }
    }

    pub fn ramp(&self) -> ColorRamp {
        // Built-in stop lists are known-parsable.
        ColorRamp::from_css_stops(self.stops()).unwrap_or_else(|_| ColorRamp {
            stops: vec![Srgba::new(0.0, 0.0, 0.0, 1.0)],
        })
    }
}

/// An ordered gradient of color stops sampled by normalized position.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<Srgba>,
}

impl ColorRamp {
    pub fn try_new(stops: Vec<Srgba>) -> Result<Self, ChoroplethScaleError> {
        if stops.is_empty() {
            return Err(ChoroplethScaleError::EmptyRamp);
        }
        Ok(Self { stops })
    }

    /// Builds a ramp from css color strings (hex, rgb(), named colors).
    pub fn from_css_stops<S: AsRef<str>>(stops: &[S]) -> Result<Self, ChoroplethScaleError> {
        let stops = stops
            .iter()
            .map(|s| parse_css_color(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_new(stops)
    }

    pub fn stops(&self) -> &[Srgba] {
        &self.stops
    }

    /// Samples the gradient at `t` in `[0, 1]`, mixing linearly between the
    /// two surrounding stops. Out-of-range positions clamp to the ends.
    pub fn sample(&self, t: f32) -> RgbaColor {
        if !t.is_finite() {
            return RgbaColor::transparent();
        }
        if self.stops.len() == 1 {
            let c = self.stops[0];
            return RgbaColor::new(c.red, c.green, c.blue, c.alpha);
        }
        let position = t.clamp(0.0, 1.0) * (self.stops.len() - 1) as f32;
        let lower = position.floor() as usize;
        let upper = position.ceil() as usize;
        let mixed = self.stops[lower].mix(self.stops[upper], position - lower as f32);
        RgbaColor::new(mixed.red, mixed.green, mixed.blue, mixed.alpha)
    }
}

/// A ramp selection as it appears in configuration: either a built-in scheme
/// name or an explicit list of css color stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RampSpec {
    Named(String),
    Stops(Vec<String>),
}

impl Default for RampSpec {
    fn default() -> Self {
        RampSpec::Named("OrRd".to_string())
    }
}

impl RampSpec {
    pub fn resolve(&self) -> Result<ColorRamp, ChoroplethScaleError> {
        match self {
            RampSpec::Named(name) => {
                let named = NamedRamp::from_str(name)
                    .map_err(|_| ChoroplethScaleError::UnknownColorScheme(name.clone()))?;
                Ok(named.ramp())
            }
            RampSpec::Stops(stops) => ColorRamp::from_css_stops(stops),
        }
    }
}

fn parse_css_color(s: &str) -> Result<Srgba, ChoroplethScaleError> {
    let color = RgbaColor::from_css(s).map_err(|e| ChoroplethScaleError::InvalidColorStop {
        stop: s.to_string(),
        message: format!("{e:?}"),
    })?;
    Ok(Srgba::new(
        color.red(),
        color.green(),
        color.blue(),
        color.alpha(),
    ))
}
