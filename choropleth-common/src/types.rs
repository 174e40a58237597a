use css_color_parser::{Color as CssColor, ColorParseError};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// An RGBA color with components in `0.0..=1.0`.
///
/// The fully transparent color doubles as the "no data" sentinel throughout
/// the crate family: values that cannot participate in a classed lookup are
/// mapped to it rather than reported as errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbaColor(pub [f32; 4]);

impl RgbaColor {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    /// Fully transparent black, the sentinel for missing data.
    pub fn transparent() -> Self {
        Self([0.0, 0.0, 0.0, 0.0])
    }

    /// Parses a css color string (hex, `rgb()`/`rgba()`, named colors).
    pub fn from_css(s: &str) -> Result<Self, ColorParseError> {
        let color = s.parse::<CssColor>()?;
        Ok(Self::new(
            color.r as f32 / 255.0,
            color.g as f32 / 255.0,
            color.b as f32 / 255.0,
            color.a,
        ))
    }

    pub fn red(&self) -> f32 {
        self.0[0]
    }

    pub fn green(&self) -> f32 {
        self.0[1]
    }

    pub fn blue(&self) -> f32 {
        self.0[2]
    }

    pub fn alpha(&self) -> f32 {
        self.0[3]
    }

    pub fn is_transparent(&self) -> bool {
        self.0[3] == 0.0
    }

    /// Lowercase hex form: `#rrggbb` when fully opaque, `#rrggbbaa` otherwise.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.0;
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                channel(r),
                channel(g),
                channel(b),
                channel(a)
            )
        }
    }
}

impl Hash for RgbaColor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.iter().for_each(|v| OrderedFloat::from(*v).hash(state));
    }
}
