use crate::classify::Bin;
use crate::error::ChoroplethScaleError;
use crate::ramp::ColorRamp;
use choropleth_common::types::RgbaColor;
use choropleth_common::value::{ScalarOrArray, ScalarOrArrayRef};

/// A classed color scale maps continuous values to one color per bin.
///
/// Unlike a continuous color scale, the lookup is stepped: each bin gets a
/// single representative color sampled from the ramp at a position
/// proportional to the bin's index, so bins are spaced evenly along the ramp
/// regardless of their value extents. Values outside the domain clamp to the
/// nearest edge bin; non-finite values map to the default color.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassedColorScale {
    bins: Vec<Bin>,
    colors: Vec<RgbaColor>,
    default_color: RgbaColor,
}

impl ClassedColorScale {
    pub fn try_new(bins: Vec<Bin>, ramp: &ColorRamp) -> Result<Self, ChoroplethScaleError> {
        if bins.is_empty() {
            return Err(ChoroplethScaleError::EmptyDomain);
        }
        let bounds: Vec<f32> = bins.iter().flat_map(|b| [b.min, b.max]).collect();
        if !bounds.windows(2).all(|w| w[0] <= w[1]) {
            return Err(ChoroplethScaleError::BinsNotAscending(bounds));
        }

        let n = bins.len();
        let colors = (0..n)
            .map(|i| {
                let t = if n == 1 {
                    0.5
                } else {
                    i as f32 / (n - 1) as f32
                };
                ramp.sample(t)
            })
            .collect();

        Ok(Self {
            bins,
            colors,
            default_color: RgbaColor::transparent(),
        })
    }

    /// Overrides the "no data" color (defaults to transparent).
    pub fn with_default_color(mut self, color: RgbaColor) -> Self {
        self.default_color = color;
        self
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// One representative color per bin, in bin order.
    pub fn colors(&self) -> &[RgbaColor] {
        &self.colors
    }

    pub fn default_color(&self) -> RgbaColor {
        self.default_color
    }

    /// Global (min, max) covered by the bins.
    pub fn domain(&self) -> (f32, f32) {
        (self.bins[0].min, self.bins[self.bins.len() - 1].max)
    }

    /// The color for a single value. Upper bin boundaries are inclusive, so a
    /// value equal to a bin's max belongs to that bin rather than the next.
    pub fn color_for(&self, value: f32) -> RgbaColor {
        if !value.is_finite() {
            return self.default_color;
        }
        let idx = match self
            .bins
            .binary_search_by(|b| b.max.partial_cmp(&value).unwrap())
        {
            Ok(i) => i,
            Err(i) => i.min(self.bins.len() - 1),
        };
        self.colors[idx]
    }

    pub fn scale<'a>(&self, values: impl Into<ScalarOrArrayRef<'a, f32>>) -> ScalarOrArray<RgbaColor> {
        values.into().map(|v| self.color_for(*v))
    }
}
