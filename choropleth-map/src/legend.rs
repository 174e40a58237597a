use choropleth_common::types::RgbaColor;
use choropleth_scales::classed_color::ClassedColorScale;
use serde::Serialize;
use std::fmt::Write;

/// One legend line: a bin's lower bound and its resolved display color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub value: f32,
    pub color: RgbaColor,
}

/// Static legend fragment, one entry per bin in descending order (highest
/// class first, matching the conventional reading order of a map legend).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn from_scale(scale: &ClassedColorScale) -> Self {
        let entries = scale
            .bins()
            .iter()
            .zip(scale.colors())
            .rev()
            .map(|(bin, color)| LegendEntry {
                value: bin.min,
                color: *color,
            })
            .collect();
        Self { entries }
    }

    /// The HTML fragment: a color box and label per entry, with labels in
    /// the default trimmed decimal format.
    pub fn to_html(&self) -> String {
        self.to_html_with(format_value)
    }

    /// Same fragment with a caller-supplied label formatter, for units or
    /// fixed precision (e.g. `|v| format!("{v:.1}%")`).
    pub fn to_html_with(&self, format_label: impl Fn(f32) -> String) -> String {
        let mut html = String::from("<div class=\"choropleth-legend\">");
        for entry in &self.entries {
            let _ = write!(
                html,
                "\n<span class=\"choropleth-legend-box\" style=\"background-color: {};\"></span>\
                 <span class=\"choropleth-legend-label\">{}</span><br>",
                entry.color.to_hex(),
                format_label(entry.value)
            );
        }
        html.push_str("\n</div>");
        html
    }

    /// Stylesheet block for the fragment produced by [`Legend::to_html`].
    pub fn css() -> &'static str {
        r#".choropleth-legend {
    background: white;
    padding: 1em;
    line-height: 0;
    font-family: sans-serif;
    border: 1px solid grey;
}

.choropleth-legend-box {
    font-size: 30px;
    margin: 0;
    display: inline-block;
    width: 1em;
    height: 1em;
}

.choropleth-legend-label {
    vertical-align: super;
    font-size: 10pt;
    padding-left: 1em;
}
"#
    }
}

fn format_value(value: f32) -> String {
    format!("{value}")
}
