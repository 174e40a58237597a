#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ChoroplethScaleError {
    #[error("Class count must be at least 1")]
    InvalidBinCount,

    #[error("Empty domain")]
    EmptyDomain,

    #[error("Bins must be in ascending order: {0:?}")]
    BinsNotAscending(Vec<f32>),

    #[error("Unknown color scheme: {0}")]
    UnknownColorScheme(String),

    #[error("Color ramp must have at least one stop")]
    EmptyRamp,

    #[error("Invalid color stop '{stop}': {message}")]
    InvalidColorStop { stop: String, message: String },
}
