use choropleth_scales::error::ChoroplethScaleError;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ChoroplethError {
    #[error(transparent)]
    Scale(#[from] ChoroplethScaleError),

    #[error("Field binding '{0}' must not be empty")]
    EmptyFieldBinding(&'static str),

    #[error("Bin count must be at least 1")]
    InvalidBinCount,

    #[error("A geometry id field is required unless feature ids are used")]
    MissingGeometryIdField,

    #[error("A source-layer is required for vector geometry sources")]
    MissingSourceLayer,

    #[error("No finite values found in column '{column}'")]
    EmptyDataset { column: String },

    #[error("Row source error: {0}")]
    Source(String),
}
