use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("elevation request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("elevation provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("malformed elevation raster: {0}")]
    Format(String),

    #[error("unknown DEM type {0:?}")]
    DemType(String),
}

impl From<tiff::TiffError> for FetchError {
    fn from(err: tiff::TiffError) -> Self {
        Self::Format(err.to_string())
    }
}
