//! Overlay rendering for gridded ocean data.
//!
//! Maps a `ScalarGrid` through a value range and a named color scale into
//! an RGBA overlay image (missing cells fully transparent), and encodes it
//! as PNG for the map boundary.

pub mod colorscale;
pub mod png;
pub mod raster;

pub use colorscale::{ColorScale, ColorStop};
pub use png::{encode_overlay, encode_png};
pub use raster::{normalize, rasterize, OverlayImage};

/// Errors from color scale parsing and image encoding.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unknown color scale '{0}'")]
    UnknownScale(String),

    #[error("invalid color scale: {0}")]
    InvalidScale(String),

    #[error("failed to parse color scale definition: {0}")]
    ScaleParse(#[from] serde_json::Error),

    #[error("PNG encoding failed: {0}")]
    Png(String),
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
