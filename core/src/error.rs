use thiserror::Error;

// Everything that can go wrong while building or exporting a terrain
#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("grid size {size} is not 2^k + 1")]
    InvalidSize { size: usize },

    #[error("roughness {roughness} must be a finite, non-negative number")]
    InvalidRoughness { roughness: f32 },

    // Only raised in strict coverage mode
    #[error("{count} cells left unset after subdivision, first at {first:?}")]
    UnsetCells { count: usize, first: (usize, usize) },

    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, TerrainError>;
