// core holds the terrain generator and the height-to-color schemes
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod midpoint;
pub mod state;

pub use color::{ColorScheme, Rgb, color_for};
pub use config::{CoverageMode, TerrainConfig};
pub use error::{Result, TerrainError};
pub use grid::HeightGrid;
pub use midpoint::{MidpointDisplacement, Terrain, generate};
pub use state::TerrainState;
