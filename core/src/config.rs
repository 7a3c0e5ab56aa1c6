use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

// Resolution used when nothing else is asked for: 2^10 + 1
pub const DEFAULT_SIZE: usize = 1025;
pub const DEFAULT_SEED: u64 = 2025;
pub const DEFAULT_ROUGHNESS: f32 = 0.5;
// Starting plane sits just above sea level
pub const DEFAULT_BASE_HEIGHT: f32 = 0.2;

// What to do with cells the subdivision failed to reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoverageMode {
    // Floor them to 0 and log a warning
    #[default]
    Repair,
    // Fail generation with `TerrainError::UnsetCells`
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub size: usize, // must be 2^k + 1, e.g. 129, 1025
    pub seed: u64,
    pub roughness: f32, // displacement per unit of sub-region width
    pub base_height: f32,
    pub coverage: CoverageMode,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            seed: DEFAULT_SEED,
            roughness: DEFAULT_ROUGHNESS,
            base_height: DEFAULT_BASE_HEIGHT,
            coverage: CoverageMode::Repair,
        }
    }
}

impl TerrainConfig {
    // size = 2^exp + 1
    pub fn with_exponent(exp: u32) -> Self {
        Self {
            size: (1usize << exp) + 1,
            ..Default::default()
        }
    }

    // Side exponent k for size = 2^k + 1, if the size has that form
    pub fn exponent(&self) -> Option<u32> {
        validate_size(self.size)
            .ok()
            .map(|_| (self.size - 1).trailing_zeros())
    }

    pub fn validate(&self) -> Result<()> {
        validate_size(self.size)?;
        validate_roughness(self.roughness, self.size)
    }
}

pub fn validate_size(size: usize) -> Result<()> {
    if size >= 2 && (size - 1).is_power_of_two() {
        Ok(())
    } else {
        Err(TerrainError::InvalidSize { size })
    }
}

// Displacements over all levels sum to at most 2·roughness·(size - 1), and a
// center averages four such heights, so 8·roughness·(size - 1) has to fit
// in an f32 for generation to stay finite
pub fn validate_roughness(roughness: f32, size: usize) -> Result<()> {
    let headroom = roughness as f64 * size.saturating_sub(1) as f64 * 8.0;
    if roughness.is_finite() && roughness >= 0.0 && headroom <= f32::MAX as f64 {
        Ok(())
    } else {
        Err(TerrainError::InvalidRoughness { roughness })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_reference_terrain() {
        let c = TerrainConfig::default();
        assert_eq!(c.size, 1025);
        assert_eq!(c.roughness, 0.5);
        assert_eq!(c.base_height, 0.2);
        assert_eq!(c.coverage, CoverageMode::Repair);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn config_with_exponent() {
        let c = TerrainConfig::with_exponent(7);
        assert_eq!(c.size, 129);
        assert_eq!(c.exponent(), Some(7));
        assert_eq!(TerrainConfig::with_exponent(0).size, 2);
    }

    #[test]
    fn config_rejects_bad_sizes() {
        for size in [0, 1, 4, 6, 100, 1024] {
            assert!(
                matches!(validate_size(size), Err(TerrainError::InvalidSize { size: s }) if s == size),
                "size {} should be rejected",
                size
            );
        }
        for size in [2, 3, 5, 9, 17, 1025] {
            assert!(validate_size(size).is_ok(), "size {} should be accepted", size);
        }
    }

    #[test]
    fn config_rejects_bad_roughness() {
        assert!(validate_roughness(0.0, 1025).is_ok());
        assert!(validate_roughness(-0.1, 1025).is_err());
        assert!(validate_roughness(f32::NAN, 1025).is_err());
        assert!(validate_roughness(f32::INFINITY, 1025).is_err());
    }

    #[test]
    fn config_rejects_roughness_that_overflows_displacement() {
        // Finite on its own, infinite once scaled by the grid width
        assert!(validate_roughness(1e36, 1025).is_err());
        assert!(validate_roughness(1e36, 2).is_ok());
        assert!(validate_roughness(1e30, 1025).is_ok());

        let config = TerrainConfig {
            roughness: 1e36,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TerrainError::InvalidRoughness { .. })
        ));
    }
}
