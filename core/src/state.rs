use log::debug;

use crate::color::{ColorScheme, Rgb, color_for};
use crate::config::TerrainConfig;
use crate::error::Result;
use crate::grid::HeightGrid;
use crate::midpoint::{MidpointDisplacement, Terrain};

// Everything a viewer session needs: the settings that produced the
// terrain, the terrain itself and the active color scheme.
// Heights are only rebuilt by `regenerate`/`reseed`; switching schemes
// only changes what `color_at` returns.
pub struct TerrainState {
    config: TerrainConfig,
    terrain: Terrain,
    scheme: ColorScheme,
}

impl TerrainState {
    pub fn new(config: TerrainConfig) -> Result<Self> {
        Self::with_scheme(config, ColorScheme::default())
    }

    pub fn with_scheme(config: TerrainConfig, scheme: ColorScheme) -> Result<Self> {
        config.validate()?;
        let terrain = MidpointDisplacement::from_config(&config)?.generate()?;
        Ok(Self {
            config,
            terrain,
            scheme,
        })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn grid(&self) -> &HeightGrid {
        &self.terrain.grid
    }

    pub fn max_height(&self) -> f32 {
        self.terrain.max_height
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    pub fn set_scheme(&mut self, scheme: ColorScheme) {
        self.scheme = scheme;
    }

    pub fn cycle_scheme(&mut self) -> ColorScheme {
        self.scheme = self.scheme.next();
        debug!("color scheme -> {}", self.scheme);
        self.scheme
    }

    // Rebuild the heights from the current config
    pub fn regenerate(&mut self) -> Result<()> {
        self.terrain = MidpointDisplacement::from_config(&self.config)?.generate()?;
        Ok(())
    }

    pub fn reseed(&mut self, seed: u64) -> Result<()> {
        self.reconfigure(TerrainConfig {
            seed,
            ..self.config.clone()
        })
    }

    // Replace the settings and regenerate. The old terrain is kept if the
    // new settings are rejected.
    pub fn reconfigure(&mut self, config: TerrainConfig) -> Result<()> {
        config.validate()?;
        let terrain = MidpointDisplacement::from_config(&config)?.generate()?;
        self.config = config;
        self.terrain = terrain;
        Ok(())
    }

    pub fn color_of(&self, height: f32) -> Rgb {
        color_for(height, self.terrain.max_height, self.scheme)
    }

    pub fn color_at(&self, x: usize, y: usize) -> Option<Rgb> {
        self.terrain.grid.get(x, y).map(|h| self.color_of(h))
    }

    // One color per cell, row-major like the grid
    pub fn vertex_colors(&self) -> Vec<Rgb> {
        self.terrain
            .grid
            .as_slice()
            .iter()
            .map(|&h| self.color_of(h))
            .collect()
    }
}
