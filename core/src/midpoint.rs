use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{
    CoverageMode, DEFAULT_BASE_HEIGHT, TerrainConfig, validate_roughness, validate_size,
};
use crate::error::{Result, TerrainError};
use crate::grid::HeightGrid;

// Unset cells reported one by one before falling back to a summary
const MAX_REPORTED_UNSET: usize = 8;

// Output of one generation pass
#[derive(Clone, Debug, PartialEq)]
pub struct Terrain {
    pub grid: HeightGrid,
    // Largest height seen, never below 0
    pub max_height: f32,
    // Cells floored to 0 because the subdivision never reached them
    pub repaired_cells: usize,
}

// Square midpoint-displacement terrain generator.
// Each square gets its center set to the mean of its corners plus noise
// proportional to its width, its edge midpoints set to the plain mean of
// the two adjacent corners, and is then split into four.
pub struct MidpointDisplacement {
    size: usize, // must be 2^n + 1, e.g. 129, 1025
    seed: u64,
    roughness: f32, // displacement per unit of square width
    corners: [f32; 4],
    coverage: CoverageMode,
}

impl MidpointDisplacement {
    pub fn new(size: usize, seed: u64, roughness: f32) -> Result<Self> {
        validate_size(size)?;
        validate_roughness(roughness, size)?;

        Ok(Self {
            size,
            seed,
            roughness,
            corners: [DEFAULT_BASE_HEIGHT; 4],
            coverage: CoverageMode::default(),
        })
    }

    pub fn from_config(config: &TerrainConfig) -> Result<Self> {
        Ok(Self::new(config.size, config.seed, config.roughness)?
            .with_base_height(config.base_height)
            .with_coverage(config.coverage))
    }

    // Same height on all four grid corners
    pub fn with_base_height(self, height: f32) -> Self {
        self.with_corners([height; 4])
    }

    // Corner heights in the order (0,0), (N-1,0), (0,N-1), (N-1,N-1)
    pub fn with_corners(mut self, corners: [f32; 4]) -> Self {
        self.corners = corners;
        self
    }

    pub fn with_coverage(mut self, coverage: CoverageMode) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    // Build the grid, then floor it at 0 and measure the peak
    pub fn generate(&self) -> Result<Terrain> {
        let start = Instant::now();
        debug!(
            "generating {0}×{0} terrain (seed {1}, roughness {2})",
            self.size, self.seed, self.roughness
        );

        let mut grid = self.displace();
        let (max_height, repaired_cells) = self.finish(&mut grid)?;

        info!(
            "terrain {0}×{0} ready in {1:.2} ms, max height {2:.3}",
            self.size,
            start.elapsed().as_secs_f64() * 1000.0,
            max_height
        );

        Ok(Terrain {
            grid,
            max_height,
            repaired_cells,
        })
    }

    // Raw subdivision output, before flooring. Cells left unset stay NaN.
    pub fn displace(&self) -> HeightGrid {
        let last = self.size - 1;
        let mut grid = HeightGrid::unset(self.size);
        let mut rng = StdRng::seed_from_u64(self.seed);

        grid[(0, 0)] = self.corners[0];
        grid[(last, 0)] = self.corners[1];
        grid[(0, last)] = self.corners[2];
        grid[(last, last)] = self.corners[3];

        self.subdivide(&mut grid, &mut rng, 0, 0, last);
        grid
    }

    // Fill the square of side `w` anchored at (x, y); its corners are known.
    // Depth is bounded by log2(size - 1).
    fn subdivide(&self, grid: &mut HeightGrid, rng: &mut StdRng, x: usize, y: usize, w: usize) {
        if w < 2 {
            return;
        }

        let half = w / 2;
        let (xc, yc) = (x + half, y + half);

        let top_left = grid[(x, y)];
        let top_right = grid[(x + w, y)];
        let bottom_left = grid[(x, y + w)];
        let bottom_right = grid[(x + w, y + w)];

        let amplitude = self.roughness * w as f32;
        let jitter = if amplitude > 0.0 {
            rng.random_range(-amplitude..=amplitude)
        } else {
            0.0
        };
        let center = (top_left + top_right + bottom_left + bottom_right) / 4.0 + jitter;

        // Edge midpoints are never displaced
        grid[(xc, y)] = (top_left + top_right) / 2.0;
        grid[(x, yc)] = (top_left + bottom_left) / 2.0;
        grid[(xc, y + w)] = (bottom_left + bottom_right) / 2.0;
        grid[(x + w, yc)] = (top_right + bottom_right) / 2.0;
        grid[(xc, yc)] = center;

        self.subdivide(grid, rng, x, y, half);
        self.subdivide(grid, rng, xc, y, half);
        self.subdivide(grid, rng, x, yc, half);
        self.subdivide(grid, rng, xc, yc, half);
    }

    // Single pass over every cell: record the peak, deal with unset
    // cells according to the coverage mode, clamp to >= 0
    fn finish(&self, grid: &mut HeightGrid) -> Result<(f32, usize)> {
        let size = grid.size();
        let mut max_height = 0.0f32;
        let mut unset = 0usize;
        let mut first = None;

        for (i, cell) in grid.cells_mut().iter_mut().enumerate() {
            if cell.is_nan() {
                let at = (i % size, i / size);
                first.get_or_insert(at);
                unset += 1;
                if self.coverage == CoverageMode::Repair && unset <= MAX_REPORTED_UNSET {
                    warn!("cell {:?} uninitialized, flooring to 0", at);
                }
                *cell = 0.0;
                continue;
            }
            max_height = max_height.max(*cell);
            *cell = cell.max(0.0);
        }

        if let Some(first) = first {
            if self.coverage == CoverageMode::Strict {
                return Err(TerrainError::UnsetCells {
                    count: unset,
                    first,
                });
            }
            warn!("{} cells were never reached by subdivision", unset);
        }

        Ok((max_height, unset))
    }
}

// Generate with the default base height; the (grid, max height) pair
// lives in the returned `Terrain`
pub fn generate(size: usize, roughness: f32, seed: u64) -> Result<Terrain> {
    MidpointDisplacement::new(size, seed, roughness)?.generate()
}
