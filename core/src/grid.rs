use std::ops::{Index, IndexMut};

// Marker for cells the subdivision has not written yet.
// NaN never comes out of averaging finite heights, so it cannot collide.
pub const UNSET: f32 = f32::NAN;

// Square height field of side `size`, stored flat and row-major.
// Cells are addressed as (x, y), i.e. `index = y * size + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    size: usize,
    cells: Vec<f32>,
}

impl HeightGrid {
    // A grid with every cell unset
    pub fn unset(size: usize) -> Self {
        Self::filled(size, UNSET)
    }

    pub fn filled(size: usize, value: f32) -> Self {
        Self {
            size,
            cells: vec![value; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.size && y < self.size).then(|| y * self.size + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        self.offset(x, y).map(|i| self.cells[i])
    }

    // Row-major view, one row per y
    pub fn as_slice(&self) -> &[f32] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.cells.chunks_exact(self.size.max(1))
    }

    // Yields ((x, y), height) for every cell in row-major order
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), f32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &h)| ((i % self.size, i / self.size), h))
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [f32] {
        &mut self.cells
    }
}

impl Index<(usize, usize)> for HeightGrid {
    type Output = f32;

    fn index(&self, (x, y): (usize, usize)) -> &f32 {
        match self.offset(x, y) {
            Some(i) => &self.cells[i],
            None => panic!("cell ({x}, {y}) outside {0}×{0} grid", self.size),
        }
    }
}

impl IndexMut<(usize, usize)> for HeightGrid {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut f32 {
        match self.offset(x, y) {
            Some(i) => &mut self.cells[i],
            None => panic!("cell ({x}, {y}) outside {0}×{0} grid", self.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HeightGrid;

    #[test]
    fn grid_row_major_layout() {
        let mut g = HeightGrid::filled(3, 0.0);
        g[(2, 1)] = 7.0;
        assert_eq!(g.as_slice()[3 + 2], 7.0);
        assert_eq!(g.get(2, 1), Some(7.0));
        assert_eq!(g.rows().nth(1).unwrap(), &[0.0, 0.0, 7.0]);
    }

    #[test]
    fn grid_bounds_checked_get() {
        let g = HeightGrid::filled(5, 1.0);
        assert_eq!(g.get(4, 4), Some(1.0));
        assert_eq!(g.get(5, 0), None);
        assert_eq!(g.get(0, 5), None);
    }

    #[test]
    #[should_panic]
    fn grid_index_out_of_range_panics() {
        let g = HeightGrid::filled(3, 0.0);
        let _ = g[(3, 0)];
    }

    #[test]
    fn grid_starts_unset() {
        let mut g = HeightGrid::unset(2);
        assert!(g.as_slice().iter().all(|h| h.is_nan()));
        g[(1, 1)] = 0.5;
        assert_eq!(g.get(1, 1), Some(0.5));
    }

    #[test]
    fn grid_iter_coordinates() {
        let g = HeightGrid::filled(2, 3.0);
        let coords: Vec<_> = g.iter().map(|(c, _)| c).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }
}
