/// A flat row-major 2D grid. Indexing is `y * width + x` with no
/// wrapping on either axis; out-of-bounds access via [`Grid::sample`]
/// returns `None` instead of a neighboring value.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    /// Direct access; panics on out-of-bounds coordinates.
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Bounds-checked access for signed coordinates. `None` marks a
    /// lookup outside `[0, width)` x `[0, height)` on either axis.
    pub fn sample(&self, x: i32, y: i32) -> Option<&T> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.get(x as usize, y as usize))
    }

    /// Flat row-major view of the cell data.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cell values.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_round_trip() {
        let mut grid = Grid::new_with(5, 4, 0i32);
        for y in 0..4 {
            for x in 0..5 {
                grid.set(x, y, (x * 10 + y) as i32);
            }
        }
        for y in 0..4 {
            for x in 0..5 {
                assert_eq!(*grid.get(x, y), (x * 10 + y) as i32);
            }
        }
    }

    #[test]
    fn test_sample_out_of_bounds_is_none() {
        let grid = Grid::new_with(3, 3, 7.0f32);
        assert_eq!(grid.sample(-1, 0), None);
        assert_eq!(grid.sample(0, -1), None);
        assert_eq!(grid.sample(3, 0), None);
        assert_eq!(grid.sample(0, 3), None);
        assert_eq!(grid.sample(2, 2), Some(&7.0));
    }

    #[test]
    fn test_from_fn_addressing() {
        let grid = Grid::from_fn(4, 3, |x, y| x + 100 * y);
        assert_eq!(*grid.get(3, 2), 203);
        // Row-major layout: second row starts at index `width`.
        assert_eq!(grid.values()[4], 100);
    }
}
