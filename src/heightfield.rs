use rand::Rng;
use thiserror::Error;

use crate::grid::Grid;

/// Largest accepted grid exponent; `2^12 + 1 = 4097` per side keeps the
/// working grid around 64 MB of f32s.
pub const MAX_EDGE_SIZE: u32 = 12;

/// Parameters for fractal height-field generation.
#[derive(Clone, Copy, Debug)]
pub struct HeightFieldParams {
    /// Grid exponent; the working grid is `2^edge_size + 1` on a side.
    pub edge_size: u32,
    /// Displacement damping in `(0, 1]`; higher values give rougher
    /// terrain because random offsets shrink more slowly per level.
    pub roughness: f32,
}

impl Default for HeightFieldParams {
    fn default() -> Self {
        Self {
            edge_size: 9,
            roughness: 0.7,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum GenerationError {
    #[error("edge size must be at least 1 (got {0})")]
    EdgeSizeTooSmall(u32),
    #[error("edge size must be at most {MAX_EDGE_SIZE} (got {0})")]
    EdgeSizeTooLarge(u32),
    #[error("roughness must be in (0.0, 1.0] (got {0})")]
    InvalidRoughness(f32),
    #[error("generated field is flat; cannot normalize a zero range")]
    DegenerateRange,
}

/// A square grid of elevation scalars, `2^edge_size + 1` on a side.
/// After [`generate`] completes, every value lies in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    edge_size: u32,
    grid: Grid<f32>,
}

impl HeightField {
    fn new(edge_size: u32) -> Self {
        let size = (1usize << edge_size) + 1;
        // Placeholder fill; every interior cell is overwritten by the
        // subdivision and the corners are seeded explicitly below.
        let grid = Grid::from_fn(size, size, |x, y| (x + y) as f32);
        Self { edge_size, grid }
    }

    /// Build a synthetic field from a closure mapping `(x, y)` to a
    /// normalized value. Useful for tests and downstream tooling that
    /// needs a field with known contents.
    pub fn from_fn(
        edge_size: u32,
        f: impl FnMut(usize, usize) -> f32,
    ) -> Result<Self, GenerationError> {
        validate_edge_size(edge_size)?;
        let size = (1usize << edge_size) + 1;
        Ok(Self {
            edge_size,
            grid: Grid::from_fn(size, size, f),
        })
    }

    pub fn edge_size(&self) -> u32 {
        self.edge_size
    }

    /// Grid side length (`2^edge_size + 1`).
    pub fn size(&self) -> usize {
        self.grid.width()
    }

    pub fn max_index(&self) -> usize {
        self.size() - 1
    }

    /// Direct in-bounds read.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        *self.grid.get(x, y)
    }

    fn set(&mut self, x: usize, y: usize, value: f32) {
        self.grid.set(x, y, value);
    }

    /// Bounds-checked read; `None` for coordinates outside the grid.
    pub fn sample(&self, x: i32, y: i32) -> Option<f32> {
        self.grid.sample(x, y).copied()
    }

    /// Flat row-major view of the values.
    pub fn values(&self) -> &[f32] {
        self.grid.values()
    }

    /// Map an output-texture index onto the grid axis, nearest-index.
    /// Identity when `out_len` equals the grid size.
    pub fn grid_index(&self, i: usize, out_len: usize) -> usize {
        if out_len <= 1 {
            return 0;
        }
        let t = i as f32 / (out_len - 1) as f32;
        (t * self.max_index() as f32).round() as usize
    }

    /// Read the value for output-texture cell `(x, y)` of a
    /// `width x height` texture, index-mapping onto the grid.
    pub fn mapped(&self, x: usize, y: usize, width: usize, height: usize) -> f32 {
        self.get(self.grid_index(x, width), self.grid_index(y, height))
    }
}

fn validate_edge_size(edge_size: u32) -> Result<(), GenerationError> {
    if edge_size < 1 {
        return Err(GenerationError::EdgeSizeTooSmall(edge_size));
    }
    if edge_size > MAX_EDGE_SIZE {
        return Err(GenerationError::EdgeSizeTooLarge(edge_size));
    }
    Ok(())
}

/// Reject invalid parameters before any allocation happens.
pub fn validate(params: &HeightFieldParams) -> Result<(), GenerationError> {
    validate_edge_size(params.edge_size)?;
    if !(params.roughness > 0.0 && params.roughness <= 1.0) {
        return Err(GenerationError::InvalidRoughness(params.roughness));
    }
    Ok(())
}

/// Generate a normalized fractal height field by midpoint displacement.
///
/// Seeds the four corners asymmetrically (a deliberate slope from the
/// top-left down to the bottom-right), runs the diamond-square
/// subdivision with offsets bounded by `roughness * size` per level,
/// then rescales all values into `[0, 1]`.
pub fn generate<R: Rng>(
    params: &HeightFieldParams,
    rng: &mut R,
) -> Result<HeightField, GenerationError> {
    validate(params)?;

    let mut field = HeightField::new(params.edge_size);
    seed_corners(&mut field);
    let top = field.max_index();
    divide(&mut field, top, params.roughness, rng);
    normalize(&mut field)?;
    Ok(field)
}

/// Corner seeds slope the terrain: high at top-left, sea level at
/// bottom-right, intermediate elsewhere.
fn seed_corners(field: &mut HeightField) {
    let size = field.size();
    let max = field.max_index();
    field.set(0, 0, max as f32);
    field.set(max, 0, size as f32 / 2.0);
    field.set(max, max, 0.0);
    field.set(0, max, max as f32 / 2.0);
}

/// One recursion step: displace the square lattice, then the diamond
/// lattice, at the current cell size, then halve. The diamond pass must
/// follow the square pass at each level because diamond targets average
/// square results from the same level.
fn divide<R: Rng>(field: &mut HeightField, size: usize, roughness: f32, rng: &mut R) {
    let half = size / 2;
    if half < 1 {
        return;
    }
    subdivide_level(field, size, roughness * size as f32, rng);
    divide(field, half, roughness, rng);
}

/// Run the square and diamond passes for a single level. `scale` bounds
/// the random offset magnitude; an offset is drawn per target cell even
/// when `scale` is zero so the draw sequence is independent of the
/// roughness value.
fn subdivide_level<R: Rng>(field: &mut HeightField, size: usize, scale: f32, rng: &mut R) {
    let half = size / 2;
    let max = field.max_index();

    for y in (half..max).step_by(size) {
        for x in (half..max).step_by(size) {
            let offset = draw_offset(rng, scale);
            square(field, x, y, half, offset);
        }
    }

    for y in (0..=max).step_by(half) {
        for x in (((y + half) % size)..=max).step_by(size) {
            let offset = draw_offset(rng, scale);
            diamond(field, x, y, half, offset);
        }
    }
}

fn draw_offset<R: Rng>(rng: &mut R, scale: f32) -> f32 {
    rng.gen::<f32>() * scale * 2.0 - scale
}

/// Set `(x, y)` to the mean of its four diagonal neighbors at distance
/// `half`, plus `offset`. Out-of-bounds neighbors are dropped from the
/// mean.
fn square(field: &mut HeightField, x: usize, y: usize, half: usize, offset: f32) {
    let (xi, yi, h) = (x as i32, y as i32, half as i32);
    let avg = average([
        field.sample(xi - h, yi - h),
        field.sample(xi + h, yi - h),
        field.sample(xi + h, yi + h),
        field.sample(xi - h, yi + h),
    ]);
    debug_assert!(avg.is_some(), "square target ({x}, {y}) has no neighbors");
    if let Some(avg) = avg {
        field.set(x, y, avg + offset);
    }
}

/// Set `(x, y)` to the mean of its four axis-aligned neighbors at
/// distance `half`, plus `offset`. Out-of-bounds neighbors are dropped
/// from the mean.
fn diamond(field: &mut HeightField, x: usize, y: usize, half: usize, offset: f32) {
    let (xi, yi, h) = (x as i32, y as i32, half as i32);
    let avg = average([
        field.sample(xi, yi - h),
        field.sample(xi + h, yi),
        field.sample(xi, yi + h),
        field.sample(xi - h, yi),
    ]);
    debug_assert!(avg.is_some(), "diamond target ({x}, {y}) has no neighbors");
    if let Some(avg) = avg {
        field.set(x, y, avg + offset);
    }
}

/// Arithmetic mean of the present samples; `None` if every sample is
/// missing.
fn average(samples: [Option<f32>; 4]) -> Option<f32> {
    let mut sum = 0.0f32;
    let mut count = 0u32;
    for sample in samples.into_iter().flatten() {
        sum += sample;
        count += 1;
    }
    (count > 0).then(|| sum / count as f32)
}

/// Rescale all values into `[0, 1]` against the running min and max.
///
/// Both extremes start at 0.0 rather than +/-infinity, matching the
/// reference generator: a field that never dips below zero keeps 0.0 as
/// its normalization floor, so its smallest value lands above 0.0
/// instead of exactly on it. The bottom-right corner is seeded at 0.0
/// and never rewritten, so in practice the floor is always reached.
fn normalize(field: &mut HeightField) -> Result<(), GenerationError> {
    let mut min = 0.0f32;
    let mut max = 0.0f32;
    for &val in field.values() {
        if val > max {
            max = val;
        }
        if val < min {
            min = val;
        }
    }
    if max == min {
        return Err(GenerationError::DegenerateRange);
    }
    let range = max - min;
    for val in field.grid.values_mut() {
        *val = (*val - min) / range;
    }
    Ok(())
}
