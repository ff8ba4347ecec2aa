/// Scalar grid with clamped bilinear sampling, used for terrain elevation and type maps
use constants::test_pattern::sine_elevation;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeightFieldError {
    #[error("height field dimensions must be positive, got {width}x{height}")]
    EmptyDimensions { width: usize, height: usize },
    #[error("height field {width}x{height} needs {expected} samples, got {actual}")]
    LengthMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

/// Row-major grid of `f32` samples. Dimensions are fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

impl HeightField {
    /// Zero-filled field.
    ///
    /// # Panics
    /// If either dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width > 0 && height > 0,
            "height field dimensions must be positive, got {width}x{height}"
        );
        Self {
            width,
            height,
            samples: vec![0.0; width * height],
        }
    }

    pub fn from_samples(
        width: usize,
        height: usize,
        samples: Vec<f32>,
    ) -> Result<Self, HeightFieldError> {
        if width == 0 || height == 0 {
            return Err(HeightFieldError::EmptyDimensions { width, height });
        }
        let expected = width * height;
        if samples.len() != expected {
            return Err(HeightFieldError::LengthMismatch {
                width,
                height,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Rolling sine terrain used when no heightmap image is supplied.
    pub fn sine_test_pattern(width: usize, height: usize) -> Result<Self, HeightFieldError> {
        let mut field = Self::from_samples(width, height, vec![0.0; width * height])?;
        field.apply(|_, i, j| sine_elevation(i, j, width, height));
        Ok(field)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Unclamped lattice lookup. Callers clamp first; see [`HeightField::sample`].
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f32 {
        debug_assert!(i < self.width && j < self.height);
        self.samples[j * self.width + i]
    }

    #[inline]
    fn clamped_at(&self, i: i64, j: i64) -> f32 {
        let i = i.clamp(0, self.width as i64 - 1) as usize;
        let j = j.clamp(0, self.height as i64 - 1) as usize;
        self.at(i, j)
    }

    /// Bilinear sample at normalised `(u, v)`.
    ///
    /// Coordinates outside [0, 1] read the nearest edge rather than wrapping.
    /// Each of the four neighbours is also clamped to the grid, which keeps
    /// the far edge exact.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let p = u.clamp(0.0, 1.0) * (self.width - 1) as f32;
        let q = v.clamp(0.0, 1.0) * (self.height - 1) as f32;
        let i = p.floor();
        let j = q.floor();
        let s = p - i;
        let t = q - j;
        let (i, j) = (i as i64, j as i64);

        let v00 = self.clamped_at(i, j);
        let v10 = self.clamped_at(i + 1, j);
        let v01 = self.clamped_at(i, j + 1);
        let v11 = self.clamped_at(i + 1, j + 1);

        (1.0 - s) * (1.0 - t) * v00 + s * (1.0 - t) * v10 + (1.0 - s) * t * v01 + s * t * v11
    }

    /// Replace every sample with `f(value, i, j)`, visiting each cell once.
    pub fn apply(&mut self, mut f: impl FnMut(f32, usize, usize) -> f32) {
        let width = self.width;
        for (index, value) in self.samples.iter_mut().enumerate() {
            *value = f(*value, index % width, index / width);
        }
    }

    /// Smallest and largest sample.
    pub fn min_max(&self) -> (f32, f32) {
        self.samples
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &value| {
                (lo.min(value), hi.max(value))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> HeightField {
        let samples = (0..width * height)
            .map(|index| ((index * 7) % 11) as f32 - 3.5)
            .collect();
        HeightField::from_samples(width, height, samples).unwrap()
    }

    #[test]
    fn corners_are_exact() {
        let field = ramp(5, 4);
        assert_eq!(field.sample(0.0, 0.0), field.at(0, 0));
        assert_eq!(field.sample(1.0, 0.0), field.at(4, 0));
        assert_eq!(field.sample(0.0, 1.0), field.at(0, 3));
        assert_eq!(field.sample(1.0, 1.0), field.at(4, 3));
    }

    #[test]
    fn samples_stay_within_lattice_bounds() {
        let field = ramp(6, 5);
        let (lo, hi) = field.min_max();
        for step_v in 0..=40 {
            for step_u in 0..=40 {
                let value = field.sample(step_u as f32 / 40.0, step_v as f32 / 40.0);
                assert!(value >= lo - 1e-5 && value <= hi + 1e-5, "{value} outside [{lo}, {hi}]");
            }
        }
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn out_of_range_coordinates_clamp_to_edges() {
        let field = ramp(4, 4);
        for &v in &[0.0, 0.3, 0.5, 1.0] {
            assert_close(field.sample(-0.5, v), field.sample(0.0, v));
            assert_close(field.sample(1.5, v), field.sample(1.0, v));
            assert_close(field.sample(v, -0.25), field.sample(v, 0.0));
            assert_close(field.sample(v, 3.0), field.sample(v, 1.0));
        }
        assert_eq!(field.sample(-2.0, 7.0), field.at(0, 3));
    }

    #[test]
    fn huge_coordinates_clamp_without_overflow() {
        let field = ramp(4, 4);
        assert_eq!(field.sample(1.0e20, 0.5), field.sample(1.0, 0.5));
        assert_eq!(field.sample(-1.0e20, 0.5), field.sample(0.0, 0.5));
        assert_eq!(field.sample(0.25, f32::MAX), field.sample(0.25, 1.0));
        assert_eq!(field.sample(f32::MIN, f32::MIN), field.at(0, 0));
    }

    #[test]
    fn midpoint_blends_four_neighbours() {
        let field = HeightField::from_samples(2, 2, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        assert!((field.sample(0.5, 0.5) - 1.5).abs() < 1e-6);
        assert!((field.sample(0.5, 0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn single_column_field_samples_its_only_column() {
        let field = HeightField::from_samples(1, 3, vec![1.0, 2.0, 4.0]).unwrap();
        assert_eq!(field.sample(0.7, 0.5), 2.0);
        assert_eq!(field.sample(-1.0, 1.0), 4.0);
    }

    #[test]
    fn apply_visits_every_cell_once() {
        let mut field = HeightField::new(7, 3);
        let mut visits = vec![0u32; 21];
        field.apply(|value, i, j| {
            visits[j * 7 + i] += 1;
            value + 1.0
        });
        assert!(visits.iter().all(|&count| count == 1));
        assert!(field.samples().iter().all(|&value| value == 1.0));
    }

    #[test]
    fn identity_apply_leaves_samples_unchanged() {
        let mut field = ramp(5, 5);
        let before = field.clone();
        field.apply(|value, _, _| value);
        assert_eq!(field, before);
    }

    #[test]
    fn apply_passes_lattice_coordinates() {
        let mut field = HeightField::new(3, 2);
        field.apply(|_, i, j| (i + 10 * j) as f32);
        assert_eq!(field.samples(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn rejects_degenerate_construction() {
        assert_eq!(
            HeightField::from_samples(0, 4, vec![]),
            Err(HeightFieldError::EmptyDimensions { width: 0, height: 4 })
        );
        assert!(matches!(
            HeightField::from_samples(2, 2, vec![0.0; 3]),
            Err(HeightFieldError::LengthMismatch { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "dimensions must be positive")]
    fn zero_sized_field_fails_fast() {
        HeightField::new(0, 0);
    }

    #[test]
    fn sine_pattern_matches_shared_formula() {
        let field = HeightField::sine_test_pattern(16, 8).unwrap();
        assert_eq!(field.at(0, 0), 0.0);
        assert_eq!(field.at(4, 0), sine_elevation(4, 0, 16, 8));
        assert_eq!(field.at(3, 5), sine_elevation(3, 5, 16, 8));
    }

    #[test]
    fn empty_sine_pattern_is_an_error() {
        assert_eq!(
            HeightField::sine_test_pattern(0, 0),
            Err(HeightFieldError::EmptyDimensions { width: 0, height: 0 })
        );
    }
}
