//! Small fixed-size vector and matrix helpers for the block fitters.
//!
//! Pure functions over 3- and 4-component `f32` vectors. The fitters only
//! ever feed values derived from 8-bit channels, so `f32` is plenty.

use core::ops::{Add, AddAssign, Mul, Sub};

/// Values smaller than this are treated as zero when taking reciprocals.
///
/// Taking `1.0 / x` unguarded inside the cluster-fit solve would let an
/// infinity propagate into an error comparison and spuriously win a
/// partition, so every reciprocal in the fitters goes through
/// [`perceptible_reciprocal`] instead.
const PERCEPTIBLE_EPSILON: f32 = 1e-12;

/// Reciprocal with an epsilon floor on the magnitude of the denominator.
///
/// Preserves sign and always returns a finite value.
#[inline]
pub(crate) fn perceptible_reciprocal(value: f32) -> f32 {
    let magnitude = value.abs().max(PERCEPTIBLE_EPSILON);
    if value < 0.0 {
        -1.0 / magnitude
    } else {
        1.0 / magnitude
    }
}

/// A 3-component `f32` vector holding one colour in normalized [0,1] space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// All three components set to `value`.
    #[inline]
    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }

    /// Sum of component products.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Squared Euclidean length.
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Component-wise clamp to the unit interval.
    #[inline]
    pub fn clamp01(self) -> Self {
        Self::new(
            self.x.clamp(0.0, 1.0),
            self.y.clamp(0.0, 1.0),
            self.z.clamp(0.0, 1.0),
        )
    }

    /// Component-wise truncation toward zero.
    #[inline]
    pub fn truncate(self) -> Self {
        Self::new(self.x.trunc(), self.y.trunc(), self.z.trunc())
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Component-wise product.
impl Mul for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// A 4-component vector used by cluster-fit to carry a weighted colour
/// (`x*w, y*w, z*w`) together with its weight `w`, so partial partition
/// sums accumulate in one add.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// A weighted point: the colour scaled by its weight, weight in `w`.
    #[inline]
    pub fn weighted_point(point: Vec3, weight: f32) -> Self {
        Self::new(
            point.x * weight,
            point.y * weight,
            point.z * weight,
            weight,
        )
    }

    /// The vector part.
    #[inline]
    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl Add for Vec4 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl AddAssign for Vec4 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec4 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.w - rhs.w,
        )
    }
}

impl Mul<f32> for Vec4 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

/// Symmetric 3x3 matrix stored as the six unique entries
/// `[xx, xy, xz, yy, yz, zz]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sym3x3 {
    entries: [f32; 6],
}

impl Sym3x3 {
    /// Multiply a column vector by this matrix.
    #[inline]
    fn transform(&self, v: Vec3) -> Vec3 {
        let m = &self.entries;
        Vec3::new(
            m[0] * v.x + m[1] * v.y + m[2] * v.z,
            m[1] * v.x + m[3] * v.y + m[4] * v.z,
            m[2] * v.x + m[4] * v.y + m[5] * v.z,
        )
    }
}

/// Weighted covariance of a point set about its weighted centroid.
pub(crate) fn compute_weighted_covariance(points: &[Vec3], weights: &[f32]) -> Sym3x3 {
    debug_assert_eq!(points.len(), weights.len());

    let mut total = 0.0;
    let mut centroid = Vec3::default();
    for (point, &weight) in points.iter().zip(weights) {
        total += weight;
        centroid += *point * weight;
    }
    centroid = centroid * perceptible_reciprocal(total);

    let mut covariance = Sym3x3::default();
    for (point, &weight) in points.iter().zip(weights) {
        let a = *point - centroid;
        let b = a * weight;
        covariance.entries[0] += a.x * b.x;
        covariance.entries[1] += a.x * b.y;
        covariance.entries[2] += a.x * b.z;
        covariance.entries[3] += a.y * b.y;
        covariance.entries[4] += a.y * b.z;
        covariance.entries[5] += a.z * b.z;
    }
    covariance
}

/// Dominant eigenvector of a covariance matrix by power iteration.
///
/// Eight rounds, normalizing by the largest component magnitude each
/// round. Only the direction matters to the fitters, so the result is not
/// normalized to unit length. A zero matrix yields the zero vector, which
/// degrades the fitters to a constant ordering rather than producing
/// NaN.
pub(crate) fn compute_principal_component(matrix: &Sym3x3) -> Vec3 {
    const POWER_ITERATIONS: usize = 8;

    let mut v = Vec3::splat(1.0);
    for _ in 0..POWER_ITERATIONS {
        let w = matrix.transform(v);
        let magnitude = w.x.abs().max(w.y.abs()).max(w.z.abs());
        if magnitude < f32::MIN_POSITIVE {
            return Vec3::default();
        }
        v = w * (1.0 / magnitude);
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_goes_toward_zero() {
        let v = Vec3::new(1.9, -1.9, 0.4).truncate();
        assert_eq!(v, Vec3::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn clamp01_bounds_components() {
        let v = Vec3::new(-0.5, 0.5, 1.5).clamp01();
        assert_eq!(v, Vec3::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn perceptible_reciprocal_is_finite_at_zero() {
        assert!(perceptible_reciprocal(0.0).is_finite());
        assert!(perceptible_reciprocal(-0.0).is_finite());
        assert_eq!(perceptible_reciprocal(2.0), 0.5);
        assert_eq!(perceptible_reciprocal(-2.0), -0.5);
    }

    #[test]
    fn principal_component_tracks_dominant_axis() {
        // Points spread along x only; the dominant axis must be x.
        let points = [
            Vec3::new(0.0, 0.1, 0.1),
            Vec3::new(0.5, 0.1, 0.1),
            Vec3::new(1.0, 0.1, 0.1),
        ];
        let weights = [1.0, 1.0, 1.0];
        let covariance = compute_weighted_covariance(&points, &weights);
        let axis = compute_principal_component(&covariance);

        assert!(axis.x.abs() > 100.0 * axis.y.abs());
        assert!(axis.x.abs() > 100.0 * axis.z.abs());
    }

    #[test]
    fn principal_component_of_zero_matrix_is_finite() {
        let covariance = compute_weighted_covariance(&[Vec3::splat(0.5); 4], &[1.0; 4]);
        let axis = compute_principal_component(&covariance);
        assert!(axis.x.is_finite() && axis.y.is_finite() && axis.z.is_finite());
    }
}
