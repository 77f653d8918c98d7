//! Fast bounding-box fit along the principal axis.

use super::{snap_to_grid, ColourFit};
use crate::colour_block::{write_colour_block3, write_colour_block4};
use crate::colour_set::ColourSet;
use crate::math::{compute_principal_component, compute_weighted_covariance, Vec3};

/// Single-pass endpoint approximation.
///
/// Projects every point onto the principal axis, takes the projection
/// extremes as endpoints, snaps them to the 5:6:5 lattice and assigns
/// each point to its nearest palette entry under the error metric. Lower
/// quality than [`super::ClusterFit`], but O(n) with no iteration.
pub(crate) struct RangeFit<'a> {
    colours: &'a ColourSet,
    is_bc1: bool,
    metric: Vec3,
    best_error: f32,
}

impl<'a> RangeFit<'a> {
    pub(crate) fn new(colours: &'a ColourSet, is_bc1: bool, weights: [f32; 3]) -> Self {
        Self {
            colours,
            is_bc1,
            metric: Vec3::new(weights[0], weights[1], weights[2]),
            best_error: f32::MAX,
        }
    }

    /// Summed metric-weighted squared error of the last compression.
    #[cfg(test)]
    pub(crate) fn error(&self) -> f32 {
        self.best_error
    }
}

impl ColourFit for RangeFit<'_> {
    fn compress(&mut self, block: &mut [u8; 8]) {
        let points = self.colours.points();
        let weights = self.colours.weights();

        if points.is_empty() {
            // Every pixel was excluded: a BC1 block below the alpha
            // cutoff, or a fully masked-out block of any format. For
            // BC1, three-colour mode keeps the forced index 3 slots
            // decoding as transparent black; otherwise any well-formed
            // block will do since every slot is a don't-care.
            let source = [0u8; 16];
            let mut indices = [0u8; 16];
            self.colours.remap_indices(&source, &mut indices);
            if self.is_bc1 {
                write_colour_block3(Vec3::default(), Vec3::default(), &indices, block);
            } else {
                write_colour_block4(Vec3::default(), Vec3::default(), &indices, block);
            }
            self.best_error = 0.0;
            return;
        }

        let covariance = compute_weighted_covariance(points, weights);
        let principle = compute_principal_component(&covariance);

        // Projection extremes become the endpoints.
        let mut start = points[0];
        let mut end = points[0];
        let mut min = points[0].dot(principle);
        let mut max = min;
        for point in &points[1..] {
            let projection = point.dot(principle);
            if projection < min {
                start = *point;
                min = projection;
            } else if projection > max {
                end = *point;
                max = projection;
            }
        }

        let start = snap_to_grid(start);
        let end = snap_to_grid(end);

        // Transparent BC1 blocks must serialize in three-colour mode so
        // the forced index 3 slots decode as transparent black.
        let three_mode = self.is_bc1 && self.colours.is_transparent();
        let codes = if three_mode {
            [start, end, (start + end) * 0.5, (start + end) * 0.5]
        } else {
            [
                start,
                end,
                start * (2.0 / 3.0) + end * (1.0 / 3.0),
                start * (1.0 / 3.0) + end * (2.0 / 3.0),
            ]
        };
        let code_count = if three_mode { 3 } else { 4 };

        let mut closest = [0u8; 16];
        let mut error = 0.0f32;
        for (i, point) in points.iter().enumerate() {
            let mut best_distance = f32::MAX;
            let mut best_index = 0u8;
            for (j, code) in codes.iter().take(code_count).enumerate() {
                let distance = ((*point - *code) * self.metric).length_squared();
                if distance < best_distance {
                    best_distance = distance;
                    best_index = j as u8;
                }
            }
            closest[i] = best_index;
            error += best_distance;
        }
        self.best_error = error;

        let mut indices = [0u8; 16];
        self.colours.remap_indices(&closest, &mut indices);
        if three_mode {
            write_colour_block3(start, end, &indices, block);
        } else {
            write_colour_block4(start, end, &indices, block);
        }
    }
}
