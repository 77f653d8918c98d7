//! Iterative cluster fit: exhaustive contiguous-partition search.
//!
//! Points are ordered along the principal axis, then every way of
//! cutting the ordered list into four runs is evaluated with a
//! closed-form weighted least-squares solve. The best endpoints found
//! re-derive the axis and the search repeats, up to a fixed iteration
//! cap, with cycle detection on the orderings.
//!
//! The search over the outer split index is embarrassingly parallel and
//! runs on rayon under the `multithreaded` feature. Candidates are
//! reduced by error with ties broken by the lexicographically smallest
//! split triple, so serial and parallel runs produce identical bytes.

use super::{snap_to_grid, ColourFit};
use crate::colour_block::{write_colour_block3, write_colour_block4};
use crate::colour_set::ColourSet;
use crate::math::{
    compute_principal_component, compute_weighted_covariance, perceptible_reciprocal, Vec3, Vec4,
};

#[cfg(feature = "multithreaded")]
use rayon::prelude::*;

/// Hard cap on axis re-derivation rounds.
const MAX_ITERATIONS: usize = 8;

/// One evaluated partition: its quantized endpoints, its error under the
/// weighted objective, and the split triple that produced it.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    error: f32,
    splits: (usize, usize, usize),
    start: Vec3,
    end: Vec3,
}

impl Candidate {
    fn worst() -> Self {
        Self {
            error: f32::MAX,
            splits: (usize::MAX, usize::MAX, usize::MAX),
            start: Vec3::default(),
            end: Vec3::default(),
        }
    }

    /// Strictly better, or equal error with a smaller split triple.
    fn beats(&self, other: &Self) -> bool {
        self.error < other.error || (self.error == other.error && self.splits < other.splits)
    }
}

/// Points reordered along the current axis, with per-position weighted
/// sums ready for partition evaluation.
struct Ordering {
    order: [u8; 16],
    points: [Vec3; 16],
    weights: [f32; 16],
    /// Prefix sums of `(w*x, w*y, w*z, w)`; `prefix[m]` covers positions
    /// `0..m`.
    prefix: [Vec4; 17],
    count: usize,
}

impl Ordering {
    /// Orders the point set by projection onto `axis` with a stable
    /// insertion sort. Returns `None` when the resulting order matches a
    /// previous iteration's order, which means the axis has stopped
    /// moving the points around and further iteration would cycle.
    fn construct(
        points: &[Vec3],
        weights: &[f32],
        axis: Vec3,
        previous: &[Ordering],
    ) -> Option<Self> {
        let count = points.len();
        let mut projections = [0.0f32; 16];
        let mut order = [0u8; 16];

        for i in 0..count {
            projections[i] = points[i].dot(axis);
            order[i] = i as u8;
            let mut j = i;
            while j > 0 && projections[j] < projections[j - 1] {
                projections.swap(j, j - 1);
                order.swap(j, j - 1);
                j -= 1;
            }
        }

        if previous.iter().any(|p| p.order[..count] == order[..count]) {
            return None;
        }

        let mut ordered = Self {
            order,
            points: [Vec3::default(); 16],
            weights: [0.0; 16],
            prefix: [Vec4::default(); 17],
            count,
        };
        for m in 0..count {
            let p = points[order[m] as usize];
            let w = weights[order[m] as usize];
            ordered.points[m] = p;
            ordered.weights[m] = w;
            ordered.prefix[m + 1] = ordered.prefix[m] + Vec4::weighted_point(p, w);
        }
        Some(ordered)
    }

    #[inline]
    fn partial_sum(&self, from: usize, to: usize) -> Vec4 {
        self.prefix[to] - self.prefix[from]
    }
}

/// Exhaustive partition search along an evolving principal axis.
pub(crate) struct ClusterFit<'a> {
    colours: &'a ColourSet,
    metric: Vec3,
    max_iterations: usize,
    /// Transparent BC1 blocks search three-colour partitions and
    /// serialize in three-colour mode, so the forced index 3 slots
    /// decode as transparent black.
    three_mode: bool,
    best_error: f32,
}

impl<'a> ClusterFit<'a> {
    /// `iterate` enables axis re-derivation up to the iteration cap;
    /// without it a single pass over the initial principal axis is made.
    pub(crate) fn new(colours: &'a ColourSet, weights: [f32; 3], iterate: bool) -> Self {
        Self {
            colours,
            metric: Vec3::new(weights[0], weights[1], weights[2]),
            max_iterations: if iterate { MAX_ITERATIONS } else { 1 },
            three_mode: colours.is_transparent(),
            best_error: f32::MAX,
        }
    }

    /// Summed metric-weighted squared error of the last compression.
    #[cfg(test)]
    pub(crate) fn error(&self) -> f32 {
        self.best_error
    }

    fn best_for_outer_split(&self, ordered: &Ordering, i: usize) -> Candidate {
        if self.three_mode {
            self.best_three_for_outer_split(ordered, i)
        } else {
            self.best_four_for_outer_split(ordered, i)
        }
    }

    /// Evaluates every `j` for a fixed outer split `i` over the
    /// three-colour palette. Partition layout over ordered positions:
    /// `[0,i) -> index 0, [i,j) -> index 2 (the midpoint),
    /// [j,count) -> index 1`.
    fn best_three_for_outer_split(&self, ordered: &Ordering, i: usize) -> Candidate {
        let count = ordered.count;
        let total = ordered.prefix[count];
        let mut best = Candidate::worst();

        for j in i..=count {
            let part0 = ordered.prefix[i];
            let part1 = ordered.partial_sum(i, j);
            let part2 = total - ordered.prefix[j];

            // Closed-form weighted least squares with the interpolated
            // entry pinned to the midpoint.
            let alphax = part0.xyz() + part1.xyz() * 0.5;
            let alpha2 = part0.w + part1.w * 0.25;
            let betax = part2.xyz() + part1.xyz() * 0.5;
            let beta2 = part2.w + part1.w * 0.25;
            let alphabeta = part1.w * 0.25;

            let factor = perceptible_reciprocal(alpha2 * beta2 - alphabeta * alphabeta);
            let start = snap_to_grid((alphax * beta2 - betax * alphabeta) * factor);
            let end = snap_to_grid((betax * alpha2 - alphax * alphabeta) * factor);

            let codes = [start, end, (start + end) * 0.5];
            let error = self.partition_error(ordered, &codes, |m| partition_code3(m, i, j));
            let candidate = Candidate {
                error,
                splits: (i, j, count),
                start,
                end,
            };
            if candidate.beats(&best) {
                best = candidate;
            }
        }

        best
    }

    /// Evaluates every `(j, k)` for a fixed outer split `i`, returning
    /// the best candidate. Partition layout over ordered positions:
    /// `[0,i) -> index 0, [i,j) -> index 2, [j,k) -> index 3,
    /// [k,count) -> index 1`, matching the 1/3-2/3 interpolation order.
    fn best_four_for_outer_split(&self, ordered: &Ordering, i: usize) -> Candidate {
        let count = ordered.count;
        let total = ordered.prefix[count];
        let mut best = Candidate::worst();

        for j in i..=count {
            for k in j..=count {
                let part0 = ordered.prefix[i];
                let part1 = ordered.partial_sum(i, j);
                let part2 = ordered.partial_sum(j, k);
                let part3 = total - ordered.prefix[k];

                // Closed-form weighted least squares for the two
                // endpoints, with palette positions 0, 1/3, 2/3, 1 along
                // the start->end line.
                let alphax = part0.xyz() + part1.xyz() * (2.0 / 3.0) + part2.xyz() * (1.0 / 3.0);
                let alpha2 = part0.w + part1.w * (4.0 / 9.0) + part2.w * (1.0 / 9.0);
                let betax = part3.xyz() + part2.xyz() * (2.0 / 3.0) + part1.xyz() * (1.0 / 3.0);
                let beta2 = part3.w + part2.w * (4.0 / 9.0) + part1.w * (1.0 / 9.0);
                let alphabeta = (part1.w + part2.w) * (2.0 / 9.0);

                let factor = perceptible_reciprocal(alpha2 * beta2 - alphabeta * alphabeta);
                let start = (alphax * beta2 - betax * alphabeta) * factor;
                let end = (betax * alpha2 - alphax * alphabeta) * factor;

                let start = snap_to_grid(start);
                let end = snap_to_grid(end);

                let codes = [
                    start,
                    end,
                    start * (2.0 / 3.0) + end * (1.0 / 3.0),
                    start * (1.0 / 3.0) + end * (2.0 / 3.0),
                ];
                let error = self.partition_error(ordered, &codes, |m| partition_code(m, i, j, k));
                let candidate = Candidate {
                    error,
                    splits: (i, j, k),
                    start,
                    end,
                };
                if candidate.beats(&best) {
                    best = candidate;
                }
            }
        }

        best
    }

    /// Error of one partition against the quantized palette, under the
    /// same weighted objective the solve minimizes.
    fn partition_error(
        &self,
        ordered: &Ordering,
        codes: &[Vec3],
        assign: impl Fn(usize) -> u8,
    ) -> f32 {
        let mut error = 0.0f32;
        for m in 0..ordered.count {
            let code = codes[assign(m) as usize];
            let delta = (ordered.points[m] - code) * self.metric;
            error += ordered.weights[m] * delta.length_squared();
        }
        error
    }

    fn search(&self, ordered: &Ordering) -> Candidate {
        let count = ordered.count;

        #[cfg(feature = "multithreaded")]
        return (0..=count)
            .into_par_iter()
            .map(|i| self.best_for_outer_split(ordered, i))
            .reduce(Candidate::worst, |a, b| if b.beats(&a) { b } else { a });

        #[cfg(not(feature = "multithreaded"))]
        {
            let mut best = Candidate::worst();
            for i in 0..=count {
                let candidate = self.best_for_outer_split(ordered, i);
                if candidate.beats(&best) {
                    best = candidate;
                }
            }
            best
        }
    }
}

/// Palette index for ordered position `m` under splits `(i, j, k)`.
#[inline]
fn partition_code(m: usize, i: usize, j: usize, k: usize) -> u8 {
    if m < i {
        0
    } else if m < j {
        2
    } else if m < k {
        3
    } else {
        1
    }
}

/// Three-colour palette index for ordered position `m` under splits
/// `(i, j)`.
#[inline]
fn partition_code3(m: usize, i: usize, j: usize) -> u8 {
    if m < i {
        0
    } else if m < j {
        2
    } else {
        1
    }
}

impl ColourFit for ClusterFit<'_> {
    fn compress(&mut self, block: &mut [u8; 8]) {
        let points = self.colours.points();
        let weights = self.colours.weights();
        debug_assert!(points.len() > 1);

        let covariance = compute_weighted_covariance(points, weights);
        let mut axis = compute_principal_component(&covariance);

        let mut orderings: Vec<Ordering> = Vec::with_capacity(self.max_iterations);
        let mut best = Candidate::worst();
        let mut best_iteration = 0;

        for iteration in 0..self.max_iterations {
            let Some(ordered) = Ordering::construct(points, weights, axis, &orderings) else {
                break; // ordering already tried: a cycle
            };

            let candidate = self.search(&ordered);
            if candidate.error < best.error {
                best = candidate;
                best_iteration = iteration;
            }
            orderings.push(ordered);

            // Only keep iterating while this round improved the result.
            if best_iteration != iteration {
                break;
            }
            axis = best.end - best.start;
        }

        self.best_error = best.error;

        // Assign palette indices from the winning partition, then put
        // the points back in their original positions.
        let ordered = &orderings[best_iteration];
        let (i, j, k) = best.splits;
        let mut source = [0u8; 16];
        for m in 0..ordered.count {
            source[ordered.order[m] as usize] = if self.three_mode {
                partition_code3(m, i, j)
            } else {
                partition_code(m, i, j, k)
            };
        }

        let mut indices = [0u8; 16];
        self.colours.remap_indices(&source, &mut indices);
        if self.three_mode {
            write_colour_block3(best.start, best.end, &indices, block);
        } else {
            write_colour_block4(best.start, best.end, &indices, block);
        }
    }
}
