//! Compression parameters with convenient configuration methods.

use dxt_block_codec::{Algorithm, Params};

/// Image-level compression parameters.
///
/// A thin wrapper over [`dxt_block_codec::Params`] with chained
/// configuration methods; the defaults match the block codec's.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CodecParams {
    inner: Params,
}

impl CodecParams {
    /// Create parameters with the default quality settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the colour fitter.
    ///
    /// [`Algorithm::ClusterFit`] (default) is a good quality/speed
    /// trade-off; [`Algorithm::RangeFit`] is much faster and visibly
    /// worse; [`Algorithm::IterativeClusterFit`] squeezes out a little
    /// more quality at several times the cost.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.inner.algorithm = algorithm;
        self
    }

    /// Set the per-channel error metric weights.
    pub fn with_weights(mut self, weights: [f32; 3]) -> Self {
        self.inner.weights = weights;
        self
    }

    /// Weight each colour's influence by its alpha value.
    pub fn with_weigh_colour_by_alpha(mut self, enabled: bool) -> Self {
        self.inner.weigh_colour_by_alpha = enabled;
        self
    }

    /// The underlying block codec parameters.
    pub fn into_inner(self) -> Params {
        self.inner
    }
}

impl From<Params> for CodecParams {
    fn from(inner: Params) -> Self {
        Self { inner }
    }
}
