use serde::{Deserialize, Serialize};

use crate::error::PhonationError;

/// Half-open time range [t_min, t_max) in seconds, tagged with a tier label
/// (phone identity, or a creaky/non-creaky marker).
///
/// Immutable once constructed; `new` rejects malformed boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    t_min: f64,
    t_max: f64,
    label: String,
}

impl Interval {
    pub fn new(t_min: f64, t_max: f64, label: impl Into<String>) -> Result<Self, PhonationError> {
        if !t_min.is_finite() || !t_max.is_finite() {
            return Err(PhonationError::invalid_input(format!(
                "interval boundaries must be finite, got [{t_min}, {t_max}]"
            )));
        }
        if t_min > t_max {
            return Err(PhonationError::InvalidInterval { t_min, t_max });
        }
        Ok(Self {
            t_min,
            t_max,
            label: label.into(),
        })
    }

    pub fn t_min(&self) -> f64 {
        self.t_min
    }

    pub fn t_max(&self) -> f64 {
        self.t_max
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn range(&self) -> TimeRange {
        TimeRange {
            t_min: self.t_min,
            t_max: self.t_max,
        }
    }
}

/// Unlabeled time range in seconds. Phone occurrences and the segments cut
/// out of them are plain ranges once the label has served its purpose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeRange {
    pub t_min: f64,
    pub t_max: f64,
}

impl TimeRange {
    pub fn duration(&self) -> f64 {
        self.t_max - self.t_min
    }
}

/// Time range converted to waveform sample indices.
///
/// `i_min`/`i_max` are not clamped against any waveform length; callers must
/// bounds-check before slicing (see `segmentation::slice_waveform`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleRange {
    pub i_min: usize,
    pub i_max: usize,
}

impl SampleRange {
    pub fn len(&self) -> usize {
        self.i_max.saturating_sub(self.i_min)
    }

    pub fn is_empty(&self) -> bool {
        self.i_max <= self.i_min
    }
}

/// The three biomechanical vocal-fold model parameters under estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterVector {
    pub alpha: f64,
    pub beta: f64,
    pub delta: f64,
}

impl ParameterVector {
    pub const ZERO: Self = Self {
        alpha: 0.0,
        beta: 0.0,
        delta: 0.0,
    };

    pub fn new(alpha: f64, beta: f64, delta: f64) -> Self {
        Self { alpha, beta, delta }
    }
}

/// Partial derivatives of the forward-model residual with respect to each
/// parameter, supplied by the forward-model collaborator once per iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub d_alpha: f64,
    pub d_beta: f64,
    pub d_delta: f64,
}

impl Gradient {
    pub fn new(d_alpha: f64, d_beta: f64, d_delta: f64) -> Self {
        Self {
            d_alpha,
            d_beta,
            d_delta,
        }
    }

    /// Largest gradient magnitude across the three components.
    pub fn max_abs(&self) -> f64 {
        self.d_alpha.abs().max(self.d_beta.abs()).max(self.d_delta.abs())
    }

    pub fn is_zero(&self) -> bool {
        self.d_alpha == 0.0 && self.d_beta == 0.0 && self.d_delta == 0.0
    }
}

/// Mutable state carried across update calls for the life of one
/// optimization run.
///
/// `m` and `v` hold the per-parameter first and second moment estimates; only
/// the Adam rule reads or writes them, the stateless rules pass the state
/// through untouched. `itr` is 1-based and incremented by the fit loop before
/// each update call, never by the rule itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OptimizerState {
    pub m: ParameterVector,
    pub v: ParameterVector,
    pub itr: u32,
}

impl OptimizerState {
    pub fn zeroed() -> Self {
        Self {
            m: ParameterVector::ZERO,
            v: ParameterVector::ZERO,
            itr: 0,
        }
    }
}

impl Default for ParameterVector {
    fn default() -> Self {
        Self::ZERO
    }
}
