use crate::optimize::StepKind;

/// Hyperparameters for the Adam update rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdamConfig {
    /// Learning rate.
    pub eta: f64,
    /// Decay for the gradient moving average.
    pub beta_1: f64,
    /// Decay for the squared-gradient moving average.
    pub beta_2: f64,
    /// Denominator guard.
    pub eps: f64,
}

impl AdamConfig {
    pub const DEFAULT_ETA: f64 = 0.01;
    pub const DEFAULT_BETA_1: f64 = 0.9;
    pub const DEFAULT_BETA_2: f64 = 0.999;
    pub const DEFAULT_EPS: f64 = 1e-8;
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            eta: Self::DEFAULT_ETA,
            beta_1: Self::DEFAULT_BETA_1,
            beta_2: Self::DEFAULT_BETA_2,
            eps: Self::DEFAULT_EPS,
        }
    }
}

/// Configuration for one vocal-fold parameter fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    /// Which update rule drives the fit.
    pub step_kind: StepKind,
    /// Fixed stepsize for the plain gradient rule.
    pub stepsize: f64,
    /// Numerator of the shared adaptive stepsize for the bounded rule.
    pub default_step: f64,
    pub adam: AdamConfig,
    pub max_iterations: u32,
    /// Residual-change threshold below which the fit is declared converged.
    pub residual_tolerance: f64,
}

impl FitConfig {
    pub const DEFAULT_STEPSIZE: f64 = 0.01;
    pub const DEFAULT_MAX_ITERATIONS: u32 = 500;
    pub const DEFAULT_RESIDUAL_TOLERANCE: f64 = 1e-6;
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            step_kind: StepKind::Adam,
            stepsize: Self::DEFAULT_STEPSIZE,
            default_step: Self::DEFAULT_STEPSIZE,
            adam: AdamConfig::default(),
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            residual_tolerance: Self::DEFAULT_RESIDUAL_TOLERANCE,
        }
    }
}
