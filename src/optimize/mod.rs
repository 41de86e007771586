//! Gradient-based update rules for fitting the vocal-fold model parameters.

pub mod adam;
pub mod fit;

use crate::types::{Gradient, OptimizerState, ParameterVector};

/// Physical validity range for the vocal-fold parameters, enforced by the
/// bounded rule only. The interval is open on both ends.
const PARAM_LOWER: f64 = 0.0;
const PARAM_UPPER: f64 = 2.0;

/// Update-rule selection, resolved to a concrete rule at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Fixed-stepsize gradient descent.
    Gradient,
    /// Shared adaptive stepsize, updates committed only inside (0, 2).
    BoundedAdaptive,
    /// Bias-corrected moment estimates per parameter.
    Adam,
}

/// One parameter-update step.
///
/// A rule is a pure function of its explicit inputs: given the current
/// parameters, the residual gradient, and the run's optimizer state, it
/// returns the next parameters and leaves any persistent state in `state`.
/// Rules never detect convergence; that belongs to the fit loop.
pub trait UpdateRule: Send + Sync {
    fn update(
        &self,
        params: ParameterVector,
        gradient: Gradient,
        state: &mut OptimizerState,
    ) -> ParameterVector;
}

/// Plain gradient descent with a fixed, caller-supplied stepsize.
pub struct GradientStep {
    pub stepsize: f64,
}

impl UpdateRule for GradientStep {
    fn update(
        &self,
        params: ParameterVector,
        gradient: Gradient,
        _state: &mut OptimizerState,
    ) -> ParameterVector {
        ParameterVector {
            alpha: params.alpha - self.stepsize * gradient.d_alpha,
            beta: params.beta - self.stepsize * gradient.d_beta,
            delta: params.delta - self.stepsize * gradient.d_delta,
        }
    }
}

/// Gradient descent with one shared stepsize adapted to the largest gradient
/// magnitude, guarding against divergence when gradients are large.
///
/// Each parameter's update is committed only if the proposed value stays
/// strictly inside (0, 2); a proposal outside the range leaves that parameter
/// unchanged for the iteration. When all three gradient components are zero
/// the stepsize is non-finite and every proposal fails the range check, so
/// the parameters come back unchanged; the fit loop treats the all-zero
/// gradient as a convergence signal before ever reaching this rule.
pub struct BoundedAdaptiveStep {
    pub default_step: f64,
}

impl UpdateRule for BoundedAdaptiveStep {
    fn update(
        &self,
        params: ParameterVector,
        gradient: Gradient,
        _state: &mut OptimizerState,
    ) -> ParameterVector {
        let stepsize = self.default_step / gradient.max_abs();
        let mut next = params;

        let alpha = params.alpha - stepsize * gradient.d_alpha;
        if alpha > PARAM_LOWER && alpha < PARAM_UPPER {
            next.alpha = alpha;
        }

        let beta = params.beta - stepsize * gradient.d_beta;
        if beta > PARAM_LOWER && beta < PARAM_UPPER {
            next.beta = beta;
        }

        let delta = params.delta - stepsize * gradient.d_delta;
        if delta > PARAM_LOWER && delta < PARAM_UPPER {
            next.delta = delta;
        }

        next
    }
}
