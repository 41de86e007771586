use serde::Serialize;

use crate::config::FitConfig;
use crate::error::PhonationError;
use crate::optimize::adam::AdamStep;
use crate::optimize::{BoundedAdaptiveStep, GradientStep, StepKind, UpdateRule};
use crate::types::{Gradient, OptimizerState, ParameterVector};

pub struct VocalFoldFitterBuilder {
    config: FitConfig,
    update_rule: Option<Box<dyn UpdateRule>>,
}

impl VocalFoldFitterBuilder {
    pub fn new(config: FitConfig) -> Self {
        Self {
            config,
            update_rule: None,
        }
    }

    /// Override the rule the fitter would otherwise derive from
    /// `config.step_kind`.
    pub fn with_update_rule(mut self, update_rule: Box<dyn UpdateRule>) -> Self {
        self.update_rule = Some(update_rule);
        self
    }

    pub fn build(self) -> Result<VocalFoldFitter, PhonationError> {
        if self.config.max_iterations == 0 {
            return Err(PhonationError::invalid_input(
                "max_iterations must be at least 1",
            ));
        }
        if !self.config.residual_tolerance.is_finite() || self.config.residual_tolerance < 0.0 {
            return Err(PhonationError::invalid_input(format!(
                "residual_tolerance must be finite and non-negative, got {}",
                self.config.residual_tolerance
            )));
        }

        let update_rule = self
            .update_rule
            .unwrap_or_else(|| default_update_rule(&self.config));

        Ok(VocalFoldFitter {
            update_rule,
            max_iterations: self.config.max_iterations,
            residual_tolerance: self.config.residual_tolerance,
        })
    }
}

fn default_update_rule(config: &FitConfig) -> Box<dyn UpdateRule> {
    match config.step_kind {
        StepKind::Gradient => Box::new(GradientStep {
            stepsize: config.stepsize,
        }),
        StepKind::BoundedAdaptive => Box::new(BoundedAdaptiveStep {
            default_step: config.default_step,
        }),
        StepKind::Adam => Box::new(AdamStep {
            config: config.adam,
        }),
    }
}

/// Drives a parameter vector toward a residual minimum.
///
/// The residual and its gradient come from the forward-model collaborator,
/// invoked once per iteration; the fitter owns the iteration budget, the
/// residual trace, and convergence detection.
pub struct VocalFoldFitter {
    update_rule: Box<dyn UpdateRule>,
    max_iterations: u32,
    residual_tolerance: f64,
}

/// Outcome of one optimization run, destined for the persistence
/// collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct FitResult {
    pub params: ParameterVector,
    /// Residual at the last evaluation.
    pub residual: f64,
    /// Residual recorded at every evaluation, in iteration order.
    pub residual_trace: Vec<f64>,
    pub iterations: u32,
    pub converged: bool,
}

impl VocalFoldFitter {
    /// Fit starting from `initial`, calling `residual_and_gradient` once per
    /// iteration.
    ///
    /// The run stops when the gradient degenerates to exactly zero in every
    /// component (a stationary point; the bounded rule would otherwise
    /// produce a non-finite stepsize), when the residual change between
    /// consecutive iterations drops below the configured tolerance, or when
    /// the iteration budget is exhausted.
    pub fn fit<F>(&self, initial: ParameterVector, mut residual_and_gradient: F) -> FitResult
    where
        F: FnMut(&ParameterVector) -> (f64, Gradient),
    {
        let mut params = initial;
        let mut state = OptimizerState::zeroed();
        let mut residual_trace = Vec::new();
        let mut previous_residual: Option<f64> = None;
        let mut converged = false;

        for itr in 1..=self.max_iterations {
            let (residual, gradient) = residual_and_gradient(&params);
            residual_trace.push(residual);
            tracing::debug!(
                itr,
                residual,
                alpha = params.alpha,
                beta = params.beta,
                delta = params.delta,
                "vocal-fold fit step"
            );

            if gradient.is_zero() {
                converged = true;
                break;
            }
            if let Some(previous) = previous_residual {
                if (previous - residual).abs() < self.residual_tolerance {
                    converged = true;
                    break;
                }
            }
            previous_residual = Some(residual);

            state.itr += 1;
            params = self.update_rule.update(params, gradient, &mut state);
        }

        if !converged {
            tracing::warn!(
                max_iterations = self.max_iterations,
                "fit exhausted its iteration budget without converging"
            );
        }

        FitResult {
            params,
            residual: residual_trace.last().copied().unwrap_or(f64::INFINITY),
            iterations: residual_trace.len() as u32,
            residual_trace,
            converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Separable quadratic bowl with its minimum at `target`.
    fn quadratic(
        target: ParameterVector,
    ) -> impl FnMut(&ParameterVector) -> (f64, Gradient) {
        move |p| {
            let (da, db, dd) = (
                p.alpha - target.alpha,
                p.beta - target.beta,
                p.delta - target.delta,
            );
            let residual = da * da + db * db + dd * dd;
            (residual, Gradient::new(2.0 * da, 2.0 * db, 2.0 * dd))
        }
    }

    #[test]
    fn builder_rejects_zero_iteration_budget() {
        let config = FitConfig {
            max_iterations: 0,
            ..FitConfig::default()
        };
        assert!(VocalFoldFitterBuilder::new(config).build().is_err());
    }

    #[test]
    fn builder_rejects_negative_tolerance() {
        let config = FitConfig {
            residual_tolerance: -1.0,
            ..FitConfig::default()
        };
        assert!(VocalFoldFitterBuilder::new(config).build().is_err());
    }

    #[test]
    fn gradient_descent_converges_on_quadratic() {
        let config = FitConfig {
            step_kind: StepKind::Gradient,
            max_iterations: 1000,
            ..FitConfig::default()
        };
        let fitter = VocalFoldFitterBuilder::new(config).build().unwrap();
        let target = ParameterVector::new(0.6, 0.3, 1.2);
        let result = fitter.fit(ParameterVector::new(1.0, 1.0, 1.0), quadratic(target));

        assert!(result.converged);
        assert!(result.residual < 1e-4, "residual {}", result.residual);
        assert!((result.params.alpha - target.alpha).abs() < 0.05);
        assert!((result.params.beta - target.beta).abs() < 0.05);
        assert!((result.params.delta - target.delta).abs() < 0.05);
    }

    #[test]
    fn zero_gradient_is_a_convergence_signal() {
        let config = FitConfig {
            step_kind: StepKind::BoundedAdaptive,
            ..FitConfig::default()
        };
        let fitter = VocalFoldFitterBuilder::new(config).build().unwrap();
        let start = ParameterVector::new(0.9, 1.1, 1.0);
        let result = fitter.fit(start, |_| (0.25, Gradient::new(0.0, 0.0, 0.0)));

        assert!(result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.params, start);
        assert_eq!(result.residual_trace, vec![0.25]);
    }

    #[test]
    fn budget_exhaustion_reports_not_converged() {
        let config = FitConfig {
            step_kind: StepKind::Gradient,
            max_iterations: 5,
            residual_tolerance: 0.0,
            ..FitConfig::default()
        };
        let fitter = VocalFoldFitterBuilder::new(config).build().unwrap();
        // Residual strictly decreases forever, so no stopping rule fires.
        let mut k = 0.0f64;
        let result = fitter.fit(ParameterVector::new(1.0, 1.0, 1.0), |_| {
            k += 1.0;
            (1.0 / k, Gradient::new(0.1, 0.1, 0.1))
        });

        assert!(!result.converged);
        assert_eq!(result.iterations, 5);
        assert_eq!(result.residual_trace.len(), 5);
    }

    #[test]
    fn residual_trace_records_every_evaluation_in_order() {
        let config = FitConfig {
            step_kind: StepKind::Gradient,
            max_iterations: 50,
            residual_tolerance: 1e-3,
            ..FitConfig::default()
        };
        let fitter = VocalFoldFitterBuilder::new(config).build().unwrap();
        let target = ParameterVector::new(0.5, 0.5, 0.5);
        let result = fitter.fit(ParameterVector::new(1.0, 1.0, 1.0), quadratic(target));

        assert_eq!(result.iterations as usize, result.residual_trace.len());
        assert_eq!(result.residual, *result.residual_trace.last().unwrap());
        for pair in result.residual_trace.windows(2) {
            assert!(pair[1] <= pair[0], "residual increased: {:?}", pair);
        }
    }

    #[test]
    fn custom_update_rule_overrides_step_kind() {
        struct Freeze;
        impl UpdateRule for Freeze {
            fn update(
                &self,
                params: ParameterVector,
                _gradient: Gradient,
                _state: &mut OptimizerState,
            ) -> ParameterVector {
                params
            }
        }

        let config = FitConfig {
            max_iterations: 3,
            residual_tolerance: 0.0,
            ..FitConfig::default()
        };
        let fitter = VocalFoldFitterBuilder::new(config)
            .with_update_rule(Box::new(Freeze))
            .build()
            .unwrap();
        let start = ParameterVector::new(0.4, 0.4, 0.4);
        let result = fitter.fit(start, |p| {
            (p.alpha, Gradient::new(1.0, 1.0, 1.0))
        });
        assert_eq!(result.params, start);
    }
}
