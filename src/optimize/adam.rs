use crate::config::AdamConfig;
use crate::optimize::UpdateRule;
use crate::types::{Gradient, OptimizerState, ParameterVector};

/// One scalar Adam update.
///
/// `itr` is 1-based and owned by the caller, which increments it before each
/// call; passing 0 would zero out the bias-correction denominators. Returns
/// the updated parameter together with the new moment estimates for the
/// caller to persist. No bounds are enforced here: clamping a parameter back
/// into a physically valid range is the caller's business.
pub fn adam_update(
    p: f64,
    dp: f64,
    m_t: f64,
    v_t: f64,
    itr: u32,
    config: &AdamConfig,
) -> (f64, f64, f64) {
    let m_t = config.beta_1 * m_t + (1.0 - config.beta_1) * dp;
    let v_t = config.beta_2 * v_t + (1.0 - config.beta_2) * (dp * dp);
    // Correct the zero-initialization bias of both moving averages.
    let m_hat = m_t / (1.0 - config.beta_1.powi(itr as i32));
    let v_hat = v_t / (1.0 - config.beta_2.powi(itr as i32));
    let p = p - (config.eta * m_hat) / (v_hat.sqrt() + config.eps);
    (p, m_t, v_t)
}

/// Adam applied to each of the three parameters independently, with the
/// moment estimates persisted in the run's [`OptimizerState`].
pub struct AdamStep {
    pub config: AdamConfig,
}

impl UpdateRule for AdamStep {
    fn update(
        &self,
        params: ParameterVector,
        gradient: Gradient,
        state: &mut OptimizerState,
    ) -> ParameterVector {
        let itr = state.itr;
        let (alpha, m_alpha, v_alpha) = adam_update(
            params.alpha,
            gradient.d_alpha,
            state.m.alpha,
            state.v.alpha,
            itr,
            &self.config,
        );
        let (beta, m_beta, v_beta) = adam_update(
            params.beta,
            gradient.d_beta,
            state.m.beta,
            state.v.beta,
            itr,
            &self.config,
        );
        let (delta, m_delta, v_delta) = adam_update(
            params.delta,
            gradient.d_delta,
            state.m.delta,
            state.v.delta,
            itr,
            &self.config,
        );

        state.m = ParameterVector::new(m_alpha, m_beta, m_delta);
        state.v = ParameterVector::new(v_alpha, v_beta, v_delta);
        ParameterVector::new(alpha, beta, delta)
    }
}
