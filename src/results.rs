//! Collect per-recording fit results and compare step-size experiments.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::PhonationError;
use crate::optimize::fit::FitResult;
use crate::types::ParameterVector;

/// Stored per-recording estimate, every field optional.
///
/// Result files written by interrupted or partially failed runs routinely
/// miss fields; aggregation tolerates that by skipping the record rather
/// than refusing the whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterEstimate {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub delta: Option<f64>,
    pub residual: Option<f64>,
}

impl ParameterEstimate {
    fn complete(&self) -> Option<(ParameterVector, f64)> {
        Some((
            ParameterVector::new(self.alpha?, self.beta?, self.delta?),
            self.residual?,
        ))
    }
}

impl From<&FitResult> for ParameterEstimate {
    fn from(result: &FitResult) -> Self {
        Self {
            alpha: Some(result.params.alpha),
            beta: Some(result.params.beta),
            delta: Some(result.params.delta),
            residual: Some(result.residual),
        }
    }
}

/// One experiment: every recording fit with a single step-size setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentRun {
    pub step_size: String,
    pub estimates: HashMap<String, ParameterEstimate>,
}

impl ExperimentRun {
    pub fn from_json_str(data: &str) -> Result<Self, PhonationError> {
        serde_json::from_str(data).map_err(|e| PhonationError::json("parse experiment run", e))
    }
}

/// An [`ExperimentRun`] flattened into parallel vectors over the recordings
/// that carried a complete estimate.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentSummary {
    pub step_size: String,
    pub recordings: Vec<String>,
    pub params: Vec<ParameterVector>,
    pub residuals: Vec<f64>,
}

impl ExperimentSummary {
    /// Flatten a run, skipping (and logging) every record with a missing
    /// field so one bad recording never sinks the experiment.
    pub fn collect(run: &ExperimentRun) -> Self {
        let mut ids: Vec<&String> = run.estimates.keys().collect();
        ids.sort();

        let mut recordings = Vec::with_capacity(ids.len());
        let mut params = Vec::with_capacity(ids.len());
        let mut residuals = Vec::with_capacity(ids.len());
        for id in ids {
            match run.estimates[id].complete() {
                Some((p, residual)) => {
                    recordings.push(id.clone());
                    params.push(p);
                    residuals.push(residual);
                }
                None => {
                    tracing::warn!(
                        recording = id.as_str(),
                        step_size = run.step_size.as_str(),
                        "skipping incomplete fit record"
                    );
                }
            }
        }

        Self {
            step_size: run.step_size.clone(),
            recordings,
            params,
            residuals,
        }
    }

    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }
}

/// The winning experiment for one recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestFit {
    pub step_size: String,
    pub params: ParameterVector,
    pub residual: f64,
}

/// Per recording, the parameters of the experiment with minimum residual.
///
/// A recording absent from some experiments competes only among those that
/// carried it.
pub fn best_parameters(summaries: &[ExperimentSummary]) -> HashMap<String, BestFit> {
    let mut best: HashMap<String, BestFit> = HashMap::new();
    for summary in summaries {
        for ((id, params), residual) in summary
            .recordings
            .iter()
            .zip(&summary.params)
            .zip(&summary.residuals)
        {
            let candidate = BestFit {
                step_size: summary.step_size.clone(),
                params: *params,
                residual: *residual,
            };
            match best.get(id) {
                Some(current) if current.residual <= candidate.residual => {}
                _ => {
                    best.insert(id.clone(), candidate);
                }
            }
        }
    }
    best
}
