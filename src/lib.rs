pub mod config;
pub mod error;
pub mod optimize;
pub mod results;
pub mod segmentation;
pub mod types;

pub use config::{AdamConfig, FitConfig};
pub use error::PhonationError;
pub use optimize::fit::{FitResult, VocalFoldFitter, VocalFoldFitterBuilder};
pub use optimize::{StepKind, UpdateRule};
pub use results::{best_parameters, BestFit, ExperimentRun, ExperimentSummary, ParameterEstimate};
pub use types::{Gradient, Interval, OptimizerState, ParameterVector, SampleRange, TimeRange};
