use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhonationError {
    #[error("invalid interval: t_min {t_min} exceeds t_max {t_max}")]
    InvalidInterval { t_min: f64, t_max: f64 },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("sample range {i_min}..{i_max} exceeds waveform of {len} samples")]
    SampleRangeOutOfBounds {
        i_min: usize,
        i_max: usize,
        len: usize,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl PhonationError {
    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
