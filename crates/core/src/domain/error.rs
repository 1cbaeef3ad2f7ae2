use std::fmt;

/// Client-input failures raised by the advisory pipeline. Everything else
/// that can go wrong (table files, configuration) stays a plain anyhow error.
#[derive(Debug, Clone)]
pub enum AdvisoryError {
    /// The crop has no registered residue ratio. Never defaulted silently: a
    /// financial projection from a guessed ratio would be meaningless.
    UnsupportedCrop { crop_type: String },
    /// Malformed request values, rejected before any computation starts.
    InvalidInput { detail: String },
}

impl AdvisoryError {
    pub fn invalid_input(detail: impl Into<String>) -> Self {
        Self::InvalidInput {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for AdvisoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedCrop { crop_type } => {
                write!(f, "crop type is not supported: {crop_type}")
            }
            Self::InvalidInput { detail } => write!(f, "invalid advisory input: {detail}"),
        }
    }
}

impl std::error::Error for AdvisoryError {}
