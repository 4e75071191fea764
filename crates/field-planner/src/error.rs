use thiserror::Error;

pub type Result<T, E = PlanError> = core::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid field '{field}': {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("no field plan has been submitted")]
    PlanNotAvailable,
    #[error("invalid instruction string: {0}")]
    InvalidInstruction(String),
}

impl PlanError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PlanError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field for validation failures
    pub fn field(&self) -> Option<&'static str> {
        match self {
            PlanError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
