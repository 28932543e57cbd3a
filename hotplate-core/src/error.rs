use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeatError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Field shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Non-finite temperature after step {step} at (i={i}, j={j})")]
    Diverged { step: usize, i: usize, j: usize },
}

pub type HeatResult<T> = Result<T, HeatError>;

pub(crate) fn require_finite(name: &str, value: f64) -> HeatResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(HeatError::Precondition(format!("{name} must be finite, got {value}")))
    }
}
