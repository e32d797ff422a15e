/// Errors raised while validating configuration or sampling weights.
///
/// These fail fast at build/sample time; nothing downstream ever sees a
/// degraded value in place of one of these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{what}: {options} options but {weights} weights")]
    LengthMismatch {
        what: &'static str,
        options: usize,
        weights: usize,
    },
    #[error("{what}: every weight is zero, nothing to sample")]
    EmptyPool { what: &'static str },
    #[error("{what}[{index}] = {value} is not a probability in [0, 1]")]
    InvalidProbability {
        what: &'static str,
        index: usize,
        value: f64,
    },
    #[error("invalid weight {token:?}: expected a non-negative integer")]
    InvalidWeight { token: String },
    #[error("{field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
