/// Convenience result type used across tabmotion.
pub type MotionResult<T> = Result<T, MotionError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum MotionError {
    /// Malformed construction input (breakpoint tables, runner and indicator configuration).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A value that can never be stored in a drive value (NaN or infinite).
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Measurement reported for an index outside `[0, expected)`.
    #[error("stale measurement: index {index} outside [0, {expected})")]
    StaleMeasurement {
        /// Reported item index.
        index: usize,
        /// Expected item count at report time.
        expected: usize,
    },

    /// Registry reached its expected count again without an intervening reset.
    #[error("duplicate completion: registry already completed for {expected} items")]
    DuplicateCompletion {
        /// Expected item count of the completed cycle.
        expected: usize,
    },

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MotionError {
    /// Build a [`MotionError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`MotionError::InvalidValue`] value.
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// Build a [`MotionError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for anomalies the engine absorbs at runtime instead of propagating.
    pub fn is_absorbed(&self) -> bool {
        matches!(
            self,
            Self::StaleMeasurement { .. } | Self::DuplicateCompletion { .. }
        )
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
