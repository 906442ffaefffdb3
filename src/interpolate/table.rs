use crate::foundation::error::{MotionError, MotionResult};

/// Ordered input breakpoints paired 1:1 with outputs.
///
/// Inputs are finite and strictly increasing, with at least two pairs. Tables are
/// immutable; rebuilding means constructing a new one.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakpointTable<T> {
    inputs: Vec<f64>,
    outputs: Vec<T>,
}

impl<T> BreakpointTable<T> {
    /// Validate and build a table.
    pub fn new(inputs: Vec<f64>, outputs: Vec<T>) -> MotionResult<Self> {
        if inputs.len() != outputs.len() {
            return Err(MotionError::configuration(format!(
                "breakpoint table has {} inputs but {} outputs",
                inputs.len(),
                outputs.len()
            )));
        }
        if inputs.len() < 2 {
            return Err(MotionError::configuration(
                "breakpoint table needs at least two breakpoints",
            ));
        }
        if let Some(bad) = inputs.iter().find(|x| !x.is_finite()) {
            return Err(MotionError::configuration(format!(
                "breakpoint inputs must be finite, got {bad}"
            )));
        }
        if let Some(i) = inputs.windows(2).position(|w| w[0] >= w[1]) {
            return Err(MotionError::configuration(format!(
                "breakpoint inputs must be strictly increasing: inputs[{}] = {} >= inputs[{}] = {}",
                i,
                inputs[i],
                i + 1,
                inputs[i + 1]
            )));
        }
        Ok(Self { inputs, outputs })
    }

    /// Build from `(input, output)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, T)>) -> MotionResult<Self> {
        let (inputs, outputs) = pairs.into_iter().unzip();
        Self::new(inputs, outputs)
    }

    /// Input breakpoints.
    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    /// Output values.
    pub fn outputs(&self) -> &[T] {
        &self.outputs
    }

    /// Number of breakpoints (always >= 2).
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// `(x_0, x_last)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.inputs[0], self.inputs[self.inputs.len() - 1])
    }

    /// Index `i` of the segment `[x_i, x_{i+1}]` enclosing `x`, clamped to the first and
    /// last segment for out-of-domain inputs.
    pub(crate) fn segment(&self, x: f64) -> usize {
        // First input strictly greater than x; an input equal to an interior breakpoint
        // lands at the start of the following segment (t = 0), yielding that breakpoint.
        let idx = self.inputs.partition_point(|&b| b <= x);
        idx.saturating_sub(1).min(self.inputs.len() - 2)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interpolate/table.rs"]
mod tests;
