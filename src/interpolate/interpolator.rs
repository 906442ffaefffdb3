use std::rc::Rc;

use crate::drive::value::DriveValue;
use crate::foundation::error::MotionResult;
use crate::interpolate::lerp::Lerp;
use crate::interpolate::table::BreakpointTable;

/// Behavior for inputs outside the table's first/last breakpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Hold the boundary output.
    #[default]
    Clamp,
    /// Continue the boundary segment's slope.
    Extend,
}

/// Pure mapping from a shared [`DriveValue`] through a [`BreakpointTable`].
///
/// Holds no subscription of its own: callers re-read [`Interpolator::current_output`]
/// whenever they observe the drive value change.
#[derive(Clone, Debug)]
pub struct Interpolator<T> {
    drive: DriveValue,
    table: Rc<BreakpointTable<T>>,
    left: Extrapolate,
    right: Extrapolate,
}

impl<T> Interpolator<T>
where
    T: Lerp + Clone,
{
    /// Build with the same policy on both sides.
    pub fn new(drive: DriveValue, table: BreakpointTable<T>, extrapolate: Extrapolate) -> Self {
        Self::with_extrapolation(drive, table, extrapolate, extrapolate)
    }

    /// Build with independent policies below `x_0` and above `x_last`.
    pub fn with_extrapolation(
        drive: DriveValue,
        table: BreakpointTable<T>,
        left: Extrapolate,
        right: Extrapolate,
    ) -> Self {
        Self {
            drive,
            table: Rc::new(table),
            left,
            right,
        }
    }

    /// Validate `inputs`/`outputs` and build in one step.
    pub fn from_breakpoints(
        drive: DriveValue,
        inputs: Vec<f64>,
        outputs: Vec<T>,
        extrapolate: Extrapolate,
    ) -> MotionResult<Self> {
        Ok(Self::new(
            drive,
            BreakpointTable::new(inputs, outputs)?,
            extrapolate,
        ))
    }

    /// Output for the drive value's current reading.
    pub fn current_output(&self) -> T {
        self.output_at(self.drive.get())
    }

    /// Output for an arbitrary input `x`.
    pub fn output_at(&self, x: f64) -> T {
        let inputs = self.table.inputs();
        let outputs = self.table.outputs();
        let (lo, hi) = self.table.domain();

        if x < lo && self.left == Extrapolate::Clamp {
            return outputs[0].clone();
        }
        if x > hi && self.right == Extrapolate::Clamp {
            return outputs[outputs.len() - 1].clone();
        }

        let i = self.table.segment(x);
        let t = (x - inputs[i]) / (inputs[i + 1] - inputs[i]);
        let out = T::lerp(&outputs[i], &outputs[i + 1], t);
        if x < lo || x > hi {
            out.normalize_extrapolated()
        } else {
            out
        }
    }

    /// Drive value this interpolator reads.
    pub fn drive(&self) -> &DriveValue {
        &self.drive
    }

    /// Shared breakpoint table.
    pub fn table(&self) -> &BreakpointTable<T> {
        &self.table
    }

    /// `(left, right)` extrapolation policies.
    pub fn extrapolation(&self) -> (Extrapolate, Extrapolate) {
        (self.left, self.right)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interpolate/interpolator.rs"]
mod tests;
