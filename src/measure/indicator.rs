use crate::animation::runner::RunState;
use crate::animation::timeline::{Animation, Timeline};
use crate::config::TransitionConfig;
use crate::drive::value::DriveValue;
use crate::foundation::core::Color;
use crate::foundation::error::{MotionError, MotionResult};
use crate::interpolate::interpolator::{Extrapolate, Interpolator};
use crate::interpolate::table::BreakpointTable;
use crate::measure::registry::{Measurement, MeasurementRegistry, ReportStatus};

/// Position, size and color mappings for a tab indicator, all reading one drive value
/// over the tab index domain.
#[derive(Clone, Debug)]
pub struct IndicatorInterpolators {
    /// Leading edge offset.
    pub position: Interpolator<f64>,
    /// Extent along the bar.
    pub size: Interpolator<f64>,
    /// Indicator color.
    pub color: Interpolator<Color>,
}

/// Builds [`IndicatorInterpolators`] from a complete measurement set.
#[derive(Clone, Debug, PartialEq)]
pub struct IndicatorBuilder {
    route_colors: Vec<Color>,
}

impl IndicatorBuilder {
    /// One color per route, in tab order.
    pub fn new(route_colors: Vec<Color>) -> Self {
        Self { route_colors }
    }

    /// Route colors in tab order.
    pub fn route_colors(&self) -> &[Color] {
        &self.route_colors
    }

    /// Map tab index `i` to measurement `i` and route color `i`.
    ///
    /// `measurements` must be dense and zero-based with one entry per route. A single
    /// route yields constant mappings over `[0, 1]`.
    #[tracing::instrument(skip(self, measurements, drive), fields(routes = self.route_colors.len()))]
    pub fn build(
        &self,
        measurements: &[Measurement],
        drive: &DriveValue,
    ) -> MotionResult<IndicatorInterpolators> {
        let n = self.route_colors.len();
        if n == 0 {
            return Err(MotionError::configuration("indicator needs at least one route"));
        }
        if measurements.len() != n {
            return Err(MotionError::configuration(format!(
                "indicator has {n} routes but {} measurements",
                measurements.len()
            )));
        }
        if let Some((i, m)) = measurements
            .iter()
            .enumerate()
            .find(|(i, m)| m.index != *i)
        {
            return Err(MotionError::configuration(format!(
                "measurements must be dense and ordered: slot {i} holds index {}",
                m.index
            )));
        }

        let mut inputs: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let mut offsets: Vec<f64> = measurements.iter().map(|m| m.offset).collect();
        let mut extents: Vec<f64> = measurements.iter().map(|m| m.extent).collect();
        let mut colors = self.route_colors.clone();
        if n == 1 {
            inputs.push(1.0);
            offsets.push(offsets[0]);
            extents.push(extents[0]);
            colors.push(colors[0]);
        }

        let interpolators = IndicatorInterpolators {
            position: Interpolator::new(
                drive.clone(),
                BreakpointTable::new(inputs.clone(), offsets)?,
                Extrapolate::Clamp,
            ),
            size: Interpolator::new(
                drive.clone(),
                BreakpointTable::new(inputs.clone(), extents)?,
                Extrapolate::Clamp,
            ),
            color: Interpolator::new(
                drive.clone(),
                BreakpointTable::new(inputs, colors)?,
                Extrapolate::Clamp,
            ),
        };
        tracing::debug!(drive = drive.id().0, "indicator interpolators built");
        Ok(interpolators)
    }
}

/// Label color for tab `index`: `active` when focused, fading to `inactive` one tab away.
pub fn tab_label_color(
    drive: &DriveValue,
    index: usize,
    active: Color,
    inactive: Color,
) -> MotionResult<Interpolator<Color>> {
    let i = index as f64;
    Interpolator::from_breakpoints(
        drive.clone(),
        vec![i - 1.0, i, i + 1.0],
        vec![inactive, active, inactive],
        Extrapolate::Clamp,
    )
}

/// Indicator geometry and color sampled at one drive reading.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct IndicatorFrame {
    /// Drive reading (fractional tab index).
    pub position: f64,
    /// Leading edge offset.
    pub offset: f64,
    /// Extent along the bar.
    pub extent: f64,
    /// Indicator color.
    pub color: Color,
}

/// Per-tab-bar context owning the position drive, its measurements and the derived
/// interpolators.
///
/// Interpolators exist once every route has been measured and are rebuilt whenever a
/// measurement changes afterwards.
#[derive(Debug)]
pub struct TabIndicator {
    position: DriveValue,
    registry: MeasurementRegistry,
    builder: IndicatorBuilder,
    interpolators: Option<IndicatorInterpolators>,
    animation: Option<Animation>,
}

impl TabIndicator {
    /// Indicator resting on tab 0.
    pub fn new(route_colors: Vec<Color>) -> MotionResult<Self> {
        check_routes(&route_colors)?;
        Ok(Self {
            position: DriveValue::new(0.0)?,
            registry: MeasurementRegistry::new(route_colors.len()),
            builder: IndicatorBuilder::new(route_colors),
            interpolators: None,
            animation: None,
        })
    }

    /// Number of routes.
    pub fn route_count(&self) -> usize {
        self.builder.route_colors().len()
    }

    /// Drive value holding the (fractional) focused tab index.
    pub fn position(&self) -> &DriveValue {
        &self.position
    }

    /// Registry collecting layout measurements.
    pub fn registry(&self) -> &MeasurementRegistry {
        &self.registry
    }

    /// Current interpolators, once every route has been measured.
    pub fn interpolators(&self) -> Option<&IndicatorInterpolators> {
        self.interpolators.as_ref()
    }

    /// Record a layout measurement, building the interpolators once the set completes.
    ///
    /// Updates after completion are stored but leave the current interpolators in place
    /// until [`TabIndicator::rebuild`] is called.
    pub fn report(&mut self, index: usize, offset: f64, extent: f64) -> MotionResult<ReportStatus> {
        let status = self.registry.report(index, offset, extent);
        if status == ReportStatus::Completed {
            self.rebuild()?;
        }
        Ok(status)
    }

    /// Rebuild the interpolators from the latest measurements, e.g. after a relayout.
    ///
    /// Fails while any tab is still unmeasured.
    #[tracing::instrument(skip(self), fields(routes = self.route_count()))]
    pub fn rebuild(&mut self) -> MotionResult<()> {
        if !self.registry.is_complete() {
            return Err(MotionError::configuration(format!(
                "cannot rebuild indicator: {} of {} tabs measured",
                self.registry.len(),
                self.route_count()
            )));
        }
        let measurements = self.registry.snapshot();
        self.interpolators = Some(self.builder.build(&measurements, &self.position)?);
        Ok(())
    }

    /// Replace the routes. Measurements are discarded and must be reported again.
    pub fn set_routes(&mut self, route_colors: Vec<Color>) -> MotionResult<()> {
        check_routes(&route_colors)?;
        tracing::debug!(
            previous = self.route_count(),
            routes = route_colors.len(),
            "tab indicator routes changed"
        );
        self.registry.reset(route_colors.len());
        self.builder = IndicatorBuilder::new(route_colors);
        self.interpolators = None;
        Ok(())
    }

    /// Sample the interpolators at the current position.
    pub fn frame(&self) -> Option<IndicatorFrame> {
        let interp = self.interpolators.as_ref()?;
        Some(IndicatorFrame {
            position: self.position.get(),
            offset: interp.position.current_output(),
            extent: interp.size.current_output(),
            color: interp.color.current_output(),
        })
    }

    /// Animate the position to tab `index` with `transition` (its target is replaced).
    ///
    /// A previous tab animation still running is stopped first, so the new run picks up
    /// from wherever the indicator currently is.
    pub fn animate_to(
        &mut self,
        index: usize,
        timeline: &Timeline,
        transition: &TransitionConfig,
    ) -> MotionResult<Animation> {
        if index >= self.route_count() {
            return Err(MotionError::configuration(format!(
                "tab index {index} outside {} routes",
                self.route_count()
            )));
        }
        let runner = transition.runner_to(self.position.clone(), index as f64)?;
        if let Some(previous) = self.animation.take()
            && previous.state() == RunState::Running
        {
            previous.stop();
        }
        let animation = Animation::new(timeline, runner);
        animation.start();
        tracing::debug!(index, from = self.position.get(), "tab indicator animating");
        self.animation = Some(animation.clone());
        Ok(animation)
    }

    /// Stop any running animation and release subscribers and interpolators.
    pub fn dispose(&mut self) {
        if let Some(animation) = self.animation.take() {
            animation.stop();
        }
        self.interpolators = None;
        self.position.dispose();
        tracing::debug!("tab indicator disposed");
    }
}

fn check_routes(route_colors: &[Color]) -> MotionResult<()> {
    if route_colors.is_empty() {
        return Err(MotionError::configuration("tab indicator needs at least one route"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/measure/indicator.rs"]
mod tests;
