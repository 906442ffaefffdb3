//! tabmotion is a drive-value interpolation and animation composition core for
//! gesture-driven UI such as swipeable tab bars.
//!
//! Everything derives from scalar [`DriveValue`]s that a host gesture bridge or an
//! animation runner writes. Renderers read derived outputs through [`Interpolator`]s,
//! which map the drive's current reading through a [`BreakpointTable`].
//!
//! # Pieces
//!
//! 1. **Drive**: [`DriveValue`] holds a finite `f64` and notifies subscribers in order.
//! 2. **Interpolate**: [`Interpolator`] maps numbers, [`Color`]s and [`Transform2D`]s
//!    with clamp or extend extrapolation.
//! 3. **Measure**: [`MeasurementRegistry`] gathers per-tab layout reports in any order;
//!    [`IndicatorBuilder`] and [`TabIndicator`] turn them into indicator mappings.
//! 4. **Animate**: [`Tween`], [`Spring`] and [`Composite`] runners advance on a host-ticked
//!    [`Timeline`] through [`Animation`] handles.
//! 5. **Visibility**: [`VisibilityController`] starts show/hide animations on prop edges.
//!
//! The core is single-threaded: values are shared with `Rc`/`RefCell` and the host drives
//! time by calling [`Timeline::tick`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod drive;
mod foundation;
mod interpolate;
mod measure;

/// Declarative JSON configuration.
pub mod config;
/// Show/hide edge detection.
pub mod visibility;

pub use animation::composite::{Composite, CompositeKind};
pub use animation::ease::Ease;
pub use animation::runner::{RunState, Runner, Spring, Tween};
pub use animation::spring::SpringConfig;
pub use animation::timeline::{Animation, Finished, Timeline};
pub use config::{
    AnimationConfig, CompositeConfig, DriveMap, RouteConfig, SpringTransitionConfig,
    TabBarConfig, TimingConfig, TransitionConfig, VisibilityConfig,
};
pub use drive::value::{DriveId, DriveValue, SubscriptionId};
pub use foundation::core::{Affine, Color, Fps, Transform2D, Vec2};
pub use foundation::error::{MotionError, MotionResult};
pub use interpolate::interpolator::{Extrapolate, Interpolator};
pub use interpolate::lerp::Lerp;
pub use interpolate::table::BreakpointTable;
pub use measure::indicator::{
    IndicatorBuilder, IndicatorFrame, IndicatorInterpolators, TabIndicator, tab_label_color,
};
pub use measure::registry::{Measurement, MeasurementRegistry, ReportStatus};
pub use visibility::{Edge, VisibilityController};
