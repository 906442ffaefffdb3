//! Declarative JSON configuration for transitions, composites, visibility controllers and
//! tab bars.
//!
//! Parsing is lenient about omitted fields (they take their documented defaults);
//! [`validate`](TabBarConfig::validate) then rejects anything the engine could not run.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::animation::composite::{Composite, CompositeKind};
use crate::animation::ease::Ease;
use crate::animation::runner::{Runner, Spring, Tween};
use crate::animation::spring::SpringConfig;
use crate::drive::value::DriveValue;
use crate::foundation::core::Color;
use crate::foundation::error::{MotionError, MotionResult};
use crate::measure::registry::Measurement;

/// Named drive values that animation configs refer to.
pub type DriveMap = BTreeMap<String, DriveValue>;

/// Drive name used when a transition does not name one.
pub const DEFAULT_DRIVE: &str = "value";

fn default_drive() -> String {
    DEFAULT_DRIVE.to_owned()
}

fn default_duration_ms() -> u64 {
    300
}

/// Leaf transition, tagged by `"type"`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionConfig {
    /// Duration plus easing curve.
    Timing(TimingConfig),
    /// Damped spring.
    Spring(SpringTransitionConfig),
}

/// Fields of [`TransitionConfig::Timing`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    /// Drive value to animate.
    #[serde(default = "default_drive")]
    pub drive: String,
    /// Target value.
    #[serde(default)]
    pub to: f64,
    /// Duration in milliseconds.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Easing curve.
    #[serde(default)]
    pub ease: Ease,
    /// Host acceleration hint.
    #[serde(default)]
    pub native_driver: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            drive: default_drive(),
            to: 0.0,
            duration_ms: default_duration_ms(),
            ease: Ease::default(),
            native_driver: false,
        }
    }
}

/// Fields of [`TransitionConfig::Spring`]; omitted parameters take [`SpringConfig`] defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpringTransitionConfig {
    /// Drive value to animate.
    pub drive: String,
    /// Target value.
    pub to: f64,
    /// Spring constant.
    pub stiffness: f64,
    /// Damping coefficient.
    pub damping: f64,
    /// Mass.
    pub mass: f64,
    /// Displacement rest threshold.
    pub rest_displacement: f64,
    /// Speed rest threshold.
    pub rest_speed: f64,
    /// Host acceleration hint.
    pub native_driver: bool,
}

impl Default for SpringTransitionConfig {
    fn default() -> Self {
        let spring = SpringConfig::default();
        Self {
            drive: default_drive(),
            to: 0.0,
            stiffness: spring.stiffness,
            damping: spring.damping,
            mass: spring.mass,
            rest_displacement: spring.rest_displacement,
            rest_speed: spring.rest_speed,
            native_driver: false,
        }
    }
}

impl SpringTransitionConfig {
    /// Physical parameters.
    pub fn spring(&self) -> SpringConfig {
        SpringConfig {
            stiffness: self.stiffness,
            damping: self.damping,
            mass: self.mass,
            rest_displacement: self.rest_displacement,
            rest_speed: self.rest_speed,
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self::Timing(TimingConfig::default())
    }
}

impl TransitionConfig {
    /// Name of the drive value this transition animates.
    pub fn drive_name(&self) -> &str {
        match self {
            Self::Timing(c) => &c.drive,
            Self::Spring(c) => &c.drive,
        }
    }

    /// Configured target.
    pub fn to(&self) -> f64 {
        match self {
            Self::Timing(c) => c.to,
            Self::Spring(c) => c.to,
        }
    }

    /// Check targets, easing and spring parameters.
    pub fn validate(&self) -> MotionResult<()> {
        if !self.to().is_finite() {
            return Err(MotionError::configuration(format!(
                "transition target must be finite, got {}",
                self.to()
            )));
        }
        match self {
            Self::Timing(c) => c
                .ease
                .validate()
                .map_err(|e| MotionError::configuration(format!("timing ease: {e}"))),
            Self::Spring(c) => c.spring().validate(),
        }
    }

    /// Build a runner for `drive` using the configured target.
    pub fn runner(&self, drive: DriveValue) -> MotionResult<Box<dyn Runner>> {
        self.runner_to(drive, self.to())
    }

    /// Build a runner for `drive` heading to `to` instead of the configured target.
    pub fn runner_to(&self, drive: DriveValue, to: f64) -> MotionResult<Box<dyn Runner>> {
        self.validate()?;
        Ok(match self {
            Self::Timing(c) => Box::new(
                Tween::new(drive, to, Duration::from_millis(c.duration_ms))?
                    .with_ease(c.ease)
                    .with_native_driver(c.native_driver),
            ),
            Self::Spring(c) => {
                Box::new(Spring::new(drive, to, c.spring())?.with_native_driver(c.native_driver))
            }
        })
    }
}

/// Composite node, tagged by `"type"`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum CompositeConfig {
    /// All children start together.
    Parallel {
        /// Child animations.
        children: Vec<AnimationConfig>,
    },
    /// Children run one after another.
    Sequential {
        /// Child animations.
        children: Vec<AnimationConfig>,
    },
    /// Child `i` starts `i * delay_ms` after the composite.
    Staggered {
        /// Per-slot start offset in milliseconds.
        delay_ms: u64,
        /// Child animations.
        children: Vec<AnimationConfig>,
    },
}

impl CompositeConfig {
    fn kind(&self) -> CompositeKind {
        match self {
            Self::Parallel { .. } => CompositeKind::Parallel,
            Self::Sequential { .. } => CompositeKind::Sequential,
            Self::Staggered { delay_ms, .. } => {
                CompositeKind::Staggered(Duration::from_millis(*delay_ms))
            }
        }
    }

    /// Child animations in slot order.
    pub fn children(&self) -> &[AnimationConfig] {
        match self {
            Self::Parallel { children }
            | Self::Sequential { children }
            | Self::Staggered { children, .. } => children,
        }
    }
}

/// Any animation: a leaf transition or a composite of further animations.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum AnimationConfig {
    /// Leaf.
    Transition(TransitionConfig),
    /// Composite.
    Composite(CompositeConfig),
}

impl AnimationConfig {
    /// Validate recursively, checking every referenced drive is in `drives`.
    pub fn validate(&self, drives: &BTreeMap<String, f64>) -> MotionResult<()> {
        match self {
            Self::Transition(t) => {
                t.validate()?;
                if !drives.contains_key(t.drive_name()) {
                    return Err(MotionError::configuration(format!(
                        "transition refers to unknown drive {:?}",
                        t.drive_name()
                    )));
                }
                Ok(())
            }
            Self::Composite(c) => {
                if let CompositeConfig::Staggered { delay_ms, children } = c {
                    let last = children.len().saturating_sub(1) as u64;
                    if delay_ms.checked_mul(last).is_none() {
                        return Err(MotionError::configuration(format!(
                            "stagger delay {delay_ms}ms overflows across {} children",
                            children.len()
                        )));
                    }
                }
                c.children().iter().try_for_each(|a| a.validate(drives))
            }
        }
    }

    /// Build the runner tree over `drives`.
    pub fn build(&self, drives: &DriveMap) -> MotionResult<Box<dyn Runner>> {
        match self {
            Self::Transition(t) => {
                let drive = drives.get(t.drive_name()).ok_or_else(|| {
                    MotionError::configuration(format!("unknown drive {:?}", t.drive_name()))
                })?;
                t.runner(drive.clone())
            }
            Self::Composite(c) => {
                let mut composite = Composite::new(c.kind());
                for child in c.children() {
                    composite.push(child.build(drives)?);
                }
                Ok(Box::new(composite))
            }
        }
    }
}

fn default_drives() -> BTreeMap<String, f64> {
    BTreeMap::from([(default_drive(), 0.0)])
}

/// Show/hide controller description.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VisibilityConfig {
    /// Visibility before the first update.
    #[serde(default)]
    pub initially_visible: bool,
    /// Drive values and their initial readings. Defaults to a single `"value"` at 0.
    #[serde(default = "default_drives")]
    pub drives: BTreeMap<String, f64>,
    /// Animation run on the hidden -> visible edge.
    pub show: AnimationConfig,
    /// Animation run on the visible -> hidden edge.
    pub hide: AnimationConfig,
}

impl VisibilityConfig {
    /// Check drive initial values and both animations.
    pub fn validate(&self) -> MotionResult<()> {
        if let Some((name, v)) = self.drives.iter().find(|(_, v)| !v.is_finite()) {
            return Err(MotionError::configuration(format!(
                "drive {name:?} initial value must be finite, got {v}"
            )));
        }
        self.show.validate(&self.drives)?;
        self.hide.validate(&self.drives)
    }

    /// Create the drive values at their initial readings.
    pub fn create_drives(&self) -> MotionResult<DriveMap> {
        self.drives
            .iter()
            .map(|(name, v)| Ok((name.clone(), DriveValue::new(*v)?)))
            .collect()
    }
}

/// One tab.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// Route name (for display only).
    pub name: String,
    /// Indicator color while this tab is active.
    pub color: Color,
}

fn default_active() -> Color {
    Color::BLACK
}

fn default_inactive() -> Color {
    Color::from_rgb8(0xCC, 0xCC, 0xCC)
}

/// Tab bar simulation input.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TabBarConfig {
    /// Tabs in display order.
    pub routes: Vec<RouteConfig>,
    /// Layout measurements, in the order the host reports them.
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    /// Label color of the focused tab.
    #[serde(default = "default_active")]
    pub active_color: Color,
    /// Label color of unfocused tabs.
    #[serde(default = "default_inactive")]
    pub inactive_color: Color,
    /// Tab focused before any animation.
    #[serde(default)]
    pub initial_index: usize,
    /// Transition used when switching tabs; its target is replaced by the tab index.
    #[serde(default)]
    pub transition: TransitionConfig,
}

impl TabBarConfig {
    /// Route colors in tab order.
    pub fn route_colors(&self) -> Vec<Color> {
        self.routes.iter().map(|r| r.color).collect()
    }

    /// Check routes, colors, measurements and the transition.
    pub fn validate(&self) -> MotionResult<()> {
        if self.routes.is_empty() {
            return Err(MotionError::configuration("tab bar needs at least one route"));
        }
        let colors = self
            .routes
            .iter()
            .map(|r| (r.name.as_str(), r.color))
            .chain([
                ("active_color", self.active_color),
                ("inactive_color", self.inactive_color),
            ]);
        for (name, color) in colors {
            if !color.is_finite() {
                return Err(MotionError::configuration(format!(
                    "color for {name:?} must be finite"
                )));
            }
        }
        for m in &self.measurements {
            if m.index >= self.routes.len() {
                return Err(MotionError::configuration(format!(
                    "measurement index {} outside {} routes",
                    m.index,
                    self.routes.len()
                )));
            }
            if !m.offset.is_finite() || !m.extent.is_finite() || m.extent < 0.0 {
                return Err(MotionError::configuration(format!(
                    "measurement {} has invalid geometry",
                    m.index
                )));
            }
        }
        if self.initial_index >= self.routes.len() {
            return Err(MotionError::configuration(format!(
                "initial_index {} outside {} routes",
                self.initial_index,
                self.routes.len()
            )));
        }
        self.transition.validate()
    }
}

/// Parse and validate a tab bar config.
pub fn parse_tab_bar(json: &str) -> MotionResult<TabBarConfig> {
    let cfg: TabBarConfig = serde_json::from_str(json)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Parse and validate a visibility config.
pub fn parse_visibility(json: &str) -> MotionResult<VisibilityConfig> {
    let cfg: VisibilityConfig = serde_json::from_str(json)?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
