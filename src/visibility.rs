//! Show/hide transitions triggered by edges of a boolean prop.

use crate::animation::timeline::{Animation, Timeline};
use crate::config::{DriveMap, VisibilityConfig};
use crate::foundation::error::MotionResult;

/// Direction of an observed visibility change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Hidden -> visible.
    Show,
    /// Visible -> hidden.
    Hide,
}

/// Starts `show` or `hide` only when the incoming prop differs from the stored one.
///
/// Re-renders that pass the same value are no-ops, so each edge starts exactly one
/// animation.
#[derive(Debug)]
pub struct VisibilityController {
    visible: bool,
    show: Animation,
    hide: Animation,
}

impl VisibilityController {
    /// Controller in state `initially_visible`. Nothing starts until the first edge.
    pub fn new(initially_visible: bool, show: Animation, hide: Animation) -> Self {
        Self {
            visible: initially_visible,
            show,
            hide,
        }
    }

    /// Build from config, returning the controller and the drive values it animates.
    pub fn from_config(
        config: &VisibilityConfig,
        timeline: &Timeline,
    ) -> MotionResult<(Self, DriveMap)> {
        config.validate()?;
        let drives = config.create_drives()?;
        let show = Animation::new(timeline, config.show.build(&drives)?);
        let hide = Animation::new(timeline, config.hide.build(&drives)?);
        Ok((Self::new(config.initially_visible, show, hide), drives))
    }

    /// Feed the latest prop value. Returns the edge that was acted on, if any.
    pub fn update(&mut self, next: bool) -> Option<Edge> {
        if next == self.visible {
            return None;
        }
        self.visible = next;
        let (edge, stop, start) = if next {
            (Edge::Show, &self.hide, &self.show)
        } else {
            (Edge::Hide, &self.show, &self.hide)
        };
        stop.stop();
        start.start();
        tracing::debug!(edge = ?edge, "visibility edge");
        Some(edge)
    }

    /// Last observed prop value.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Animation run on the show edge.
    pub fn show_animation(&self) -> &Animation {
        &self.show
    }

    /// Animation run on the hide edge.
    pub fn hide_animation(&self) -> &Animation {
        &self.hide
    }
}

#[cfg(test)]
#[path = "../tests/unit/visibility/visibility.rs"]
mod tests;
