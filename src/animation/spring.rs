use crate::foundation::error::{MotionError, MotionResult};

/// Damped harmonic oscillator parameters plus rest thresholds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Spring constant `k`.
    pub stiffness: f64,
    /// Damping coefficient `c`.
    pub damping: f64,
    /// Mass `m`.
    pub mass: f64,
    /// Settled once `|to - value|` is at most this (drive units).
    pub rest_displacement: f64,
    /// Settled once `|velocity|` is at most this (drive units per second).
    pub rest_speed: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
            rest_displacement: 0.001,
            rest_speed: 0.001,
        }
    }
}

impl SpringConfig {
    /// Reject parameters for which the spring never settles or is undefined.
    pub fn validate(&self) -> MotionResult<()> {
        let fields = [
            ("stiffness", self.stiffness),
            ("damping", self.damping),
            ("mass", self.mass),
            ("rest_displacement", self.rest_displacement),
            ("rest_speed", self.rest_speed),
        ];
        for (name, v) in fields {
            if !v.is_finite() || v <= 0.0 {
                return Err(MotionError::configuration(format!(
                    "spring {name} must be finite and > 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Damping ratio `zeta`; below 1 the spring overshoots.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Normalized step response `(x, dx/dt)` at `t` seconds, from rest at 0 toward 1.
    pub fn step_response(&self, t: f64) -> (f64, f64) {
        let w0 = (self.stiffness / self.mass).sqrt();
        let zeta = self.damping_ratio();

        if (zeta - 1.0).abs() < 1e-6 {
            // Critically damped.
            let e = (-w0 * t).exp();
            (1.0 - e * (1.0 + w0 * t), w0 * w0 * t * e)
        } else if zeta < 1.0 {
            // Underdamped.
            let root = (1.0 - zeta * zeta).sqrt();
            let wd = w0 * root;
            let e = (-zeta * w0 * t).exp();
            let (s, c) = (wd * t).sin_cos();
            let x = 1.0 - e * (c + (zeta / root) * s);
            let v = e * (w0 / root) * s;
            (x, v)
        } else {
            // Overdamped.
            let z2 = (zeta * zeta - 1.0).sqrt();
            let r1 = -w0 * (zeta - z2);
            let r2 = -w0 * (zeta + z2);
            let c1 = (zeta + z2) / (2.0 * z2);
            let c2 = (zeta - z2) / (2.0 * z2);
            let x = 1.0 - (c1 * (r1 * t).exp() - c2 * (r2 * t).exp());
            let v = -(c1 * r1 * (r1 * t).exp() - c2 * r2 * (r2 * t).exp());
            (x, v)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
