use crate::foundation::core::{Color, Transform2D, Vec2};

/// Values that can be linearly mixed.
///
/// `t` may fall outside `[0, 1]` when an interpolator extrapolates.
pub trait Lerp: Sized {
    /// Mix `a` toward `b` by `t`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;

    /// Bring an extrapolated value back into the type's valid range.
    fn normalize_extrapolated(self) -> Self {
        self
    }
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Transform2D {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            translate: <Vec2 as Lerp>::lerp(&a.translate, &b.translate, t),
            rotation_rad: a.rotation_rad + (b.rotation_rad - a.rotation_rad) * t,
            scale: <Vec2 as Lerp>::lerp(&a.scale, &b.scale, t),
            anchor: <Vec2 as Lerp>::lerp(&a.anchor, &b.anchor, t),
        }
    }
}

impl Lerp for Color {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }

    fn normalize_extrapolated(self) -> Self {
        self.clamped()
    }
}
