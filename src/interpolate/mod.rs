pub(crate) mod interpolator;
pub(crate) mod lerp;
pub(crate) mod table;
