pub(crate) mod indicator;
pub(crate) mod registry;
