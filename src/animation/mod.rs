pub(crate) mod composite;
pub(crate) mod ease;
pub(crate) mod runner;
pub(crate) mod spring;
pub(crate) mod timeline;
