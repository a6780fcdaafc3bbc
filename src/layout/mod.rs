pub(crate) mod catalog;
pub(crate) mod color;
pub(crate) mod frame;
pub(crate) mod solver;
