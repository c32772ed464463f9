//! Command implementations

pub mod check;
pub mod completions;
pub mod link_params;
pub mod solib;
