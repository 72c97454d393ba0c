//! Command implementations

pub mod completions;
pub mod list;
pub mod paths;
pub mod status;
pub mod sync;
