//! Terminal presentation for the aggregation commands

pub mod breakdown;
pub mod members;
pub mod setup;
pub mod summary;
pub mod ui;
