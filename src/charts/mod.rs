//! Chart-ready aggregation of simulation results.
//!
//! Each submodule folds a slice of normalised data into the shape one chart
//! consumes: a day series of unallocated trips, trip-distance histograms,
//! the weekly location heatmap and the shift colour scale.

pub mod colors;
pub mod distribution;
pub mod heatmap;
pub mod types;
pub mod unallocated;
pub mod utility;
