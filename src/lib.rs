pub mod charts;
pub mod config;
pub mod drivingbook;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod results;
pub mod settings;
pub mod simulation;
pub mod table;
pub mod usage;
pub mod vehicles;

pub use error::{PipelineError, Result};
