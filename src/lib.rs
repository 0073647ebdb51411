pub mod analyze;
pub mod args;
pub mod chart;
pub mod commands;
mod config;
mod error;
pub mod load;
pub mod model;
pub mod sample;
pub mod summary;

pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use summary::Mode;
