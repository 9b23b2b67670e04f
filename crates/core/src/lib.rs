pub mod config;
pub mod detect;
pub mod error;
pub mod types;

pub use config::{AppConfig, Diagnostics};
pub use error::SolveError;
pub use types::*;
