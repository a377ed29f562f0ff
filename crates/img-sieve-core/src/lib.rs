pub mod analysis;
pub mod archive;
pub mod cleaner;
pub mod config;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod progress;
pub mod scanner;
pub mod workspace;

pub use config::{AppConfig, SizeFolder};
pub use engine::SieveEngine;
pub use error::{Error, Result, Warning};
pub use manifest::RetainSet;
pub use progress::{ProgressReporter, SilentReporter};
pub use workspace::Workspace;
