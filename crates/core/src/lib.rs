pub mod aggregate;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod orchestrator;
pub mod registry;
pub mod relocate;
pub mod synth;
pub mod util;
pub mod wrapper;

pub use config::PipelineConfig;
pub use error::{Result, StubweaveError};
pub use orchestrator::Orchestrator;
