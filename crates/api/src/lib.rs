pub mod error;
pub mod models;
pub mod registry;
pub mod report;
pub mod tool;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use models::*;
pub use registry::ExtensionRegistry;
pub use report::{ModuleOutcome, ModuleReport, RelocationCase, RunReport};
pub use tool::{StubTool, SynthesisMode};
