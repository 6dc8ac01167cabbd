pub mod artifact;
pub mod module;

pub use artifact::*;
pub use module::*;
