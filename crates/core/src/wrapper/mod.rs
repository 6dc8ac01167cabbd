//! Wrapper module discovery.
//!
//! A wrapper is a source file that re-exports a compiled module with
//! `from <name> import *`. The indexer maps every compiled module to the first
//! such file found in the package tree.

pub mod indexer;
pub mod matcher;

pub use indexer::{IndexOutcome, WrapperIndexer};
pub use matcher::wildcard_imports;
