//! # Converters
//!
//! Compiled per-type-pair converters and the cache that shares them.

mod cache;
mod compiled;

pub use cache::{CacheStats, ConverterCache};
pub use compiled::{CompiledConverter, CopyPair};
