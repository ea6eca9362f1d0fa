//! Method maps and their process-wide cache.

mod method_map;
mod provider;

pub use method_map::{MethodMap, SelectError, TieBreak};
pub use provider::MethodMapProvider;
