//! Read-only caller context for argument conversion.

use crate::value::Value;

/// Caller identity handed to input handlers during argument conversion.
///
/// Conversions are pure functions of their text plus, at most, this
/// read-only context. It exists for handlers that legitimately need the
/// caller, typically resolving a live object by name relative to
/// whoever issued the command.
pub trait InvocationContext: Send + Sync {
    /// Resolve a live object by name relative to the caller.
    fn resolve_name(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Context for calls that carry no caller identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContext;

impl InvocationContext for NoContext {}
