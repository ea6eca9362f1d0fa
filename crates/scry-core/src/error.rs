//! Error taxonomy for chain evaluation.
//!
//! Operator-recoverable conditions are split so a host can render
//! different messages for "your input was bad" ([`InputError`]) versus
//! "the call itself failed" ([`InvocationError`]). [`SchemaError`] is the
//! one hard failure: a type that cannot be introspected can never serve a
//! future call either.

use crate::value::TypeKey;

/// Argument text could not be turned into a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// No input handler is registered for the target type
    #[error("no type handler registered for {0}")]
    NoHandler(TypeKey),

    /// A handler exists but refused the text
    #[error("cannot read {token:?}: {reason}")]
    Rejected {
        /// The offending token
        token: String,
        /// The handler's reason for refusing it
        reason: String,
    },
}

/// The operator's input could not be applied to the resolved method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Fewer tokens remain than the method has parameters
    #[error("not enough arguments for '{id}': expected {expected}, got {given}")]
    MissingArguments {
        /// Identifier the method was addressed by
        id: String,
        /// Parameter count of the selected method
        expected: usize,
        /// Tokens actually available
        given: usize,
    },

    /// A token failed conversion to its parameter type
    #[error("argument {token:?}: {source}")]
    Conversion {
        /// The offending token
        token: String,
        /// The underlying conversion failure
        #[source]
        source: ConversionError,
    },

    /// Several overloads share the chosen arity and the policy rejects ties
    #[error("ambiguous call to '{id}': {count} overloads take {arity} argument(s)")]
    AmbiguousOverload {
        /// Identifier the method was addressed by
        id: String,
        /// The tied parameter count
        arity: usize,
        /// Number of tied candidates
        count: usize,
    },
}

/// The resolved method itself failed during execution.
///
/// Distinct from [`InputError`] so the host can tell "bad input" from
/// "the target rejected this call internally". The underlying cause is
/// preserved in `reason`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invocation of '{id}' failed: {reason}")]
pub struct InvocationError {
    /// Identifier the method was addressed by
    pub id: String,
    /// Cause text reported by the method
    pub reason: String,
}

/// The registration table cannot describe a type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// An object type was reached that no schema was registered for
    #[error("no schema registered for type '{0}'")]
    UnknownType(&'static str),
}

/// A handler or schema registration was rejected at build time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// A second input handler claimed an already-claimed exact type
    #[error("an input handler is already registered for {0}")]
    DuplicateInput(TypeKey),

    /// A second output handler claimed an already-claimed exact type
    #[error("an output handler is already registered for {0}")]
    DuplicateOutput(TypeKey),

    /// A second schema claimed an already-registered object type
    #[error("a schema is already registered for type '{0}'")]
    DuplicateSchema(&'static str),
}

/// Out-of-band failure of one chain evaluation.
///
/// In-band terminations (null cursor, unknown identifier) are
/// [`ChainOutcome`](crate::chain::ChainOutcome) variants, not errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// The operator's input was bad
    #[error(transparent)]
    Input(#[from] InputError),

    /// The invoked method failed
    #[error(transparent)]
    Invocation(#[from] InvocationError),

    /// A reached type has no schema
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
