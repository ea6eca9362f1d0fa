//! The chain evaluator.
//!
//! Walks a flat token sequence from a starting value: each identifier
//! token resolves to a method on the cursor's current type, the following
//! tokens become that method's arguments, the call result becomes the new
//! cursor. Evaluation is stateless across calls; the shared method map
//! cache and handler registry are read-only during a walk.

use crate::context::InvocationContext;
use crate::error::{EvalError, InputError, InvocationError};
use crate::handlers::TypeHandlers;
use crate::reflect::{MethodMapProvider, SelectError, TieBreak};
use crate::schema::TypeRegistry;
use crate::value::Value;

/// Terminal state of one chain evaluation.
///
/// Null and unknown references are normal operator-facing terminations,
/// not errors; out-of-band failures are [`EvalError`].
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome {
    /// Every token was consumed; the final cursor value.
    Success(Value),
    /// The cursor became null before the tokens ran out.
    NullReference(String),
    /// A token named no method on the cursor's type.
    UnknownReference(String),
}

/// One-shot evaluator borrowing the host's shared state.
#[derive(Debug, Clone, Copy)]
pub struct ChainEvaluator<'a> {
    registry: &'a TypeRegistry,
    handlers: &'a TypeHandlers,
    provider: &'a MethodMapProvider,
    tie_break: TieBreak,
}

impl<'a> ChainEvaluator<'a> {
    /// Borrow the shared state an evaluation walks over.
    pub fn new(
        registry: &'a TypeRegistry,
        handlers: &'a TypeHandlers,
        provider: &'a MethodMapProvider,
        tie_break: TieBreak,
    ) -> Self {
        Self {
            registry,
            handlers,
            provider,
            tie_break,
        }
    }

    /// Evaluate a token chain from a starting value.
    ///
    /// Zero tokens yield `Success` with the starting value unchanged.
    pub fn evaluate(
        &self,
        start: &Value,
        tokens: &[&str],
        ctx: &dyn InvocationContext,
    ) -> Result<ChainOutcome, EvalError> {
        let mut cursor = start.clone();
        let mut cursor_key = start.type_key();
        let mut pos = 0;

        while pos < tokens.len() {
            let ident = tokens[pos];

            if cursor.is_null() {
                return Ok(ChainOutcome::NullReference(format!(
                    "cannot call '{ident}' on a null reference"
                )));
            }

            // A value with no recoverable type (an empty list) has no
            // invocable members.
            let map = match &cursor_key {
                Some(key) => self.provider.map_for(key, self.registry)?,
                None => {
                    return Ok(ChainOutcome::UnknownReference(format!(
                        "unknown or unavailable method '{ident}'"
                    )));
                }
            };

            if !map.contains_id(ident) {
                return Ok(ChainOutcome::UnknownReference(format!(
                    "unknown or unavailable method '{ident}'"
                )));
            }

            let available = tokens.len() - pos - 1;
            let method = match map.select(ident, available, self.tie_break) {
                Ok(method) => method,
                Err(SelectError::NotFound) => {
                    return Ok(ChainOutcome::UnknownReference(format!(
                        "unknown or unavailable method '{ident}'"
                    )));
                }
                Err(SelectError::NotEnoughTokens { required }) => {
                    return Err(InputError::MissingArguments {
                        id: ident.to_string(),
                        expected: required,
                        given: available,
                    }
                    .into());
                }
                Err(SelectError::Ambiguous { arity, count }) => {
                    return Err(InputError::AmbiguousOverload {
                        id: ident.to_string(),
                        arity,
                        count,
                    }
                    .into());
                }
            };

            let mut args = Vec::with_capacity(method.arity());
            for (offset, param) in method.params().iter().enumerate() {
                let token = tokens[pos + 1 + offset];
                let arg = self
                    .handlers
                    .parse(token, param, self.registry, ctx)
                    .map_err(|source| InputError::Conversion {
                        token: token.to_string(),
                        source,
                    })?;
                args.push(arg);
            }

            let returned = method
                .invoke(&cursor, &args)
                .map_err(|reason| InvocationError {
                    id: ident.to_string(),
                    reason,
                })?;

            cursor_key = Some(method.returns().clone());
            cursor = returned;
            pos += 1 + method.arity();
        }

        Ok(ChainOutcome::Success(cursor))
    }
}
