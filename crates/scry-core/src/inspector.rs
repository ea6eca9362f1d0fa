//! Host-facing facade.
//!
//! An [`Inspector`] owns the schema registry, the type handlers, and
//! the method map cache, and exposes the library boundary the host
//! calls: `evaluate`, `complete`, `render`. Registrations
//! freeze at build time; everything the Inspector holds is read-only
//! during calls, so it can be shared across threads.

use crate::chain::{ChainEvaluator, ChainOutcome};
use crate::complete::CompletionEngine;
use crate::context::InvocationContext;
use crate::error::{EvalError, RegistrationError, SchemaError};
use crate::handlers::TypeHandlers;
use crate::reflect::{MethodMapProvider, TieBreak};
use crate::schema::{TypeRegistry, TypeSchema};
use crate::value::{TypeKey, Value};

/// Frozen evaluation state plus the three host-facing operations.
#[derive(Debug)]
pub struct Inspector {
    registry: TypeRegistry,
    handlers: TypeHandlers,
    provider: MethodMapProvider,
    tie_break: TieBreak,
}

impl Inspector {
    /// Start collecting registrations.
    pub fn builder() -> InspectorBuilder {
        InspectorBuilder::new()
    }

    /// Evaluate a token chain from a starting value.
    pub fn evaluate(
        &self,
        start: &Value,
        tokens: &[&str],
        ctx: &dyn InvocationContext,
    ) -> Result<ChainOutcome, EvalError> {
        ChainEvaluator::new(&self.registry, &self.handlers, &self.provider, self.tie_break)
            .evaluate(start, tokens, ctx)
    }

    /// Candidate identifiers at the cursor position the tokens imply.
    pub fn complete(
        &self,
        start: &TypeKey,
        tokens: &[&str],
    ) -> Result<Vec<String>, SchemaError> {
        CompletionEngine::new(&self.registry, &self.provider).complete(start, tokens)
    }

    /// Render any value as operator-facing text. Never fails.
    pub fn render(&self, value: &Value) -> String {
        self.handlers.render(value, &self.registry)
    }

    /// The schema table.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The conversion registry.
    pub fn handlers(&self) -> &TypeHandlers {
        &self.handlers
    }

    /// The method map cache, exposed for invalidation.
    pub fn provider(&self) -> &MethodMapProvider {
        &self.provider
    }
}

/// Collects schemas and handlers, then freezes them into an [`Inspector`].
///
/// The first registration failure is remembered and reported by
/// [`build`](InspectorBuilder::build); later registrations are skipped.
pub struct InspectorBuilder {
    registry: TypeRegistry,
    handlers: TypeHandlers,
    tie_break: TieBreak,
    error: Option<RegistrationError>,
}

impl InspectorBuilder {
    fn new() -> Self {
        Self {
            registry: TypeRegistry::new(),
            handlers: TypeHandlers::with_defaults(),
            tie_break: TieBreak::default(),
            error: None,
        }
    }

    /// Register an object type's schema.
    pub fn schema(mut self, schema: TypeSchema) -> Self {
        if self.error.is_none() {
            if let Err(err) = self.registry.register(schema) {
                self.error = Some(err);
            }
        }
        self
    }

    /// Register an input converter for a type.
    pub fn input_handler<F>(mut self, target: TypeKey, f: F) -> Self
    where
        F: Fn(&str, &dyn InvocationContext) -> Result<Value, String> + Send + Sync + 'static,
    {
        if self.error.is_none() {
            if let Err(err) = self.handlers.register_input(target, f) {
                self.error = Some(err);
            }
        }
        self
    }

    /// Register an output converter for a type.
    pub fn output_handler<F>(mut self, target: TypeKey, f: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        if self.error.is_none() {
            if let Err(err) = self.handlers.register_output(target, f) {
                self.error = Some(err);
            }
        }
        self
    }

    /// Overload tie-break policy (default: first-declared wins).
    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Freeze the registrations.
    pub fn build(self) -> Result<Inspector, RegistrationError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(Inspector {
            registry: self.registry,
            handlers: self.handlers,
            provider: MethodMapProvider::new(),
            tie_break: self.tie_break,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NoContext;

    struct Gauge;

    #[test]
    fn test_builder_wires_everything() {
        let schema = TypeSchema::new::<Gauge>("Gauge").method(
            "get_reading",
            [],
            TypeKey::Float,
            |_r, _a| Ok(Value::Float(0.5)),
        );
        let ty = schema.object_type();
        let inspector = Inspector::builder().schema(schema).build().unwrap();

        let start = Value::object(ty, Gauge);
        let outcome = inspector
            .evaluate(&start, &["reading"], &NoContext)
            .unwrap();
        assert_eq!(outcome, ChainOutcome::Success(Value::Float(0.5)));

        let ids = inspector.complete(&TypeKey::Object(ty), &[]).unwrap();
        assert_eq!(ids, vec!["reading"]);

        assert_eq!(inspector.render(&Value::Float(0.5)), "0.5");
    }

    #[test]
    fn test_builder_reports_duplicate() {
        let err = Inspector::builder()
            .schema(TypeSchema::new::<Gauge>("Gauge"))
            .schema(TypeSchema::new::<Gauge>("Gauge"))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateSchema("Gauge"));
    }

    #[test]
    fn test_inspector_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Inspector>();
    }
}
