//! Bidirectional text ↔ value conversion.
//!
//! The registry maps a [`TypeKey`] to an input converter (text → value)
//! and an output converter (value → text). Parsing resolves handlers in a
//! fixed order: exact match, then comma fan-out for list types over the
//! element handler, then a handler registered for an ancestor object
//! type. Rendering never fails; values without a handler get a built-in
//! textual description.

mod defaults;

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::context::InvocationContext;
use crate::error::{ConversionError, RegistrationError};
use crate::schema::TypeRegistry;
use crate::value::{TypeKey, Value};

/// Text → value converter. Rejections are plain reason text.
pub type InputFn = Arc<dyn Fn(&str, &dyn InvocationContext) -> Result<Value, String> + Send + Sync>;

/// Value → text converter.
pub type OutputFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Registry of input and output converters.
///
/// Fully populated before evaluation begins; read-only at steady state.
/// Conversions are pure functions of their text plus the read-only
/// [`InvocationContext`].
#[derive(Default)]
pub struct TypeHandlers {
    inputs: FxHashMap<TypeKey, InputFn>,
    outputs: FxHashMap<TypeKey, OutputFn>,
}

impl std::fmt::Debug for TypeHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeHandlers")
            .field("inputs", &self.inputs.len())
            .field("outputs", &self.outputs.len())
            .finish()
    }
}

impl TypeHandlers {
    /// Registry with no handlers at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the bool/int/float/string converters.
    pub fn with_defaults() -> Self {
        let mut handlers = Self::new();
        defaults::register(&mut handlers);
        handlers
    }

    /// Register an input converter. At most one may claim an exact type.
    pub fn register_input<F>(&mut self, target: TypeKey, f: F) -> Result<(), RegistrationError>
    where
        F: Fn(&str, &dyn InvocationContext) -> Result<Value, String> + Send + Sync + 'static,
    {
        if self.inputs.contains_key(&target) {
            return Err(RegistrationError::DuplicateInput(target));
        }
        self.inputs.insert(target, Arc::new(f));
        Ok(())
    }

    /// Register an output converter. At most one may claim an exact type.
    pub fn register_output<F>(&mut self, target: TypeKey, f: F) -> Result<(), RegistrationError>
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        if self.outputs.contains_key(&target) {
            return Err(RegistrationError::DuplicateOutput(target));
        }
        self.outputs.insert(target, Arc::new(f));
        Ok(())
    }

    pub(crate) fn set_input(&mut self, target: TypeKey, f: InputFn) {
        self.inputs.insert(target, f);
    }

    pub(crate) fn set_output(&mut self, target: TypeKey, f: OutputFn) {
        self.outputs.insert(target, f);
    }

    /// The exact input converter for a type, if one is registered.
    pub fn resolve_input(&self, target: &TypeKey) -> Option<&InputFn> {
        self.inputs.get(target)
    }

    /// The exact output converter for a type, if one is registered.
    pub fn resolve_output(&self, target: &TypeKey) -> Option<&OutputFn> {
        self.outputs.get(target)
    }

    /// Convert text into a value of the target type.
    ///
    /// Lookup order: exact handler; list fan-out (split on commas, each
    /// piece parsed against the element type); handler registered for an
    /// ancestor of an object type; otherwise
    /// [`ConversionError::NoHandler`]. A handler that refuses its text
    /// surfaces as [`ConversionError::Rejected`], which is distinct so
    /// callers can report "unconvertible type" and "malformed input"
    /// differently.
    pub fn parse(
        &self,
        text: &str,
        target: &TypeKey,
        registry: &TypeRegistry,
        ctx: &dyn InvocationContext,
    ) -> Result<Value, ConversionError> {
        if let Some(input) = self.inputs.get(target) {
            return input(text, ctx).map_err(|reason| ConversionError::Rejected {
                token: text.to_string(),
                reason,
            });
        }

        if let TypeKey::List(elem) = target {
            let mut items = Vec::new();
            for piece in text.split(',') {
                items.push(self.parse(piece, elem, registry, ctx)?);
            }
            return Ok(Value::List(items));
        }

        if let TypeKey::Object(ty) = target {
            for ancestor in registry.ancestry(*ty).into_iter().skip(1) {
                if let Some(input) = self.inputs.get(&TypeKey::Object(ancestor)) {
                    return input(text, ctx).map_err(|reason| ConversionError::Rejected {
                        token: text.to_string(),
                        reason,
                    });
                }
            }
        }

        Err(ConversionError::NoHandler(target.clone()))
    }

    /// Render a value as text. Never fails: falls back to a generic
    /// description (recursive for lists, `"null"` for null, `<TypeName>`
    /// for handler-less objects).
    pub fn render(&self, value: &Value, registry: &TypeRegistry) -> String {
        if let Some(key) = value.type_key() {
            if let Some(output) = self.outputs.get(&key) {
                return output(value);
            }
            if let TypeKey::Object(ty) = &key {
                for ancestor in registry.ancestry(*ty).into_iter().skip(1) {
                    if let Some(output) = self.outputs.get(&TypeKey::Object(ancestor)) {
                        return output(value);
                    }
                }
            }
        }

        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Str(s) => s.clone(),
            Value::List(items) => {
                let rendered: Vec<String> =
                    items.iter().map(|item| self.render(item, registry)).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Object(obj) => format!("<{}>", obj.object_type().name()),
        }
    }
}
