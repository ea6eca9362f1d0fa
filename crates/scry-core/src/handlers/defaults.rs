//! Built-in converters for the primitive leaf types.

use super::TypeHandlers;
use crate::context::InvocationContext;
use crate::value::{TypeKey, Value};

/// Install the bool/int/float/string converters into a fresh registry.
pub(super) fn register(handlers: &mut TypeHandlers) {
    fn input<F>(handlers: &mut TypeHandlers, target: TypeKey, f: F)
    where
        F: Fn(&str, &dyn InvocationContext) -> Result<Value, String> + Send + Sync + 'static,
    {
        handlers.set_input(target, std::sync::Arc::new(f));
    }
    fn output<F>(handlers: &mut TypeHandlers, target: TypeKey, f: F)
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        handlers.set_output(target, std::sync::Arc::new(f));
    }

    input(handlers, TypeKey::Int, |text, _ctx| {
        text.trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| "expected an integer".to_string())
    });
    input(handlers, TypeKey::Float, |text, _ctx| {
        text.trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| "expected a number".to_string())
    });
    input(handlers, TypeKey::Bool, |text, _ctx| {
        match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err("expected 'true' or 'false'".to_string()),
        }
    });
    input(handlers, TypeKey::Str, |text, _ctx| {
        Ok(Value::Str(text.to_string()))
    });

    output(handlers, TypeKey::Int, |value| match value {
        Value::Int(n) => n.to_string(),
        other => format!("{other:?}"),
    });
    output(handlers, TypeKey::Float, |value| match value {
        Value::Float(n) => n.to_string(),
        other => format!("{other:?}"),
    });
    output(handlers, TypeKey::Bool, |value| match value {
        Value::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    });
    output(handlers, TypeKey::Str, |value| match value {
        Value::Str(s) => s.clone(),
        other => format!("{other:?}"),
    });
}

#[cfg(test)]
mod tests {
    use crate::context::NoContext;
    use crate::handlers::TypeHandlers;
    use crate::schema::TypeRegistry;
    use crate::value::{TypeKey, Value};

    #[test]
    fn test_primitive_round_trips() {
        let handlers = TypeHandlers::with_defaults();
        let registry = TypeRegistry::new();

        let cases: Vec<(&str, TypeKey, Value)> = vec![
            ("42", TypeKey::Int, Value::Int(42)),
            ("-3", TypeKey::Int, Value::Int(-3)),
            ("2.5", TypeKey::Float, Value::Float(2.5)),
            ("true", TypeKey::Bool, Value::Bool(true)),
            ("FALSE", TypeKey::Bool, Value::Bool(false)),
            ("hello", TypeKey::Str, Value::Str("hello".into())),
        ];
        for (text, target, expected) in cases {
            let parsed = handlers.parse(text, &target, &registry, &NoContext).unwrap();
            assert_eq!(parsed, expected, "parsing {text:?}");
        }
    }

    #[test]
    fn test_bad_primitive_text_rejected() {
        let handlers = TypeHandlers::with_defaults();
        let registry = TypeRegistry::new();
        assert!(handlers
            .parse("12.5", &TypeKey::Int, &registry, &NoContext)
            .is_err());
        assert!(handlers
            .parse("yes", &TypeKey::Bool, &registry, &NoContext)
            .is_err());
    }
}
