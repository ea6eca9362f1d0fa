//! Shared fixture graph for the integration suites: a `Probe` object
//! with numeric getters, a navigable sub-object, a null-returning
//! method, overloads, and a 7-parameter method.

#![allow(dead_code)]

use std::sync::Arc;

use scry_core::{Inspector, ObjectType, TieBreak, TypeKey, TypeSchema, Value};

pub struct Probe {
    pub some: i64,
    pub random: i64,
    pub numbers: i64,
    pub sub: Arc<SubProbe>,
}

pub struct SubProbe;

/// Deliberately never registered; reaching it mid-chain is a hard failure.
pub struct Mystery;

pub fn probe_ty() -> ObjectType {
    ObjectType::of::<Probe>("Probe")
}

pub fn sub_ty() -> ObjectType {
    ObjectType::of::<SubProbe>("SubProbe")
}

pub fn mystery_ty() -> ObjectType {
    ObjectType::of::<Mystery>("Mystery")
}

fn probe_schema() -> TypeSchema {
    TypeSchema::new::<Probe>("Probe")
        .method(
            "get_some_numbers",
            [],
            TypeKey::list(TypeKey::Int),
            |recv, _args| {
                let probe: &Probe = recv.downcast_ref().ok_or("expected a Probe")?;
                Ok(Value::List(vec![
                    Value::Int(probe.some),
                    Value::Int(probe.random),
                    Value::Int(probe.numbers),
                ]))
            },
        )
        .method(
            "get_numbers_plus_param",
            [TypeKey::Int],
            TypeKey::list(TypeKey::Int),
            |recv, args| {
                let probe: &Probe = recv.downcast_ref().ok_or("expected a Probe")?;
                let param = args[0].as_int().ok_or("expected an int")?;
                Ok(Value::List(vec![
                    Value::Int(probe.some),
                    Value::Int(probe.random),
                    Value::Int(probe.numbers),
                    Value::Int(param),
                ]))
            },
        )
        .method(
            "get_sub_probe",
            [],
            TypeKey::Object(sub_ty()),
            |recv, _args| {
                let probe: &Probe = recv.downcast_ref().ok_or("expected a Probe")?;
                Ok(Value::object_arc(sub_ty(), Arc::clone(&probe.sub)))
            },
        )
        .method(
            "always_returns_null",
            [],
            TypeKey::list(TypeKey::Int),
            |_recv, _args| Ok(Value::Null),
        )
        .method(
            "configure",
            vec![TypeKey::Int; 7],
            TypeKey::Bool,
            |_recv, _args| Ok(Value::Bool(true)),
        )
        .method("fail_hard", [], TypeKey::Int, |_recv, _args| {
            Err("cursed hardware".to_string())
        })
        .method(
            "get_mystery",
            [],
            TypeKey::Object(mystery_ty()),
            |_recv, _args| Ok(Value::object(mystery_ty(), Mystery)),
        )
        .method("scale", [TypeKey::Int], TypeKey::Int, |recv, args| {
            let probe: &Probe = recv.downcast_ref().ok_or("expected a Probe")?;
            let a = args[0].as_int().ok_or("expected an int")?;
            Ok(Value::Int(probe.some * a))
        })
        .method(
            "scale",
            [TypeKey::Int, TypeKey::Int],
            TypeKey::Int,
            |recv, args| {
                let probe: &Probe = recv.downcast_ref().ok_or("expected a Probe")?;
                let a = args[0].as_int().ok_or("expected an int")?;
                let b = args[1].as_int().ok_or("expected an int")?;
                Ok(Value::Int(probe.some * a + b))
            },
        )
}

fn sub_schema() -> TypeSchema {
    TypeSchema::new::<SubProbe>("SubProbe").method(
        "get_1234",
        [TypeKey::Int],
        TypeKey::list(TypeKey::Int),
        |_recv, args| {
            let n = args[0].as_int().ok_or("expected an int")?;
            Ok(Value::List(vec![
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
                Value::Int(4),
                Value::Int(n),
            ]))
        },
    )
}

pub fn inspector() -> Inspector {
    Inspector::builder()
        .schema(probe_schema())
        .schema(sub_schema())
        .build()
        .expect("fixture registrations are unique")
}

pub fn inspector_rejecting_ties() -> Inspector {
    let ambiguous = TypeSchema::new::<SubProbe>("SubProbe")
        .method("emit", [TypeKey::Int], TypeKey::Int, |_r, _a| {
            Ok(Value::Int(1))
        })
        .method("emit", [TypeKey::Str], TypeKey::Int, |_r, _a| {
            Ok(Value::Int(2))
        });
    Inspector::builder()
        .schema(probe_schema())
        .schema(ambiguous)
        .tie_break(TieBreak::Reject)
        .build()
        .expect("fixture registrations are unique")
}

pub fn start() -> Value {
    Value::object(
        probe_ty(),
        Probe {
            some: 11,
            random: 22,
            numbers: 33,
            sub: Arc::new(SubProbe),
        },
    )
}

pub fn ints(values: &[i64]) -> Value {
    Value::List(values.iter().copied().map(Value::Int).collect())
}
