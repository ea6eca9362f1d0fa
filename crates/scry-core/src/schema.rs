//! Per-type registration tables.
//!
//! Rust has no general runtime reflection, so "a value that can enumerate
//! its invocable operations by name and invoke one by name with typed
//! arguments" is reified as an explicit table the host builds at startup:
//! one [`TypeSchema`] per object type, each declaring its methods and an
//! optional parent link for inherited lookups.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::RegistrationError;
use crate::value::{ObjectType, TypeKey, Value};

/// Invocation body of a declared method.
///
/// Receives the receiver value and the already-converted arguments, one
/// per declared parameter. Failures are reported as plain reason text and
/// wrapped into [`InvocationError`](crate::error::InvocationError) by the
/// evaluator.
pub type InvokeFn = Arc<dyn Fn(&Value, &[Value]) -> Result<Value, String> + Send + Sync>;

/// One declared method on an object type.
#[derive(Clone)]
pub struct MethodSpec {
    name: &'static str,
    params: Vec<TypeKey>,
    returns: TypeKey,
    invoke: InvokeFn,
}

impl MethodSpec {
    /// Declare a method with its parameter types, static return type, and body.
    pub fn new<F>(
        name: &'static str,
        params: impl Into<Vec<TypeKey>>,
        returns: TypeKey,
        invoke: F,
    ) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name,
            params: params.into(),
            returns,
            invoke: Arc::new(invoke),
        }
    }

    /// The declared (source-level) name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameter types, in order.
    pub fn params(&self) -> &[TypeKey] {
        &self.params
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Static return type; becomes the cursor type after invocation.
    pub fn returns(&self) -> &TypeKey {
        &self.returns
    }

    /// Invoke the body on a receiver with converted arguments.
    pub fn invoke(&self, receiver: &Value, args: &[Value]) -> Result<Value, String> {
        (self.invoke)(receiver, args)
    }
}

impl fmt::Debug for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodSpec")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish()
    }
}

/// Registration-table entry for one object type.
#[derive(Debug, Clone)]
pub struct TypeSchema {
    ty: ObjectType,
    parent: Option<ObjectType>,
    methods: Vec<Arc<MethodSpec>>,
}

impl TypeSchema {
    /// Start a schema for a concrete Rust type under a display name.
    pub fn new<T: Any + Send + Sync>(name: &'static str) -> Self {
        Self {
            ty: ObjectType::of::<T>(name),
            parent: None,
            methods: Vec::new(),
        }
    }

    /// Link a parent type whose methods and handlers this type inherits.
    pub fn extends(mut self, parent: ObjectType) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Declare a method. Declaration order is significant: it is the
    /// documented tie-break for same-arity overloads.
    pub fn method<F>(
        mut self,
        name: &'static str,
        params: impl Into<Vec<TypeKey>>,
        returns: TypeKey,
        invoke: F,
    ) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.methods
            .push(Arc::new(MethodSpec::new(name, params, returns, invoke)));
        self
    }

    /// The type token this schema describes.
    pub fn object_type(&self) -> ObjectType {
        self.ty
    }

    /// The parent link, if any.
    pub fn parent(&self) -> Option<ObjectType> {
        self.parent
    }

    /// Declared methods in declaration order.
    pub fn methods(&self) -> &[Arc<MethodSpec>] {
        &self.methods
    }
}

/// All registered schemas, keyed by object type.
///
/// Fully populated before any evaluation begins; read-only at steady
/// state.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    schemas: FxHashMap<ObjectType, TypeSchema>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema. At most one schema may claim an object type.
    pub fn register(&mut self, schema: TypeSchema) -> Result<(), RegistrationError> {
        let ty = schema.object_type();
        if self.schemas.contains_key(&ty) {
            return Err(RegistrationError::DuplicateSchema(ty.name()));
        }
        self.schemas.insert(ty, schema);
        Ok(())
    }

    /// Look up the schema for an object type.
    pub fn get(&self, ty: &ObjectType) -> Option<&TypeSchema> {
        self.schemas.get(ty)
    }

    /// True if a schema is registered for the type.
    pub fn contains(&self, ty: &ObjectType) -> bool {
        self.schemas.contains_key(ty)
    }

    /// The type followed by its ancestors, nearest first.
    ///
    /// Stops at a missing parent schema or at a cycle.
    pub fn ancestry(&self, ty: ObjectType) -> Vec<ObjectType> {
        let mut chain = vec![ty];
        let mut current = ty;
        while let Some(parent) = self.get(&current).and_then(TypeSchema::parent) {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// True if no schema is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
