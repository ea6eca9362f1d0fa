//! Dynamic value and type identity model.
//!
//! Every cursor position in a chain holds a [`Value`]; every dispatch
//! decision (method maps, type handlers) is keyed by a [`TypeKey`].
//! Object payloads are type-erased behind `Arc<dyn Any>` and recovered
//! through [`ObjectType`] tokens registered in the schema table.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Identity token for a registered host object type.
///
/// Pairs the Rust `TypeId` with a stable display name. Two tokens are
/// equal only if both the type and the name match, so a type registered
/// under one name cannot be confused with itself under another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectType {
    id: TypeId,
    name: &'static str,
}

impl ObjectType {
    /// Create the token for a concrete Rust type under the given display name.
    pub fn of<T: Any + Send + Sync>(name: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name,
        }
    }

    /// The display name this type was registered under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The underlying Rust type id.
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type identity the whole system dispatches on.
///
/// Method maps are built per `TypeKey`; type handlers are registered per
/// `TypeKey`. `List` composes over its element key, which is what makes
/// comma fan-out parsing and recursive rendering possible.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// Owned string
    Str,
    /// Homogeneous list of the element key
    List(Box<TypeKey>),
    /// Registered host object type
    Object(ObjectType),
}

impl TypeKey {
    /// Shorthand for a list key over `elem`.
    pub fn list(elem: TypeKey) -> Self {
        TypeKey::List(Box::new(elem))
    }

    /// Shorthand for the object key of a concrete Rust type.
    pub fn object<T: Any + Send + Sync>(name: &'static str) -> Self {
        TypeKey::Object(ObjectType::of::<T>(name))
    }

    /// True if this is an object key.
    pub fn is_object(&self) -> bool {
        matches!(self, TypeKey::Object(_))
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Bool => f.write_str("bool"),
            TypeKey::Int => f.write_str("int"),
            TypeKey::Float => f.write_str("float"),
            TypeKey::Str => f.write_str("string"),
            TypeKey::List(elem) => write!(f, "list<{}>", elem),
            TypeKey::Object(ty) => f.write_str(ty.name()),
        }
    }
}

/// Shared reference to a type-erased host object.
#[derive(Clone)]
pub struct ObjectRef {
    ty: ObjectType,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ObjectRef {
    /// Wrap a value under its registered type token.
    ///
    /// The token must have been created for the same concrete type;
    /// a mismatched token would make every later downcast fail.
    pub fn new<T: Any + Send + Sync>(ty: ObjectType, value: T) -> Self {
        debug_assert_eq!(ty.type_id(), TypeId::of::<T>());
        Self {
            ty,
            inner: Arc::new(value),
        }
    }

    /// Wrap an already-shared value under its registered type token.
    pub fn from_arc<T: Any + Send + Sync>(ty: ObjectType, value: Arc<T>) -> Self {
        debug_assert_eq!(ty.type_id(), TypeId::of::<T>());
        Self { ty, inner: value }
    }

    /// The type token this object was wrapped under.
    pub fn object_type(&self) -> ObjectType {
        self.ty
    }

    /// Borrow the payload as its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("type", &self.ty.name())
            .finish()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Dynamic value held at a cursor position.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value; calling anything on it terminates the chain.
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Owned string
    Str(String),
    /// Homogeneous list
    List(Vec<Value>),
    /// Registered host object
    Object(ObjectRef),
}

impl Value {
    /// Wrap a host object value under its registered type token.
    pub fn object<T: Any + Send + Sync>(ty: ObjectType, value: T) -> Self {
        Value::Object(ObjectRef::new(ty, value))
    }

    /// Wrap a shared host object under its registered type token.
    pub fn object_arc<T: Any + Send + Sync>(ty: ObjectType, value: Arc<T>) -> Self {
        Value::Object(ObjectRef::from_arc(ty, value))
    }

    /// True for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The runtime type key of this value.
    ///
    /// `None` for null and for an empty list, whose element type cannot
    /// be recovered from the value alone.
    pub fn type_key(&self) -> Option<TypeKey> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(TypeKey::Bool),
            Value::Int(_) => Some(TypeKey::Int),
            Value::Float(_) => Some(TypeKey::Float),
            Value::Str(_) => Some(TypeKey::Str),
            Value::List(items) => items
                .first()
                .and_then(Value::type_key)
                .map(TypeKey::list),
            Value::Object(obj) => Some(TypeKey::Object(obj.object_type())),
        }
    }

    /// Borrow an object payload as its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Object(obj) => obj.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Float payload, if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Bool payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// List payload, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}
