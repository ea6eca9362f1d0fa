//! Scry core: walk a live object graph from text.
//!
//! An operator types a flat chain of tokens; the evaluator resolves each
//! token to a method on the current cursor object, converts the following
//! tokens into that method's arguments, invokes it, and moves the cursor
//! to the result. The pieces:
//!
//! - a per-type registration table ([`schema`]) standing in for runtime
//!   reflection;
//! - cached [`reflect::MethodMap`]s exposing each type's methods under
//!   human-typeable identifiers;
//! - a [`handlers::TypeHandlers`] registry converting text to typed
//!   values and values back to text;
//! - the [`chain::ChainEvaluator`] and the [`complete::CompletionEngine`]
//!   that walk token sequences, with and without invocation;
//! - the [`inspector::Inspector`] facade bundling it all behind
//!   `evaluate` / `complete` / `render`.
//!
//! The host owns tokenization, starting instances, and the output
//! channel; this crate is an in-process library boundary only.

#![warn(rust_2018_idioms)]

pub mod chain;
pub mod complete;
pub mod context;
pub mod error;
pub mod handlers;
pub mod inspector;
pub mod reflect;
pub mod schema;
pub mod value;

pub use chain::{ChainEvaluator, ChainOutcome};
pub use complete::CompletionEngine;
pub use context::{InvocationContext, NoContext};
pub use error::{
    ConversionError, EvalError, InputError, InvocationError, RegistrationError, SchemaError,
};
pub use handlers::TypeHandlers;
pub use inspector::{Inspector, InspectorBuilder};
pub use reflect::{MethodMap, MethodMapProvider, TieBreak};
pub use schema::{MethodSpec, TypeRegistry, TypeSchema};
pub use value::{ObjectRef, ObjectType, TypeKey, Value};
