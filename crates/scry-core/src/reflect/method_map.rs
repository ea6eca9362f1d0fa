//! Identifier-to-method maps.
//!
//! A [`MethodMap`] exposes every method reachable on a subject type
//! (declared or inherited) under a human-typeable identifier. Maps are
//! immutable after construction and cached by the
//! [`MethodMapProvider`](crate::reflect::MethodMapProvider).

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::SchemaError;
use crate::schema::{MethodSpec, TypeRegistry};
use crate::value::TypeKey;

/// How same-arity overload ties are broken at call time.
///
/// Arity alone cannot disambiguate two overloads with the same parameter
/// count, so the policy is explicit rather than an accident of map order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// The first-declared candidate wins.
    #[default]
    DeclarationOrder,
    /// A tie aborts evaluation with an ambiguity error.
    Reject,
}

/// Why overload selection failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// The identifier is not in the map
    NotFound,
    /// Every candidate needs more tokens than remain; `required` is the
    /// smallest candidate arity
    NotEnoughTokens {
        /// Smallest parameter count among the candidates
        required: usize,
    },
    /// Several candidates share the chosen arity under [`TieBreak::Reject`]
    Ambiguous {
        /// The tied parameter count
        arity: usize,
        /// Number of tied candidates
        count: usize,
    },
}

/// Mapping from identifier to overload set for one subject type.
pub struct MethodMap {
    subject: TypeKey,
    by_id: FxHashMap<String, Vec<Arc<MethodSpec>>>,
}

impl std::fmt::Debug for MethodMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodMap")
            .field("subject", &self.subject)
            .field("identifiers", &self.by_id.len())
            .finish()
    }
}

impl MethodMap {
    /// Map with no identifiers, for types that expose no methods.
    pub fn empty(subject: TypeKey) -> Self {
        Self {
            subject,
            by_id: FxHashMap::default(),
        }
    }

    /// Build the map for a subject type from the registration table.
    ///
    /// Object types walk their ancestor chain, nearest first, so an
    /// identifier declared on the subject shadows nothing and inherited
    /// overloads order after local ones. A non-object subject yields an
    /// empty map. An object type without a schema is the one hard
    /// failure: it can never support any call.
    pub fn build(subject: TypeKey, registry: &TypeRegistry) -> Result<Self, SchemaError> {
        let ty = match &subject {
            TypeKey::Object(ty) => *ty,
            _ => return Ok(Self::empty(subject)),
        };
        if !registry.contains(&ty) {
            return Err(SchemaError::UnknownType(ty.name()));
        }

        // Group overloads by declared name, in declaration order.
        let mut order: Vec<&'static str> = Vec::new();
        let mut groups: FxHashMap<&'static str, Vec<Arc<MethodSpec>>> = FxHashMap::default();
        for ancestor in registry.ancestry(ty) {
            if let Some(schema) = registry.get(&ancestor) {
                for method in schema.methods() {
                    groups
                        .entry(method.name())
                        .or_insert_with(|| {
                            order.push(method.name());
                            Vec::new()
                        })
                        .push(Arc::clone(method));
                }
            }
        }

        // Derive an identifier per group: accessor prefixes strip unless
        // the stripped form collides with another group's identifier, in
        // which case every collider keeps its unstripped form.
        let desired: Vec<(&'static str, String, String)> = order
            .iter()
            .map(|name| {
                let base = base_identifier(name);
                let id = strip_accessor(name)
                    .map(base_identifier)
                    .unwrap_or_else(|| base.clone());
                (*name, base, id)
            })
            .collect();

        let mut claims: FxHashMap<&str, usize> = FxHashMap::default();
        for (_, _, id) in &desired {
            *claims.entry(id.as_str()).or_default() += 1;
        }

        let mut by_id: FxHashMap<String, Vec<Arc<MethodSpec>>> = FxHashMap::default();
        for (name, base, id) in &desired {
            let id = if claims[id.as_str()] > 1 {
                base.clone()
            } else {
                id.clone()
            };
            by_id
                .entry(id)
                .or_default()
                .extend(groups[name].iter().cloned());
        }

        Ok(Self { subject, by_id })
    }

    /// The type this map was built for.
    pub fn subject(&self) -> &TypeKey {
        &self.subject
    }

    /// True if the identifier is in the map.
    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// The overload set for an identifier, in declaration order.
    /// A miss is `None`, never an error.
    pub fn get_by_id(&self, id: &str) -> Option<&[Arc<MethodSpec>]> {
        self.by_id.get(id).map(Vec::as_slice)
    }

    /// All identifiers in the map, in no particular order.
    pub fn all_ids(&self) -> impl Iterator<Item = &str> {
        self.by_id.keys().map(String::as_str)
    }

    /// Number of identifiers in the map.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True if the map has no identifiers.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Pick the overload for `id` that `available` remaining tokens can
    /// satisfy: greedily the largest arity not exceeding `available`,
    /// ties broken per `tie`.
    pub fn select(
        &self,
        id: &str,
        available: usize,
        tie: TieBreak,
    ) -> Result<&Arc<MethodSpec>, SelectError> {
        let candidates = self.by_id.get(id).ok_or(SelectError::NotFound)?;

        let best = match candidates
            .iter()
            .filter(|m| m.arity() <= available)
            .map(|m| m.arity())
            .max()
        {
            Some(arity) => arity,
            None => {
                let required = candidates.iter().map(|m| m.arity()).min().unwrap_or(0);
                return Err(SelectError::NotEnoughTokens { required });
            }
        };

        let tied: Vec<&Arc<MethodSpec>> =
            candidates.iter().filter(|m| m.arity() == best).collect();
        if tie == TieBreak::Reject && tied.len() > 1 {
            return Err(SelectError::Ambiguous {
                arity: best,
                count: tied.len(),
            });
        }
        Ok(tied[0])
    }
}

/// Lower-cased identifier with underscores removed.
fn base_identifier(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// The remainder of a read-accessor name, if the name carries one.
///
/// Recognizes `get_x`/`is_x` (snake case) and `getX`/`get1` (camel case);
/// a prefix followed by a lowercase letter is part of the word, not an
/// accessor.
fn strip_accessor(name: &str) -> Option<&str> {
    for prefix in ["get", "is"] {
        if let Some(rest) = name.strip_prefix(prefix) {
            if let Some(snake) = rest.strip_prefix('_') {
                if !snake.is_empty() {
                    return Some(snake);
                }
            } else if rest
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            {
                return Some(rest);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TypeSchema;
    use crate::value::Value;

    struct Probe;

    fn map_for(schema: TypeSchema) -> MethodMap {
        let subject = TypeKey::Object(schema.object_type());
        let mut registry = TypeRegistry::new();
        registry.register(schema).unwrap();
        MethodMap::build(subject, &registry).unwrap()
    }

    fn noop(_recv: &Value, _args: &[Value]) -> Result<Value, String> {
        Ok(Value::Null)
    }

    #[test]
    fn test_accessor_prefix_stripped() {
        let map = map_for(
            TypeSchema::new::<Probe>("Probe")
                .method("get_some_numbers", [], TypeKey::list(TypeKey::Int), noop)
                .method("is_active", [], TypeKey::Bool, noop),
        );
        assert!(map.contains_id("somenumbers"));
        assert!(map.contains_id("active"));
        assert!(!map.contains_id("getsomenumbers"));
    }

    #[test]
    fn test_plain_name_lowercased() {
        let map = map_for(
            TypeSchema::new::<Probe>("Probe").method("instance_count", [], TypeKey::Int, noop),
        );
        // "is"-prefix followed by lowercase is part of the word.
        assert!(map.contains_id("instancecount"));
    }

    #[test]
    fn test_strip_collision_keeps_unstripped() {
        let map = map_for(
            TypeSchema::new::<Probe>("Probe")
                .method("get_mode", [], TypeKey::Str, noop)
                .method("is_mode", [], TypeKey::Bool, noop),
        );
        assert!(map.contains_id("getmode"));
        assert!(map.contains_id("ismode"));
        assert!(!map.contains_id("mode"));
    }

    #[test]
    fn test_strip_collision_with_plain_name() {
        let map = map_for(
            TypeSchema::new::<Probe>("Probe")
                .method("get_status", [], TypeKey::Str, noop)
                .method("status", [], TypeKey::Int, noop),
        );
        assert!(map.contains_id("getstatus"));
        assert!(map.contains_id("status"));
        assert_eq!(map.get_by_id("status").unwrap().len(), 1);
    }

    #[test]
    fn test_overloads_share_identifier() {
        let map = map_for(
            TypeSchema::new::<Probe>("Probe")
                .method("scale", [TypeKey::Int], TypeKey::Int, noop)
                .method("scale", [TypeKey::Int, TypeKey::Int], TypeKey::Int, noop),
        );
        assert_eq!(map.get_by_id("scale").unwrap().len(), 2);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_select_greedy_arity() {
        let map = map_for(
            TypeSchema::new::<Probe>("Probe")
                .method("scale", [TypeKey::Int], TypeKey::Int, noop)
                .method("scale", [TypeKey::Int, TypeKey::Int], TypeKey::Int, noop),
        );
        let picked = map.select("scale", 2, TieBreak::DeclarationOrder).unwrap();
        assert_eq!(picked.arity(), 2);
        let picked = map.select("scale", 1, TieBreak::DeclarationOrder).unwrap();
        assert_eq!(picked.arity(), 1);
    }

    #[test]
    fn test_select_not_enough_tokens() {
        let map = map_for(TypeSchema::new::<Probe>("Probe").method(
            "configure",
            vec![TypeKey::Int; 7],
            TypeKey::Int,
            noop,
        ));
        let err = map
            .select("configure", 2, TieBreak::DeclarationOrder)
            .unwrap_err();
        assert_eq!(err, SelectError::NotEnoughTokens { required: 7 });
    }

    #[test]
    fn test_select_tie_break() {
        let schema = TypeSchema::new::<Probe>("Probe")
            .method("emit", [TypeKey::Int], TypeKey::Int, |_r, _a| {
                Ok(Value::Int(1))
            })
            .method("emit", [TypeKey::Str], TypeKey::Int, |_r, _a| {
                Ok(Value::Int(2))
            });
        let map = map_for(schema);

        let first = map.select("emit", 1, TieBreak::DeclarationOrder).unwrap();
        assert_eq!(first.invoke(&Value::Null, &[]).unwrap(), Value::Int(1));

        let err = map.select("emit", 1, TieBreak::Reject).unwrap_err();
        assert_eq!(err, SelectError::Ambiguous { arity: 1, count: 2 });
    }

    #[test]
    fn test_unknown_identifier_is_none() {
        let map = map_for(TypeSchema::new::<Probe>("Probe"));
        assert!(map.get_by_id("missing").is_none());
        let err = map
            .select("missing", 0, TieBreak::DeclarationOrder)
            .unwrap_err();
        assert_eq!(err, SelectError::NotFound);
    }

    #[test]
    fn test_non_object_subject_is_empty() {
        let registry = TypeRegistry::new();
        let map = MethodMap::build(TypeKey::Int, &registry).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_unregistered_object_is_hard_failure() {
        let registry = TypeRegistry::new();
        let subject = TypeKey::object::<Probe>("Probe");
        let err = MethodMap::build(subject, &registry).unwrap_err();
        assert_eq!(err, SchemaError::UnknownType("Probe"));
    }
}
