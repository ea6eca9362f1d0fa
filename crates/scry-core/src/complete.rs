//! Tab completion over chain resolution.
//!
//! Replays the evaluator's resolution walk (identifier lookup and
//! argument-span accounting) without converting the final partial token
//! and without invoking anything, then offers the identifiers valid at
//! the cursor position the typed tokens imply.

use crate::error::SchemaError;
use crate::reflect::{MethodMap, MethodMapProvider, TieBreak};
use crate::schema::TypeRegistry;
use crate::value::TypeKey;

/// One-shot completion pass borrowing the host's shared state.
#[derive(Debug, Clone, Copy)]
pub struct CompletionEngine<'a> {
    registry: &'a TypeRegistry,
    provider: &'a MethodMapProvider,
}

impl<'a> CompletionEngine<'a> {
    /// Borrow the shared state a completion pass walks over.
    pub fn new(registry: &'a TypeRegistry, provider: &'a MethodMapProvider) -> Self {
        Self { registry, provider }
    }

    /// Candidate identifiers for the last (possibly empty) token.
    ///
    /// The walk reconstructs the same cursor-type progression evaluation
    /// would take. A non-final token that matches no identifier yields
    /// the match set for that position; a final token covered by a
    /// pending argument span yields nothing. An empty token sequence
    /// yields the starting type's full identifier set. Matching is
    /// case-insensitive against the lower-cased identifiers; results are
    /// sorted.
    pub fn complete(
        &self,
        start: &TypeKey,
        tokens: &[&str],
    ) -> Result<Vec<String>, SchemaError> {
        let mut map = self.provider.map_for(start, self.registry)?;

        if tokens.is_empty() {
            return Ok(matching_ids(&map, ""));
        }

        let last = tokens.len() - 1;
        let mut pos = 0;
        while pos < last {
            let token = tokens[pos];
            if !map.contains_id(token) {
                return Ok(matching_ids(&map, token));
            }

            // Overload choice mirrors evaluation: greedy arity over every
            // remaining token, first-declared on ties. Ambiguity never
            // aborts a completion pass.
            let available = tokens.len() - pos - 1;
            let method = match map.select(token, available, TieBreak::DeclarationOrder) {
                Ok(method) => method,
                Err(_) => return Ok(Vec::new()),
            };

            let skip = method.arity();
            if pos + 1 + skip > last {
                // The final token is an argument, not an identifier.
                return Ok(Vec::new());
            }

            let returns = method.returns().clone();
            pos += 1 + skip;
            map = self.provider.map_for(&returns, self.registry)?;
        }

        Ok(matching_ids(&map, tokens[last]))
    }
}

fn matching_ids(map: &MethodMap, partial: &str) -> Vec<String> {
    let partial = partial.to_ascii_lowercase();
    let mut ids: Vec<String> = map
        .all_ids()
        .filter(|id| id.starts_with(&partial))
        .map(str::to_string)
        .collect();
    ids.sort_unstable();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TypeSchema;
    use crate::value::Value;

    struct Outer;
    struct Inner;

    fn state() -> (TypeRegistry, MethodMapProvider, TypeKey) {
        let inner = TypeSchema::new::<Inner>("Inner")
            .method("get_depth", [], TypeKey::Int, |_r, _a| Ok(Value::Int(2)));
        let inner_ty = inner.object_type();

        let outer = TypeSchema::new::<Outer>("Outer")
            .method("get_inner", [], TypeKey::Object(inner_ty), move |_r, _a| {
                Ok(Value::object(inner_ty, Inner))
            })
            .method("get_name", [], TypeKey::Str, |_r, _a| {
                Ok(Value::Str("outer".into()))
            })
            .method("nudge", [TypeKey::Int], TypeKey::Int, |_r, _a| {
                Ok(Value::Int(0))
            });
        let start = TypeKey::Object(outer.object_type());

        let mut registry = TypeRegistry::new();
        registry.register(inner).unwrap();
        registry.register(outer).unwrap();
        (registry, MethodMapProvider::new(), start)
    }

    #[test]
    fn test_empty_tokens_full_id_set() {
        let (registry, provider, start) = state();
        let engine = CompletionEngine::new(&registry, &provider);
        let ids = engine.complete(&start, &[]).unwrap();
        assert_eq!(ids, vec!["inner", "name", "nudge"]);
    }

    #[test]
    fn test_prefix_filter() {
        let (registry, provider, start) = state();
        let engine = CompletionEngine::new(&registry, &provider);
        let ids = engine.complete(&start, &["n"]).unwrap();
        assert_eq!(ids, vec!["name", "nudge"]);
        let ids = engine.complete(&start, &["NU"]).unwrap();
        assert_eq!(ids, vec!["nudge"]);
    }

    #[test]
    fn test_chain_progression() {
        let (registry, provider, start) = state();
        let engine = CompletionEngine::new(&registry, &provider);
        let ids = engine.complete(&start, &["inner", ""]).unwrap();
        assert_eq!(ids, vec!["depth"]);
        let ids = engine.complete(&start, &["inner", "d"]).unwrap();
        assert_eq!(ids, vec!["depth"]);
    }

    #[test]
    fn test_unresolved_position_returns_its_match_set() {
        let (registry, provider, start) = state();
        let engine = CompletionEngine::new(&registry, &provider);
        // "n" is itself only a prefix; completion answers for that
        // position instead of walking further.
        let ids = engine.complete(&start, &["n", "depth"]).unwrap();
        assert_eq!(ids, vec!["name", "nudge"]);
    }

    #[test]
    fn test_argument_span_suppresses_completion() {
        let (registry, provider, start) = state();
        let engine = CompletionEngine::new(&registry, &provider);
        let ids = engine.complete(&start, &["nudge", "4"]).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_after_arguments_next_type_completes() {
        let (registry, provider, start) = state();
        let engine = CompletionEngine::new(&registry, &provider);
        // nudge consumes one argument and returns an int, which has no
        // methods to offer.
        let ids = engine.complete(&start, &["nudge", "4", ""]).unwrap();
        assert!(ids.is_empty());
    }
}
