//! Process-scoped method map cache.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::SchemaError;
use crate::reflect::MethodMap;
use crate::schema::TypeRegistry;
use crate::value::TypeKey;

/// Lazily-populated cache of [`MethodMap`]s keyed by subject type.
///
/// Explicit state owned by the host (no implicit singleton), shared by
/// reference across all concurrent evaluations. First access to a key
/// builds its map under the DashMap shard lock, so each map is built
/// exactly once; later accesses are lock-free reads. Growth is bounded by
/// the registered type universe, so entries never expire; [`invalidate`]
/// and [`clear`] exist for tests and for hosts that rebuild schemas.
///
/// [`invalidate`]: MethodMapProvider::invalidate
/// [`clear`]: MethodMapProvider::clear
#[derive(Debug, Default)]
pub struct MethodMapProvider {
    cache: DashMap<TypeKey, Arc<MethodMap>>,
}

impl MethodMapProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached map for a subject type, building it on first access.
    ///
    /// A build failure is not cached; an object type that gains a schema
    /// after an invalidation can succeed later.
    pub fn map_for(
        &self,
        subject: &TypeKey,
        registry: &TypeRegistry,
    ) -> Result<Arc<MethodMap>, SchemaError> {
        match self.cache.entry(subject.clone()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let map = Arc::new(MethodMap::build(subject.clone(), registry)?);
                entry.insert(Arc::clone(&map));
                Ok(map)
            }
        }
    }

    /// Drop the cached map for one subject type. Returns true if an entry
    /// was present.
    pub fn invalidate(&self, subject: &TypeKey) -> bool {
        self.cache.remove(subject).is_some()
    }

    /// Drop every cached map.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Number of cached maps.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// True if nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
