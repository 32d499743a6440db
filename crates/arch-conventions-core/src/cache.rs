//! Memoized access to class models.
//!
//! A [`ClassModelCache`] is an explicitly constructed service shared through
//! `Arc` by every engine that should reuse imports. Entries are populated at
//! most once per `(namespace, import scope)` key and kept until [`reset`].
//!
//! Population is an atomic compute-if-absent per key: the key's slot is
//! obtained under a short map lock, then the slot's own lock is held for the
//! import. Concurrent requests for one key block and receive the same
//! `Arc`; requests for different keys import in parallel.
//!
//! [`reset`]: ClassModelCache::reset

use crate::model::{ClassModel, ImportScope, Namespace};
use crate::provider::{ClassModelProvider, ImportError};

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type CacheKey = (Namespace, ImportScope);
type Slot = Arc<Mutex<Option<Arc<ClassModel>>>>;

/// Process-lifetime memo of imported class models.
pub struct ClassModelCache {
    provider: Arc<dyn ClassModelProvider>,
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

impl ClassModelCache {
    /// Creates an empty cache in front of a provider.
    #[must_use]
    pub fn new(provider: Arc<dyn ClassModelProvider>) -> Self {
        Self {
            provider,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the model for `(namespace, scope)`, importing it on first use.
    ///
    /// Failed imports are not memoized; the next request retries.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the import fails.
    pub fn from(
        &self,
        namespace: &Namespace,
        scope: ImportScope,
    ) -> Result<Arc<ClassModel>, ImportError> {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(
                slots
                    .entry((namespace.clone(), scope))
                    .or_insert_with(|| Arc::new(Mutex::new(None))),
            )
        };

        let mut entry = slot.lock();
        if let Some(model) = entry.as_ref() {
            debug!("Class model cache hit for `{}` ({})", namespace, scope);
            return Ok(Arc::clone(model));
        }

        let model = Arc::new(self.provider.import_classes(namespace, scope)?);
        *entry = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Number of keys holding an imported model.
    #[must_use]
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = self.slots.lock().values().cloned().collect();
        slots.iter().filter(|slot| slot.lock().is_some()).count()
    }

    /// Returns true if no model has been imported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every memoized model.
    ///
    /// Models already handed out stay valid; later requests import again.
    pub fn reset(&self) {
        debug!("Resetting class model cache");
        self.slots.lock().clear();
    }
}

impl std::fmt::Debug for ClassModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassModelCache")
            .field("keys", &self.slots.lock().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TypeInfo, TypeKind};
    use crate::provider::InMemoryProvider;
    use std::sync::Barrier;

    fn fixture() -> (Arc<InMemoryProvider>, ClassModelCache) {
        let provider = Arc::new(InMemoryProvider::new(vec![
            TypeInfo::new("pkg::a::Foo", TypeKind::Struct),
            TypeInfo::new("pkg::a::FooTest", TypeKind::Struct).test_source(),
        ]));
        let cache = ClassModelCache::new(Arc::clone(&provider) as Arc<dyn ClassModelProvider>);
        (provider, cache)
    }

    fn ns(path: &str) -> Namespace {
        Namespace::new(path).unwrap()
    }

    #[test]
    fn same_key_returns_same_instance() {
        let (provider, cache) = fixture();
        let first = cache.from(&ns("pkg::a"), ImportScope::ExcludeTests).unwrap();
        let second = cache.from(&ns("pkg::a"), ImportScope::ExcludeTests).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.import_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_scope_is_a_different_entry() {
        let (provider, cache) = fixture();
        let prod = cache.from(&ns("pkg::a"), ImportScope::ExcludeTests).unwrap();
        let tests = cache.from(&ns("pkg::a"), ImportScope::TestsOnly).unwrap();

        assert!(!Arc::ptr_eq(&prod, &tests));
        assert!(prod.contains("pkg::a::Foo"));
        assert!(tests.contains("pkg::a::FooTest"));
        assert_eq!(provider.import_count(), 2);
    }

    #[test]
    fn reset_forces_reimport() {
        let (provider, cache) = fixture();
        let before = cache.from(&ns("pkg::a"), ImportScope::ExcludeTests).unwrap();
        cache.reset();
        assert!(cache.is_empty());

        let after = cache.from(&ns("pkg::a"), ImportScope::ExcludeTests).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(provider.import_count(), 2);
    }

    #[test]
    fn concurrent_requests_import_once() {
        let (provider, cache) = fixture();
        let cache = Arc::new(cache);
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    cache
                        .from(&Namespace::new("pkg::a").unwrap(), ImportScope::ExcludeTests)
                        .unwrap()
                })
            })
            .collect();

        let models: Vec<Arc<ClassModel>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(provider.import_count(), 1);
        assert!(models.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
