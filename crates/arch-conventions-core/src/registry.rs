//! Type-keyed singleton store of rule families.
//!
//! One [`ConfigurerRegistry`] lives for one engine assembly session. It holds
//! at most one instance per concrete family type, in insertion order, so two
//! parent families resolving the same nested family observe the same
//! instance and the same accumulated rules.
//!
//! Assembly is single-threaded; families are shared as `Rc<RefCell<_>>`.

use crate::descriptor::RuleDescriptor;
use crate::family::{Configurer, RuleFamily};

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use tracing::debug;

/// Stable identity of a family type.
#[derive(Debug, Clone, Copy)]
pub struct FamilyKey {
    id: TypeId,
    name: &'static str,
}

impl FamilyKey {
    /// Key of family type `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Rust type name of the family.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for FamilyKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FamilyKey {}

impl Hash for FamilyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for FamilyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

struct Entry {
    key: FamilyKey,
    instance: Rc<dyn Any>,
    configurer: Rc<RefCell<dyn Configurer>>,
}

/// Insertion-ordered map from family type to its canonical instance.
#[derive(Default)]
pub struct ConfigurerRegistry {
    entries: RefCell<Vec<Entry>>,
}

impl ConfigurerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `candidate` unless an instance of `T` already exists.
    ///
    /// Returns the canonical instance. A losing candidate is dropped and its
    /// state is never visible through the registry.
    pub fn get_or_apply<T: RuleFamily>(&self, candidate: T) -> Family<T> {
        if let Some(existing) = self.get::<T>() {
            debug!(
                "Family `{}` already registered, discarding candidate with {} rule(s)",
                T::NAME,
                candidate.rule_set().len()
            );
            return existing;
        }
        self.insert(candidate)
    }

    /// Returns the instance of `T`, constructing it on first use.
    ///
    /// `T::new` runs only when no instance is stored yet.
    pub fn get_or_create<T: RuleFamily>(&self, context: &ConfigurerContext) -> Family<T> {
        if let Some(existing) = self.get::<T>() {
            return existing;
        }
        let created = T::new(context.clone());
        // `new` may have resolved families itself; keep the first stored one.
        self.get_or_apply(created)
    }

    /// Returns the stored instance of `T`, if any.
    #[must_use]
    pub fn get<T: RuleFamily>(&self) -> Option<Family<T>> {
        let key = FamilyKey::of::<T>();
        let entries = self.entries.borrow();
        entries
            .iter()
            .find(|e| e.key == key)
            .and_then(|e| Rc::clone(&e.instance).downcast::<RefCell<T>>().ok())
            .map(|inner| Family { inner })
    }

    /// Returns true if an instance of `T` is stored.
    #[must_use]
    pub fn contains<T: RuleFamily>(&self) -> bool {
        self.contains_key(&FamilyKey::of::<T>())
    }

    /// Returns true if a family with this key is stored.
    #[must_use]
    pub fn contains_key(&self, key: &FamilyKey) -> bool {
        self.entries.borrow().iter().any(|e| &e.key == key)
    }

    /// All stored families, in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<Rc<RefCell<dyn Configurer>>> {
        self.entries
            .borrow()
            .iter()
            .map(|e| Rc::clone(&e.configurer))
            .collect()
    }

    /// Keys of all stored families, in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<FamilyKey> {
        self.entries.borrow().iter().map(|e| e.key).collect()
    }

    /// Number of stored families.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if no family is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rules of every family, flattened in registration order.
    #[must_use]
    pub fn flatten(&self) -> Vec<RuleDescriptor> {
        self.all()
            .iter()
            .flat_map(|c| c.borrow().rules().to_vec())
            .collect()
    }

    /// Disables the family stored under `key`.
    ///
    /// Absent keys are a no-op; nothing is constructed. A family that is
    /// already borrowed, e.g. because it is the one currently disabling its
    /// subtree, is skipped.
    pub fn disable(&self, key: &FamilyKey) {
        let configurer = self
            .entries
            .borrow()
            .iter()
            .find(|e| &e.key == key)
            .map(|e| Rc::clone(&e.configurer));

        let Some(configurer) = configurer else {
            debug!("Family `{}` not registered, nothing to disable", key);
            return;
        };

        match configurer.try_borrow_mut() {
            Ok(mut family) => {
                debug!("Disabling family `{}`", family.family_name());
                family.disable();
            }
            Err(_) => debug!("Family `{}` is in use, skipping disable", key),
        };
    }

    fn insert<T: RuleFamily>(&self, family: T) -> Family<T> {
        let inner = Rc::new(RefCell::new(family));
        let configurer: Rc<RefCell<dyn Configurer>> = inner.clone();
        let instance: Rc<dyn Any> = inner.clone();
        debug!("Registering family `{}`", T::NAME);
        self.entries.borrow_mut().push(Entry {
            key: FamilyKey::of::<T>(),
            instance,
            configurer,
        });
        Family { inner }
    }
}

impl fmt::Debug for ConfigurerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

/// Handle threaded into every family of one assembly session.
///
/// Carries only the registry. The global namespace is read from the engine
/// when rules are resolved, so it may be set before or after families are
/// configured.
#[derive(Debug, Clone, Default)]
pub struct ConfigurerContext {
    registry: Rc<ConfigurerRegistry>,
}

impl ConfigurerContext {
    /// Creates a context over a shared registry.
    #[must_use]
    pub fn new(registry: Rc<ConfigurerRegistry>) -> Self {
        Self { registry }
    }

    /// The shared registry.
    #[must_use]
    pub fn registry(&self) -> &Rc<ConfigurerRegistry> {
        &self.registry
    }

    /// Resolves family `T` through the registry.
    pub fn family<T: RuleFamily>(&self) -> Family<T> {
        self.registry.get_or_create::<T>(self)
    }
}

/// Shared handle to the canonical instance of a family.
///
/// # Panics
///
/// [`configure`](Self::configure) and [`disable`](Self::disable) borrow the
/// family mutably. Calling either on a family from inside its own
/// `configure` callback panics.
pub struct Family<T> {
    inner: Rc<RefCell<T>>,
}

impl<T: RuleFamily> Family<T> {
    /// Runs `f` with mutable access to the family.
    pub fn configure<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }

    /// Runs `f` with shared access to the family.
    pub fn inspect<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// Snapshot of the family's rules.
    #[must_use]
    pub fn rules(&self) -> Vec<RuleDescriptor> {
        self.inner.borrow().rule_set().descriptors().to_vec()
    }

    /// Clears the family's rules and those of its nested families.
    pub fn disable(&self) {
        Configurer::disable(&mut *self.inner.borrow_mut());
    }

    /// Returns true if both handles point at the same instance.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Family<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: RuleFamily> fmt::Debug for Family<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Family").field("name", &T::NAME).finish()
    }
}
