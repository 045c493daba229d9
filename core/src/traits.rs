//! Core traits defining keepsake interfaces
//!
//! These traits define the contracts between the persistence layer, the
//! application's state type and user supplied migrations.

use serde::{de::DeserializeOwned, Serialize};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

/// Result type for keepsake operations
pub type KeepsakeResult<T> = Result<T, crate::error::KeepsakeError>;

/// Action delivered to a reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<A> {
    /// Dispatched exactly once when a store is created
    Init,
    /// Any application action
    Dispatch(A),
}

impl<A> Action<A> {
    pub fn is_init(&self) -> bool {
        matches!(self, Action::Init)
    }
}

/// Pure reducer: `(action, previous state) -> new state`
pub type Reducer<S, A> = Box<dyn Fn(&Action<A>, Option<&S>) -> S>;

/// Decides whether a new state is worth writing to disk
pub trait SkipPersist: PartialEq {
    /// Called on the previous state with the freshly reduced one.
    /// Returning true leaves the on-disk snapshot untouched.
    fn should_skip_persist(&self, next: &Self) -> bool {
        self == next
    }
}

/// A state type that can be persisted by keepsake
pub trait PersistState: Serialize + DeserializeOwned + PartialEq + Clone + SkipPersist + 'static {}

/// Migration from an older snapshot file to the current state type
pub trait Migratable {
    type NewState: PersistState;

    /// Build the new state from the snapshot file written by the old schema
    fn migrate(&self, old_snapshot: &Path) -> KeepsakeResult<Self::NewState>;
}

/// Object safe view of a [`Migratable`], so migrations producing different
/// state types can live in one registry
pub trait ErasedMigration: Send + Sync {
    fn migrate_erased(&self, old_snapshot: &Path) -> KeepsakeResult<Box<dyn Any>>;

    /// Name of the state type this migration produces
    fn target_type(&self) -> &'static str;
}

impl<M> ErasedMigration for M
where
    M: Migratable + Send + Sync,
{
    fn migrate_erased(&self, old_snapshot: &Path) -> KeepsakeResult<Box<dyn Any>> {
        let state = self.migrate(old_snapshot)?;
        Ok(Box::new(state))
    }

    fn target_type(&self) -> &'static str {
        std::any::type_name::<M::NewState>()
    }
}

/// Adapter turning a closure into a [`Migratable`]
pub struct FnMigration<S, F> {
    func: F,
    _state: PhantomData<fn() -> S>,
}

impl<S, F> FnMigration<S, F>
where
    S: PersistState,
    F: Fn(&Path) -> KeepsakeResult<S>,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            _state: PhantomData,
        }
    }
}

impl<S, F> Migratable for FnMigration<S, F>
where
    S: PersistState,
    F: Fn(&Path) -> KeepsakeResult<S>,
{
    type NewState = S;

    fn migrate(&self, old_snapshot: &Path) -> KeepsakeResult<S> {
        (self.func)(old_snapshot)
    }
}

impl<S, F> fmt::Debug for FnMigration<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnMigration<{}>", std::any::type_name::<S>())
    }
}

/// Encoder/decoder pair used for every file keepsake writes
pub trait SnapshotCodec: Send + Sync {
    fn encode(&self, value: &serde_json::Value) -> KeepsakeResult<Vec<u8>>;

    /// Decode the contents of the file at `path`; failures are `Decode` errors
    fn decode(&self, path: &Path, bytes: &[u8]) -> KeepsakeResult<serde_json::Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: i64,
    }

    impl SkipPersist for Counter {}
    impl PersistState for Counter {}

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Flagged {
        value: i64,
        transient: bool,
    }

    impl SkipPersist for Flagged {
        fn should_skip_persist(&self, next: &Self) -> bool {
            next.transient
        }
    }

    #[test]
    fn test_default_skip_is_equality() {
        let a = Counter { value: 1 };
        assert!(a.should_skip_persist(&Counter { value: 1 }));
        assert!(!a.should_skip_persist(&Counter { value: 2 }));
    }

    #[test]
    fn test_custom_skip_policy() {
        let prev = Flagged { value: 1, transient: false };
        assert!(prev.should_skip_persist(&Flagged { value: 5, transient: true }));
        assert!(!prev.should_skip_persist(&Flagged { value: 1, transient: false }));
    }

    #[test]
    fn test_erased_migration_downcasts() {
        let migration = FnMigration::new(|_: &Path| Ok(Counter { value: 7 }));
        let erased: Box<dyn ErasedMigration> = Box::new(migration);

        let out = erased.migrate_erased(Path::new("unused")).unwrap();
        assert_eq!(out.downcast_ref::<Counter>(), Some(&Counter { value: 7 }));
        assert!(erased.target_type().ends_with("Counter"));
    }

    #[test]
    fn test_action_init() {
        assert!(Action::<()>::Init.is_init());
        assert!(!Action::Dispatch(3).is_init());
    }
}
