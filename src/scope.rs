//! The scope protocol: `Unscoped`, `Singleton`, `EagerSingleton`, and
//! user-registered custom scopes.
use std::fmt;
use std::sync::Mutex;

use crate::errors::ProvisionError;
use crate::injector::context::ResolveContext;
use crate::injector::provision::ErasedProvider;
use crate::injector::Injector;
use crate::key::Key;
use crate::provided::ProvidedValue;

/// Applied to a binding's unscoped provider to control how many times it
/// actually runs. Mirrors the teacher's hard split between
/// `TransientTypeProvider` and `SingletonProvider`
/// (`src/provider/blocking.rs`), generalized into one trait so user code can
/// register further implementations (`spec.md` §4.9's custom scopes).
#[cfg_attr(test, mockall::automock)]
pub trait Scope: Send + Sync + fmt::Debug
{
    fn get(
        &self,
        key: &Key,
        unscoped: &dyn ErasedProvider,
        injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>;
}

#[derive(Debug, Default)]
pub struct UnscopedScope;

impl Scope for UnscopedScope
{
    fn get(
        &self,
        _key: &Key,
        unscoped: &dyn ErasedProvider,
        injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>
    {
        unscoped.provide(injector, ctx)
    }
}

/// A per-binding one-time-init primitive (`spec.md` §9's `ensure(key,
/// build_fn)`). Concurrent callers on different threads serialize on the
/// inner `Mutex`: whichever thread gets there first holds the lock for the
/// full duration of construction, so every other caller blocks until it is
/// done rather than racing to build duplicate instances. If construction
/// fails the lock is simply released with nothing written, so a later call
/// retries from scratch — no failure is ever cached.
///
/// A proxy value (see [`ProvidedValue::Proxy`]) is deliberately *not*
/// written into the cell: caching it would leave every subsequent caller
/// stuck with the placeholder instead of the real, fully-constructed value.
#[derive(Default)]
pub struct SingletonCell
{
    state: Mutex<CellState>,
}

enum CellState
{
    Empty,
    Value(crate::ptr::AnyArc),
    Null,
}

impl Default for CellState
{
    fn default() -> Self
    {
        Self::Empty
    }
}

impl SingletonCell
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn get_or_init(
        &self,
        build: impl FnOnce() -> Result<ProvidedValue, ProvisionError>,
    ) -> Result<ProvidedValue, ProvisionError>
    {
        let mut guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        match &*guard
        {
            CellState::Value(v) => return Ok(ProvidedValue::Value(v.clone())),
            CellState::Null => return Ok(ProvidedValue::Null),
            CellState::Empty =>
            {}
        }

        match build()?
        {
            ProvidedValue::Value(v) =>
            {
                *guard = CellState::Value(v.clone());
                Ok(ProvidedValue::Value(v))
            }
            ProvidedValue::Null =>
            {
                *guard = CellState::Null;
                Ok(ProvidedValue::Null)
            }
            proxy @ ProvidedValue::Proxy(_) => Ok(proxy),
        }
    }
}

impl fmt::Debug for SingletonCell
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "SingletonCell")
    }
}

/// Shared by both `ScopeChoice::Singleton` and `ScopeChoice::EagerSingleton`
/// — the only difference between the two is *when* the cell is first
/// populated (lazily on first request, versus eagerly during injector
/// build); the caching behavior itself is identical.
#[derive(Debug, Default)]
pub struct SingletonScope
{
    cell: SingletonCell,
}

impl SingletonScope
{
    pub fn new() -> Self
    {
        Self::default()
    }
}

impl Scope for SingletonScope
{
    fn get(
        &self,
        _key: &Key,
        unscoped: &dyn ErasedProvider,
        injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>
    {
        self.cell.get_or_init(|| unscoped.provide(injector, ctx))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::ptr::erase;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn singleton_cell_caches_value()
    {
        let cell = SingletonCell::new();
        let calls = AtomicU32::new(0);

        let build = || -> Result<ProvidedValue, ProvisionError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(ProvidedValue::Value(erase(Arc::new(42u32))))
        };

        cell.get_or_init(build).unwrap();
        cell.get_or_init(build).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn singleton_cell_does_not_cache_failure()
    {
        let cell = SingletonCell::new();
        let calls = AtomicU32::new(0);

        let failing = || -> Result<ProvidedValue, ProvisionError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ProvisionError::BindingNotFound { key: Key::of::<u32>() })
        };

        assert!(cell.get_or_init(failing).is_err());
        assert!(cell.get_or_init(failing).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn singleton_cell_does_not_cache_proxy()
    {
        let cell = SingletonCell::new();
        let calls = AtomicU32::new(0);

        let proxying = || -> Result<ProvidedValue, ProvisionError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(ProvidedValue::Proxy(erase(Arc::new(1u32))))
        };

        cell.get_or_init(proxying).unwrap();
        cell.get_or_init(proxying).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    struct DummyProvider;

    impl ErasedProvider for DummyProvider
    {
        fn provide(
            &self,
            _injector: &Injector,
            _ctx: &ResolveContext,
        ) -> Result<ProvidedValue, ProvisionError>
        {
            Ok(ProvidedValue::Null)
        }
    }

    #[test]
    fn a_custom_scope_is_reached_through_the_trait_object()
    {
        let mut mock = MockScope::new();
        mock.expect_get()
            .times(1)
            .returning(|_, _, _, _| Ok(ProvidedValue::Value(erase(Arc::new(7u32)))));

        let injector = crate::test_utils::empty_injector();
        let ctx = ResolveContext::root();
        let key = Key::of::<u32>();

        let result = mock.get(&key, &DummyProvider, &injector, &ctx).unwrap();

        assert!(matches!(result, ProvidedValue::Value(_)));
    }
}
