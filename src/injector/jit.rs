//! Default-binding hints (`spec.md` §4.6 step 3) — the Rust stand-in for
//! Guice's `@ImplementedBy`/`@ProvidedBy` annotation reflection.
//!
//! Guice discovers these by reflecting on the `Class<T>` object it already
//! has in hand at JIT time. A bare [`crate::key::Key`] in Rust carries only
//! a `TypeId` — there is no way to ask it "does your original type have a
//! hint annotation", since `TypeId` cannot be reflected back into a type.
//! The hint therefore has to be registered explicitly, once, while the
//! concrete type *is* still in scope (typically from within a `Module`),
//! rather than discovered lazily. Registration is itself generic over both
//! the interface and a compiler-checked upcast function, so — unlike the
//! runtime "is this actually a subtype" check `spec.md` describes — an
//! invalid hint is a compile error here rather than a configuration error.
use std::sync::Arc;

use crate::errors::ProvisionError;
use crate::injector::context::ResolveContext;
use crate::injector::provision::{resolve, ErasedProvider, Injectable};
use crate::injector::Injector;
use crate::provided::ProvidedValue;
use crate::ptr::erase;

/// An executable default-binding hint for one key.
pub(crate) struct DefaultHintProvider
{
    run: Box<dyn Fn(&Injector, &ResolveContext) -> Result<ProvidedValue, ProvisionError> + Send + Sync>,
}

impl ErasedProvider for DefaultHintProvider
{
    fn provide(
        &self,
        injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>
    {
        (self.run)(injector, ctx)
    }
}

/// Builds a hint saying "when nobody has explicitly bound `Interface`,
/// construct it by resolving `Impl` (itself `Injectable`, possibly JIT) and
/// upcasting with `upcast`" — the `@ImplementedBy` case.
pub fn implemented_by<Interface, Impl>(
    upcast: fn(Arc<Impl>) -> Arc<Interface>,
) -> Arc<dyn ErasedProvider>
where
    Interface: 'static + ?Sized + Send + Sync,
    Impl: Injectable + 'static,
{
    Arc::new(DefaultHintProvider {
        run: Box::new(move |injector, ctx| {
            let impl_arc = resolve::<Impl>(injector, ctx)?;
            Ok(ProvidedValue::Value(erase(upcast(impl_arc))))
        }),
    })
}

/// Builds a hint saying "when nobody has explicitly bound `Interface`,
/// construct it via the given provider type" — the `@ProvidedBy` case.
pub fn provided_by<Interface, P>() -> Arc<dyn ErasedProvider>
where
    Interface: 'static + ?Sized + Send + Sync,
    P: crate::binding::Provider<Interface> + Default + 'static,
{
    Arc::new(DefaultHintProvider {
        run: Box::new(move |injector, ctx| {
            let provider = P::default();
            match provider.get(injector, ctx)?
            {
                Some(value) => Ok(ProvidedValue::Value(erase(value))),
                None => Ok(ProvidedValue::Null),
            }
        }),
    })
}
