//! The fluent binding builder chain: `bind::<K>() -> annotated_with(Q)? ->
//! to*() -> in_scope()/as_eager_singleton()`. The direct generalization of
//! the teacher's `BindingBuilder -> BindingScopeConfigurator ->
//! BindingWhenConfigurator` chain
//! (`src/di_container/blocking/binding/*.rs`), widened from
//! transient/singleton-only to the full scope set and from "named"
//! bindings to full qualifiers.
use std::marker::PhantomData;
use std::sync::Arc;

use crate::binding::scope_configurator::ScopeConfigurator;
use crate::binding::{Binding, BindingKind, Provider};
use crate::contextual::{ContextualProvider, ProvisioningContext};
use crate::errors::{ConfigurationError, ProvisionError};
use crate::injector::context::ResolveContext;
use crate::injector::provision::{resolve, ErasedProvider, Injectable};
use crate::injector::Injector;
use crate::key::Key;
use crate::module::Binder;
use crate::provided::ProvidedValue;
use crate::ptr::{erase, unerase};
use crate::qualifier::Qualifier;
use crate::source::Source;

pub struct BindingBuilder<'b, Interface: ?Sized>
{
    binder: &'b mut Binder,
    qualifier: Option<Qualifier>,
    _marker: PhantomData<Interface>,
}

impl<'b, Interface: 'static + ?Sized> BindingBuilder<'b, Interface>
{
    pub(crate) fn new(binder: &'b mut Binder) -> Self
    {
        Self {
            binder,
            qualifier: None,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn annotated_with(mut self, qualifier: Qualifier) -> Self
    {
        self.qualifier = Some(qualifier);
        self
    }

    fn key(&self) -> Key
    {
        let key = Key::of::<Interface>();
        match &self.qualifier
        {
            Some(q) => key.with_annotation(q.clone()),
            None => key,
        }
    }

    fn finish(
        self,
        kind: BindingKind,
        provider: Arc<dyn ErasedProvider>,
        is_constant: bool,
    ) -> ScopeConfigurator<'b, Interface>
    {
        let key = self.key();
        let source = self.binder.source();

        let binding = Binding {
            key,
            kind,
            scope: crate::binding::ScopeChoice::Unscoped,
            source,
            scoped_provider: provider,
        };

        self.binder.push_binding(binding, is_constant);
        ScopeConfigurator::new(self.binder)
    }

    /// Binds `Interface` to an already-built value. Instance bindings carry
    /// no further scope step: the same `Arc` is handed out every time,
    /// which already satisfies "members injected once at configuration
    /// time" (`spec.md` §3) without needing a `Singleton` wrapper.
    pub fn to_instance(self, value: Arc<Interface>) -> &'b mut Binder
    where
        Interface: Send + Sync,
    {
        let key = self.key();
        let source = self.binder.source();

        let binding = Binding {
            key,
            kind: BindingKind::Instance,
            scope: crate::binding::ScopeChoice::Unscoped,
            source,
            scoped_provider: Arc::new(InstanceProvider(value)),
        };

        self.binder.push_binding(binding, false);
        self.binder
    }

    /// Binds `Interface` to a hand-written constructor closure. This is the
    /// primary entry point for binding a trait-object interface to a
    /// concrete implementation: the `as Arc<dyn Interface>` upcast can only
    /// be written where the concrete type is known, i.e. inside the
    /// closure the caller supplies — Rust's unsizing coercion is not
    /// expressible as a library-side generic bound. See DESIGN.md.
    pub fn to_constructor<F>(self, f: F) -> ScopeConfigurator<'b, Interface>
    where
        F: Fn(&Injector, &ResolveContext) -> Result<Arc<Interface>, ProvisionError>
            + Send
            + Sync
            + 'static,
        Interface: Send + Sync,
    {
        let type_name = std::any::type_name::<Interface>();
        self.finish(
            BindingKind::Constructor { type_name },
            Arc::new(ConstructorProvider {
                f,
                _marker: PhantomData,
            }),
            false,
        )
    }

    /// Convenience over [`to_constructor`](Self::to_constructor) for the
    /// common "resolve `Impl` then upcast" shape.
    pub fn to_implementation<Impl>(
        self,
        upcast: fn(Arc<Impl>) -> Arc<Interface>,
    ) -> ScopeConfigurator<'b, Interface>
    where
        Impl: Injectable + 'static,
        Interface: Send + Sync,
    {
        self.to_constructor(move |injector, ctx| {
            let impl_arc = resolve::<Impl>(injector, ctx)?;
            Ok(upcast(impl_arc))
        })
    }

    pub fn to_provider<P: Provider<Interface> + 'static>(
        self,
        provider: P,
    ) -> ScopeConfigurator<'b, Interface>
    {
        self.finish(
            BindingKind::ProviderInstance,
            Arc::new(SimpleProviderAdapter(provider, PhantomData)),
            false,
        )
    }

    pub fn to_contextual_provider<P: ContextualProvider + 'static>(
        self,
        provider: P,
    ) -> ScopeConfigurator<'b, Interface>
    {
        self.finish(
            BindingKind::ProviderInstance,
            Arc::new(ContextualProviderAdapter(provider)),
            false,
        )
    }

    /// Delegates entirely to another key — the `Linked` binding variant.
    pub fn to_key(self, target: Key) -> ScopeConfigurator<'b, Interface>
    {
        self.finish(
            BindingKind::Linked {
                target: target.clone(),
            },
            Arc::new(LinkedProvider { target }),
            false,
        )
    }
}

impl<'b, Interface: 'static + Send + Sync> BindingBuilder<'b, Interface>
{
    /// Binds `Interface` to a constant literal (`spec.md` §3's `Constant`
    /// variant): `literal`'s string form is converted to `Interface` at
    /// resolution time by the first registered
    /// [`crate::type_converter::TypeConverter`] that can produce one —
    /// `String` and the primitive numeric/boolean types convert out of the
    /// box, anything else needs `Binder::register_type_converter`.
    pub fn to_constant(self, literal: impl Into<String>) -> &'b mut Binder
    {
        let key = self.key();
        let source = self.binder.source();

        let binding = Binding {
            key,
            kind: BindingKind::Constant {
                literal_type: std::any::type_name::<Interface>(),
            },
            scope: crate::binding::ScopeChoice::Unscoped,
            source,
            scoped_provider: Arc::new(ConstantProvider::<Interface> {
                literal: literal.into(),
                _marker: PhantomData,
            }),
        };

        self.binder.push_binding(binding, true);
        self.binder
    }
}

impl<'b, Interface: Injectable + 'static> BindingBuilder<'b, Interface>
{
    /// Binds the concrete, `Sized` type `Interface` to its own
    /// [`Injectable`] implementation — the `Untargetted`/self-constructing
    /// case (`bind::<Foo>()` with no further `.to*()` call also defaults to
    /// this; see `Binder::bind`).
    pub fn to_injectable(self) -> ScopeConfigurator<'b, Interface>
    {
        let type_name = std::any::type_name::<Interface>();
        self.finish(
            BindingKind::Constructor { type_name },
            Arc::new(InjectableProvider::<Interface>(PhantomData)),
            false,
        )
    }
}

struct InstanceProvider<Interface: ?Sized>(Arc<Interface>);

impl<Interface: 'static + ?Sized + Send + Sync> ErasedProvider for InstanceProvider<Interface>
{
    fn provide(
        &self,
        _injector: &Injector,
        _ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>
    {
        Ok(ProvidedValue::Value(erase(self.0.clone())))
    }
}

struct ConstructorProvider<Interface: ?Sized, F>
{
    f: F,
    _marker: PhantomData<Interface>,
}

impl<Interface, F> ErasedProvider for ConstructorProvider<Interface, F>
where
    Interface: 'static + ?Sized + Send + Sync,
    F: Fn(&Injector, &ResolveContext) -> Result<Arc<Interface>, ProvisionError> + Send + Sync,
{
    fn provide(
        &self,
        injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>
    {
        (self.f)(injector, ctx).map(|arc| ProvidedValue::Value(erase(arc)))
    }
}

struct InjectableProvider<Interface>(PhantomData<Interface>);

impl<Interface: Injectable + 'static> ErasedProvider for InjectableProvider<Interface>
{
    fn provide(
        &self,
        injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>
    {
        Interface::resolve(injector, ctx).map(|arc| ProvidedValue::Value(erase(arc)))
    }
}

struct SimpleProviderAdapter<Interface: ?Sized, P>(P, PhantomData<Interface>)
where
    P: Provider<Interface>;

impl<Interface, P> ErasedProvider for SimpleProviderAdapter<Interface, P>
where
    Interface: 'static + ?Sized + Send + Sync,
    P: Provider<Interface>,
{
    fn provide(
        &self,
        injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>
    {
        match self.0.get(injector, ctx)?
        {
            Some(value) => Ok(ProvidedValue::Value(erase(value))),
            None => Ok(ProvidedValue::Null),
        }
    }
}

struct ContextualProviderAdapter<P>(P);

impl<P: ContextualProvider + 'static> ErasedProvider for ContextualProviderAdapter<P>
{
    fn provide(
        &self,
        _injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>
    {
        let key = ctx
            .chain()
            .last()
            .cloned()
            .unwrap_or_else(Key::of::<()>);

        let provisioning_ctx = ProvisioningContext {
            key,
            injection_point: ctx.injection_point().cloned(),
        };

        self.0.get(&provisioning_ctx)
    }
}

struct ConstantProvider<Interface>
{
    literal: String,
    _marker: PhantomData<Interface>,
}

impl<Interface: 'static + Send + Sync> ErasedProvider for ConstantProvider<Interface>
{
    fn provide(
        &self,
        injector: &Injector,
        _ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>
    {
        for converter in injector.type_converters()
        {
            let Ok(any) = converter.convert(&self.literal)
            else
            {
                continue;
            };

            if let Some(value) = unerase::<Interface>(&any)
            {
                return Ok(ProvidedValue::Value(erase(value)));
            }
        }

        Err(ProvisionError::Configuration(Box::new(ConfigurationError::Custom {
            message: format!(
                "no registered type converter could produce a {} from the constant literal {:?}",
                std::any::type_name::<Interface>(),
                self.literal
            ),
            source: Source::unknown(),
        })))
    }
}

struct LinkedProvider
{
    target: Key,
}

impl ErasedProvider for LinkedProvider
{
    fn provide(
        &self,
        injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>
    {
        injector.resolve_value(&self.target, ctx)
    }
}

#[cfg(test)]
mod tests
{
    use crate::injector::Injector;
    use crate::module::Module;

    struct ConstantsModule;

    impl Module for ConstantsModule
    {
        fn configure(&self, binder: &mut crate::module::Binder)
        {
            binder.bind::<String>().to_constant("hello");
            binder.bind::<u16>().to_constant("8080");
        }
    }

    #[test]
    fn a_string_constant_is_used_verbatim()
    {
        let injector = Injector::build(vec![Box::new(ConstantsModule)]).unwrap();

        let value = injector.get_bound::<String>().unwrap();

        assert_eq!(*value, "hello");
    }

    #[test]
    fn a_numeric_constant_is_parsed_via_the_default_converter()
    {
        let injector = Injector::build(vec![Box::new(ConstantsModule)]).unwrap();

        let value = injector.get_bound::<u16>().unwrap();

        assert_eq!(*value, 8080);
    }

    #[derive(Debug, PartialEq)]
    struct NotConvertible;

    struct BadConstant;

    impl Module for BadConstant
    {
        fn configure(&self, binder: &mut crate::module::Binder)
        {
            binder.bind::<NotConvertible>().to_constant("whatever");
        }
    }

    #[test]
    fn an_unconvertible_constant_fails_at_resolution()
    {
        let injector = Injector::build(vec![Box::new(BadConstant)]).unwrap();

        assert!(injector.get_bound::<NotConvertible>().is_err());
    }
}
