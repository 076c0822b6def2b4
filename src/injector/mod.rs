//! The injector: a frozen, queryable dependency graph built from one or more
//! [`Module`]s. The generalization of the teacher's `DIContainer`
//! (`src/di_container/blocking.rs`) from a single flat binding map plus
//! `Option<Arc<Self>>` parent to the full element-stream pipeline described
//! in `spec.md` §5-§9: explicit bindings are frozen at build time, JIT
//! bindings are cached lazily as they are first requested, and every
//! top-level resolution rolls its own speculative JIT bindings back as one
//! unit if it ultimately fails (see `context.rs`).
pub mod context;
pub mod cycle;
pub mod jit;
pub mod provision;

use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};

use ahash::AHashMap;

use crate::binding::{Binding, BindingKind, BindingView, Provider, ScopeChoice};
use crate::capability::{InjectorConfig, Stage};
use crate::element::Element;
use crate::errors::provision::create_dependency_trace;
use crate::errors::{ConfigurationError, ConfigurationErrors, ProvisionError};
use crate::injector::context::ResolveContext;
use crate::injector::cycle::{CircularProxyFactory, ProxySlot};
use crate::injector::provision::{
    erase_arc, resolve, resolve_bound, resolve_optional, type_name_of, value_to_arc,
    ErasedProvider, Injectable, MembersInjectable,
};
use crate::key::Key;
use crate::module::{Binder, Module};
use crate::provided::ProvidedValue;
use crate::scope::{Scope, SingletonScope};
use crate::source::Source;
use crate::type_converter::TypeConverter;

/// A fully built dependency graph. Immutable except for its JIT-binding
/// cache, which grows lazily as unbound [`Injectable`] types are first
/// requested. A child injector's `jit` field is never touched directly —
/// JIT bindings are always looked up and materialized on [`Injector::root`],
/// so one cached there is visible through every injector descended from it.
pub struct Injector
{
    bindings: AHashMap<Key, Arc<Binding>>,
    jit: Arc<RwLock<AHashMap<Key, Arc<Binding>>>>,
    default_hints: AHashMap<Key, Arc<dyn ErasedProvider>>,
    proxy_factories: AHashMap<Key, Arc<dyn CircularProxyFactory>>,
    pending_proxy_slots: RwLock<AHashMap<Key, Vec<Arc<ProxySlot>>>>,
    type_converters: Vec<Arc<dyn TypeConverter>>,
    parent: Option<Arc<Injector>>,
    config: InjectorConfig,
    /// Private-module sub-injectors, kept alive so that exposed bindings
    /// (which delegate into them) remain resolvable for the outer
    /// injector's whole lifetime. See `spec.md` §4.4.
    #[allow(dead_code)]
    private_children: Vec<Arc<Injector>>,
}

impl Injector
{
    /// Builds an injector from a set of top-level modules, using capability
    /// flags read from the environment (`spec.md` §9's `INCLUDE_STACK_TRACES`
    /// / `BYTECODE_GEN`).
    pub fn build(modules: Vec<Box<dyn Module>>) -> Result<Arc<Self>, ConfigurationErrors>
    {
        Self::build_with_config(modules, InjectorConfig::from_env())
    }

    pub fn build_with_config(
        modules: Vec<Box<dyn Module>>,
        config: InjectorConfig,
    ) -> Result<Arc<Self>, ConfigurationErrors>
    {
        let mut binder = Binder::new(config.stack_traces);

        for module in &modules
        {
            module.configure(&mut binder);
        }

        if !binder.errors.is_empty()
        {
            return Err(ConfigurationErrors(binder.errors));
        }

        Self::build_from_elements(binder.elements, config, None)
    }

    fn build_from_elements(
        elements: Vec<Element>,
        config: InjectorConfig,
        parent: Option<Arc<Injector>>,
    ) -> Result<Arc<Self>, ConfigurationErrors>
    {
        let mut bindings: AHashMap<Key, Arc<Binding>> = AHashMap::new();
        let mut binding_sources: AHashMap<Key, Source> = AHashMap::new();
        let mut scopes: AHashMap<&'static str, Arc<dyn Scope>> = AHashMap::new();
        let mut default_hints: AHashMap<Key, Arc<dyn ErasedProvider>> = AHashMap::new();
        let mut proxy_factories: AHashMap<Key, Arc<dyn CircularProxyFactory>> = AHashMap::new();
        let mut type_converters: Vec<Arc<dyn TypeConverter>> = Vec::new();
        let mut private_children: Vec<Arc<Injector>> = Vec::new();
        let mut errors: Vec<ConfigurationError> = Vec::new();

        for element in elements
        {
            match element
            {
                Element::Bind(binding) | Element::BindConstant(binding) =>
                {
                    insert_binding(&mut bindings, &mut binding_sources, &mut errors, binding);
                }
                Element::InstallModule { .. } =>
                {}
                Element::InstallPrivateModule {
                    elements: nested,
                    exposed,
                    ..
                } => match Self::build_from_elements(nested, config.clone(), None)
                {
                    Ok(child) =>
                    {
                        for key in exposed
                        {
                            match child.bindings.get(&key)
                            {
                                Some(child_binding) =>
                                {
                                    let exposed_binding = Arc::new(Binding {
                                        key: key.clone(),
                                        kind: BindingKind::Exposed {
                                            target: key.clone(),
                                        },
                                        scope: ScopeChoice::Unscoped,
                                        source: child_binding.source.clone(),
                                        scoped_provider: Arc::new(ExposedProvider {
                                            child: child.clone(),
                                            target: key.clone(),
                                        }),
                                    });
                                    insert_binding(
                                        &mut bindings,
                                        &mut binding_sources,
                                        &mut errors,
                                        exposed_binding,
                                    );
                                }
                                None => errors
                                    .push(ConfigurationError::ExposingUnboundKey { key }),
                            }
                        }
                        private_children.push(child);
                    }
                    Err(child_errors) => errors.extend(child_errors.0),
                },
                Element::BindScope { name, scope } =>
                {
                    if scopes.contains_key(name)
                    {
                        errors.push(ConfigurationError::DuplicateScopeBinding { scope: name });
                    }
                    else
                    {
                        scopes.insert(name, scope);
                    }
                }
                Element::RegisterTypeConverter { converter } =>
                {
                    type_converters.push(converter);
                }
                Element::BindDefaultHint { key, hint } =>
                {
                    default_hints.insert(key, hint);
                }
                Element::BindCircularProxyFactory { key, factory } =>
                {
                    proxy_factories.insert(key, factory);
                }
                Element::Expose { .. } | Element::AddError(_) | Element::SkipSources
                | Element::RequireExactBindingAnnotations =>
                {}
            }
        }

        let mut finalized: AHashMap<Key, Arc<Binding>> = AHashMap::new();

        for (key, binding) in bindings
        {
            match finalize_binding(&key, binding, &scopes)
            {
                Ok(binding) =>
                {
                    finalized.insert(key, Arc::new(binding));
                }
                Err(err) => errors.push(err),
            }
        }

        if !errors.is_empty()
        {
            return Err(ConfigurationErrors(errors));
        }

        // User-registered converters are tried before the built-ins, so a
        // module can override how a primitive is parsed from a literal.
        type_converters.extend(crate::type_converter::default_converters());

        let eager_keys: Vec<Key> = finalized
            .iter()
            .filter(|(_, binding)| binding.scope == ScopeChoice::EagerSingleton)
            .map(|(key, _)| key.clone())
            .collect();

        let injector = Arc::new(Self {
            bindings: finalized,
            jit: Arc::new(RwLock::new(AHashMap::new())),
            default_hints,
            proxy_factories,
            pending_proxy_slots: RwLock::new(AHashMap::new()),
            type_converters,
            parent,
            config,
            private_children,
        });

        // Stage::Tool runs every configuration-time check (everything above
        // this point already ran) but skips provisioning entirely, the same
        // validate-only semantics as Guice's `Stage.TOOL`.
        let mut eager_errors = Vec::new();

        if injector.config.stage != Stage::Tool
        {
            for key in eager_keys
            {
                let ctx = ResolveContext::root();
                if let Err(err) = ctx.finish(injector.resolve_value(&key, &ctx))
                {
                    eager_errors.push(ConfigurationError::Custom {
                        message: format!("eager singleton {key} failed to provision: {err}"),
                        source: Source::unknown(),
                    });
                }
            }
        }

        if !eager_errors.is_empty()
        {
            return Err(ConfigurationErrors(eager_errors));
        }

        Ok(injector)
    }

    /// Builds a child injector whose own bindings take priority, falling
    /// back to `parent` for anything it doesn't bind itself (`spec.md` §5's
    /// injector hierarchy).
    pub fn create_child(
        parent: &Arc<Injector>,
        modules: Vec<Box<dyn Module>>,
    ) -> Result<Arc<Injector>, ConfigurationErrors>
    {
        let mut binder = Binder::new(parent.config.stack_traces);

        for module in &modules
        {
            module.configure(&mut binder);
        }

        if !binder.errors.is_empty()
        {
            return Err(ConfigurationErrors(binder.errors));
        }

        let parent_jit = parent.root().jit.read().unwrap_or_else(PoisonError::into_inner);

        for element in &binder.elements
        {
            if let Element::Bind(binding) | Element::BindConstant(binding) = element
            {
                if parent.bindings.contains_key(&binding.key) || parent_jit.contains_key(&binding.key)
                {
                    return Err(ConfigurationErrors(vec![
                        ConfigurationError::ParentBindingConflict {
                            key: binding.key.clone(),
                        },
                    ]));
                }
            }
        }

        drop(parent_jit);

        Self::build_from_elements(binder.elements, parent.config.clone(), Some(parent.clone()))
    }

    pub fn parent(&self) -> Option<&Arc<Injector>>
    {
        self.parent.as_ref()
    }

    /// The root of this injector's parent chain — itself if it has no
    /// parent. JIT bindings are always materialized and cached here, so a
    /// type JIT-constructed through one child is visible through every
    /// other injector descended from the same root (`spec.md` §4.11).
    fn root(&self) -> &Injector
    {
        match &self.parent
        {
            Some(parent) => parent.root(),
            None => self,
        }
    }

    pub(crate) fn type_converters(&self) -> &[Arc<dyn TypeConverter>]
    {
        &self.type_converters
    }

    /// Resolves `T` through any explicit, hinted, or JIT binding, falling
    /// back to constructing it via its own [`Injectable`] impl.
    pub fn get_instance<T: Injectable + 'static>(&self) -> Result<Arc<T>, ProvisionError>
    {
        let ctx = ResolveContext::root();
        ctx.finish(resolve::<T>(self, &ctx))
    }

    /// Resolves `T` through any explicit, hinted, or parent binding, without
    /// attempting JIT construction. The only resolution path usable for
    /// trait-object interfaces.
    pub fn get_bound<T: 'static + ?Sized + Send + Sync>(&self) -> Result<Arc<T>, ProvisionError>
    {
        let ctx = ResolveContext::root();
        ctx.finish(resolve_bound::<T>(self, &ctx))
    }

    /// Resolves `T` nullably: a legitimately-null production becomes `None`.
    pub fn get_optional<T: 'static + ?Sized + Send + Sync>(
        &self,
    ) -> Result<Option<Arc<T>>, ProvisionError>
    {
        let ctx = ResolveContext::root();
        ctx.finish(resolve_optional::<T>(self, &ctx))
    }

    pub fn get_binding<T: 'static + ?Sized>(&self) -> Option<BindingView>
    {
        let key = Key::of::<T>();
        self.bindings
            .get(&key)
            .map(|binding| BindingView::from(binding.as_ref()))
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.get_binding::<T>()))
    }

    pub fn get_all_bindings(&self) -> Vec<BindingView>
    {
        self.bindings.values().map(|binding| BindingView::from(binding.as_ref())).collect()
    }

    /// Runs `value`'s member injection. See [`MembersInjectable`].
    pub fn inject_members<T: MembersInjectable + 'static>(
        &self,
        value: &Arc<T>,
    ) -> Result<(), ProvisionError>
    {
        let ctx = ResolveContext::root();
        ctx.finish(value.inject_members(self, &ctx))
    }

    /// The core resolution entry point, shared by every `resolve*` free
    /// function and every [`Provider`] this injector hands out: checks for
    /// an in-progress cycle first, then tries (in order) an explicit/JIT
    /// binding, a default hint, and finally delegation to the parent
    /// injector.
    pub fn resolve_value(
        &self,
        key: &Key,
        ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>
    {
        if ctx.is_in_progress(key)
        {
            return self.handle_cycle(key, ctx);
        }

        let next_ctx = ctx.descend(key.clone());

        if let Some(binding) = self.lookup_binding(key)
        {
            let result = binding.provide(self, &next_ctx);
            if let Ok(value) = &result
            {
                self.fulfill_pending_proxies(key, value);
            }
            return result;
        }

        if let Some(hint) = self.default_hints.get(key).cloned()
        {
            let result = hint.provide(self, &next_ctx);
            if let Ok(value) = &result
            {
                self.fulfill_pending_proxies(key, value);
            }
            return result;
        }

        if let Some(parent) = &self.parent
        {
            match parent.resolve_value(key, ctx)
            {
                Ok(value) => return Ok(value),
                Err(ProvisionError::BindingNotFound { .. }) =>
                {}
                Err(err) => return Err(err),
            }
        }

        Err(ProvisionError::BindingNotFound { key: key.clone() })
    }

    /// Just-in-time-constructs `T` via its own [`Injectable`] impl when no
    /// binding exists for it. The speculative binding this creates is
    /// registered with `ctx`'s rollback generation immediately, before
    /// construction is even attempted, so a failure anywhere further up the
    /// call tree unwinds it along with every other JIT binding from the same
    /// top-level resolution (`spec.md` §9).
    pub(crate) fn jit_construct<T: Injectable + 'static>(
        &self,
        ctx: &ResolveContext,
    ) -> Result<Arc<T>, ProvisionError>
    {
        let key = Key::of::<T>();
        let root = self.root();

        let binding = root.jit.read().unwrap_or_else(PoisonError::into_inner).get(&key).cloned();

        let binding = match binding
        {
            Some(binding) => binding,
            None =>
            {
                let binding = Arc::new(Binding {
                    key: key.clone(),
                    kind: BindingKind::Constructor {
                        type_name: type_name_of::<T>(),
                    },
                    scope: ScopeChoice::Unscoped,
                    source: Source::unknown(),
                    scoped_provider: Arc::new(JitProvider::<T>(PhantomData)),
                });

                root.jit
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key.clone(), binding.clone());

                let jit_handle = root.jit.clone();
                let cleanup_key = key.clone();
                ctx.record_jit_cleanup(Box::new(move || {
                    jit_handle.write().unwrap_or_else(PoisonError::into_inner).remove(&cleanup_key);
                }));

                binding
            }
        };

        let next_ctx = ctx.descend(key.clone());
        let provided = binding.provide(self, &next_ctx)?;
        value_to_arc::<T>(provided, &key, ctx)
    }

    fn lookup_binding(&self, key: &Key) -> Option<Arc<Binding>>
    {
        if let Some(binding) = self.bindings.get(key)
        {
            return Some(binding.clone());
        }

        self.root().jit.read().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn lookup_proxy_factory(&self, key: &Key) -> Option<Arc<dyn CircularProxyFactory>>
    {
        if let Some(factory) = self.proxy_factories.get(key)
        {
            return Some(factory.clone());
        }

        self.parent.as_ref().and_then(|parent| parent.lookup_proxy_factory(key))
    }

    /// Handles re-entering the resolution of a key already in progress on
    /// this chain (`spec.md` §4.7): produces a proxy if a factory is
    /// registered and proxies are permitted, otherwise fails.
    fn handle_cycle(&self, key: &Key, ctx: &ResolveContext) -> Result<ProvidedValue, ProvisionError>
    {
        if !self.config.allow_circular_proxies
        {
            return Err(ProvisionError::Circular {
                key: key.clone(),
                trace: create_dependency_trace(ctx.chain(), key),
            });
        }

        match self.lookup_proxy_factory(key)
        {
            Some(factory) =>
            {
                let (placeholder, slot) = factory.create_proxy();
                self.pending_proxy_slots
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .entry(key.clone())
                    .or_default()
                    .push(slot);
                Ok(ProvidedValue::Proxy(placeholder))
            }
            None => Err(ProvisionError::CircularWithoutProxy {
                key: key.clone(),
                trace: create_dependency_trace(ctx.chain(), key),
            }),
        }
    }

    /// Fills in any proxy slots that were handed out while `key` was still
    /// being constructed, now that the real value is ready.
    fn fulfill_pending_proxies(&self, key: &Key, value: &ProvidedValue)
    {
        let ProvidedValue::Value(any) = value
        else
        {
            return;
        };

        let slots = self
            .pending_proxy_slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);

        if let Some(slots) = slots
        {
            for slot in slots
            {
                slot.fill(any.clone());
            }
        }
    }
}

impl Drop for Injector
{
    /// Warns (debug builds only) if a circular-dependency proxy never got
    /// filled in before this injector went away — a sign some ancestor
    /// resolution failed after handing out the proxy but before the
    /// construction it was standing in for ever completed.
    fn drop(&mut self)
    {
        if cfg!(debug_assertions)
        {
            let pending = self.pending_proxy_slots.read().unwrap_or_else(PoisonError::into_inner);
            for key in pending.keys()
            {
                eprintln!("weave: injector dropped with an unfulfilled circular proxy for {key}");
            }
        }
    }
}

/// Builds a [`Provider`] backed by this injector — the handle returned by
/// `spec.md` §6's `getProvider`. A free function rather than a method
/// because it needs to hold its own `Arc<Injector>` independent of any
/// caller's borrow.
pub fn provider_for<T: 'static + ?Sized + Send + Sync>(injector: &Arc<Injector>) -> Arc<dyn Provider<T>>
{
    Arc::new(InjectorBackedProvider::<T>(injector.clone(), PhantomData))
}

/// The `MembersInjector<T>` equivalent (`spec.md` §6): a standalone handle
/// that injects members into an already-constructed value using this
/// injector's bindings.
pub fn members_injector_for<T: MembersInjectable + 'static>(
    injector: &Arc<Injector>,
) -> impl Fn(&Arc<T>) -> Result<(), ProvisionError> + Send + Sync + 'static
{
    let injector = injector.clone();
    move |value: &Arc<T>| {
        let ctx = ResolveContext::root();
        ctx.finish(value.inject_members(&injector, &ctx))
    }
}

struct InjectorBackedProvider<T: ?Sized>(Arc<Injector>, PhantomData<T>);

impl<T: 'static + ?Sized + Send + Sync> Provider<T> for InjectorBackedProvider<T>
{
    fn get(
        &self,
        _injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<Option<Arc<T>>, ProvisionError>
    {
        resolve_optional::<T>(&self.0, ctx)
    }
}

struct JitProvider<T>(PhantomData<T>);

impl<T: Injectable + 'static> ErasedProvider for JitProvider<T>
{
    fn provide(&self, injector: &Injector, ctx: &ResolveContext) -> Result<ProvidedValue, ProvisionError>
    {
        T::resolve(injector, ctx).map(|arc| ProvidedValue::Value(erase_arc(arc)))
    }
}

/// Delegates to a private-module sub-injector for one exposed key — the
/// executable half of `spec.md` §4.4's "exposed keys continue to be
/// resolved through the child scope's state".
struct ExposedProvider
{
    child: Arc<Injector>,
    target: Key,
}

impl ErasedProvider for ExposedProvider
{
    fn provide(
        &self,
        _injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<ProvidedValue, ProvisionError>
    {
        self.child.resolve_value(&self.target, ctx)
    }
}

/// Wraps a binding's raw provider with its chosen scope — built once at
/// injector-build time, after the scope registry is fully populated, rather
/// than dispatched by name on every resolution.
struct ScopedProvider
{
    scope: Arc<dyn Scope>,
    key: Key,
    inner: Arc<dyn ErasedProvider>,
}

impl ErasedProvider for ScopedProvider
{
    fn provide(&self, injector: &Injector, ctx: &ResolveContext) -> Result<ProvidedValue, ProvisionError>
    {
        self.scope.get(&self.key, self.inner.as_ref(), injector, ctx)
    }
}

fn insert_binding(
    bindings: &mut AHashMap<Key, Arc<Binding>>,
    sources: &mut AHashMap<Key, Source>,
    errors: &mut Vec<ConfigurationError>,
    binding: Arc<Binding>,
)
{
    let key = binding.key.clone();

    if let Some(existing_source) = sources.get(&key)
    {
        errors.push(ConfigurationError::DuplicateBinding {
            key,
            first_source: existing_source.clone(),
            second_source: binding.source.clone(),
        });
        return;
    }

    sources.insert(key.clone(), binding.source.clone());
    bindings.insert(key, binding);
}

fn finalize_binding(
    key: &Key,
    binding: Arc<Binding>,
    scopes: &AHashMap<&'static str, Arc<dyn Scope>>,
) -> Result<Binding, ConfigurationError>
{
    let mut binding = Arc::try_unwrap(binding).unwrap_or_else(|shared| Binding {
        key: shared.key.clone(),
        kind: shared.kind.clone(),
        scope: shared.scope.clone(),
        source: shared.source.clone(),
        scoped_provider: shared.scoped_provider.clone(),
    });

    let scope_impl: Arc<dyn Scope> = match &binding.scope
    {
        ScopeChoice::Unscoped => return Ok(binding),
        ScopeChoice::Singleton | ScopeChoice::EagerSingleton => Arc::new(SingletonScope::new()),
        ScopeChoice::Custom(name) => scopes.get(name).cloned().ok_or_else(|| {
            ConfigurationError::ScopeNotFound {
                key: key.clone(),
                scope: *name,
            }
        })?,
    };

    binding.scoped_provider = Arc::new(ScopedProvider {
        scope: scope_impl,
        key: key.clone(),
        inner: binding.scoped_provider,
    });

    Ok(binding)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::binding::Provider as _;
    use crate::qualifier::Qualifier;

    #[derive(Debug, Default, PartialEq)]
    struct Widget
    {
        name: String,
    }

    struct WidgetModule;

    impl Module for WidgetModule
    {
        fn configure(&self, binder: &mut Binder)
        {
            binder.bind::<Widget>().to_instance(Arc::new(Widget {
                name: "bound".into(),
            }));
        }
    }

    #[test]
    fn resolves_an_explicit_binding()
    {
        let injector = Injector::build(vec![Box::new(WidgetModule)]).unwrap();

        let widget = injector.get_bound::<Widget>().unwrap();

        assert_eq!(widget.name, "bound");
    }

    #[test]
    fn jit_constructs_an_unbound_default_type()
    {
        let injector = Injector::build(vec![]).unwrap();

        let widget = injector.get_instance::<Widget>().unwrap();

        assert_eq!(*widget, Widget::default());
    }

    struct SingletonCounterModule;

    #[derive(Default)]
    struct Counter;

    impl Module for SingletonCounterModule
    {
        fn configure(&self, binder: &mut Binder)
        {
            binder
                .bind::<Counter>()
                .to_injectable()
                .as_singleton();
        }
    }

    #[test]
    fn singleton_scope_returns_the_same_instance()
    {
        let injector = Injector::build(vec![Box::new(SingletonCounterModule)]).unwrap();

        let a = injector.get_bound::<Counter>().unwrap();
        let b = injector.get_bound::<Counter>().unwrap();

        assert!(Arc::ptr_eq(&a, &b));
    }

    struct DuplicateModule;

    impl Module for DuplicateModule
    {
        fn configure(&self, binder: &mut Binder)
        {
            binder.bind::<Widget>().to_instance(Arc::new(Widget::default()));
            binder.bind::<Widget>().to_instance(Arc::new(Widget::default()));
        }
    }

    #[test]
    fn duplicate_bindings_fail_the_build()
    {
        let result = Injector::build(vec![Box::new(DuplicateModule)]);

        assert!(matches!(
            result,
            Err(ConfigurationErrors(errors))
                if matches!(errors.as_slice(), [ConfigurationError::DuplicateBinding { .. }])
        ));
    }

    #[test]
    fn child_injector_falls_back_to_parent()
    {
        let parent = Injector::build(vec![Box::new(WidgetModule)]).unwrap();
        let child = Injector::create_child(&parent, vec![]).unwrap();

        let widget = child.get_bound::<Widget>().unwrap();

        assert_eq!(widget.name, "bound");
    }

    #[test]
    fn qualified_bindings_are_distinct_from_the_unqualified_one()
    {
        struct QualifiedModule;

        #[derive(Debug, Default, PartialEq)]
        struct Tag(&'static str);

        impl Module for QualifiedModule
        {
            fn configure(&self, binder: &mut Binder)
            {
                binder.bind::<Widget>().to_instance(Arc::new(Widget {
                    name: "plain".into(),
                }));
                binder
                    .bind::<Widget>()
                    .annotated_with(Qualifier::new(Tag("special")))
                    .to_instance(Arc::new(Widget {
                        name: "special".into(),
                    }));
            }
        }

        let injector = Injector::build(vec![Box::new(QualifiedModule)]).unwrap();

        let plain = injector.get_bound::<Widget>().unwrap();
        assert_eq!(plain.name, "plain");

        let key = Key::of::<Widget>().with_annotation(Qualifier::new(Tag("special")));
        let ctx = ResolveContext::root();
        let special = value_to_arc::<Widget>(
            ctx.finish(injector.resolve_value(&key, &ctx)).unwrap(),
            &key,
            &ctx,
        )
        .unwrap();
        assert_eq!(special.name, "special");
    }

    #[test]
    fn provider_for_resolves_lazily()
    {
        let injector = Injector::build(vec![Box::new(WidgetModule)]).unwrap();
        let provider = provider_for::<Widget>(&injector);

        let ctx = ResolveContext::root();
        let widget = provider.get(&injector, &ctx).unwrap().unwrap();

        assert_eq!(widget.name, "bound");
    }

    struct FailingEagerModule;

    impl Module for FailingEagerModule
    {
        fn configure(&self, binder: &mut Binder)
        {
            binder
                .bind::<Widget>()
                .to_contextual_provider(|_ctx| {
                    Err(ProvisionError::BindingNotFound {
                        key: Key::of::<Widget>(),
                    })
                })
                .as_eager_singleton();
        }
    }

    #[test]
    fn stage_tool_skips_eager_singleton_provisioning()
    {
        let config = InjectorConfig {
            stage: Stage::Tool,
            ..InjectorConfig::default()
        };

        let result = Injector::build_with_config(vec![Box::new(FailingEagerModule)], config);

        assert!(result.is_ok());
    }

    #[test]
    fn a_failing_eager_singleton_fails_the_build_outside_tool_stage()
    {
        let result = Injector::build(vec![Box::new(FailingEagerModule)]);

        assert!(result.is_err());
    }
}
