//! Modules and the `Binder` they configure (`spec.md` §4.3).
use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::binding::builder::BindingBuilder;
use crate::binding::when_configurator::WhenConfigurator;
use crate::binding::Binding;
use crate::capability::StackTraceMode;
use crate::element::Element;
use crate::errors::ConfigurationError;
use crate::key::Key;
use crate::private_module::{PrivateModule, PrivateModuleHandle};
use crate::scope::Scope;
use crate::source::Source;
use crate::type_converter::TypeConverter;

/// Whether qualifier matching at an injection point must be exact
/// (`Strict`) or may fall back to a default-valued qualifier of the right
/// type (`Lenient`, the default) — `spec.md` §4.2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualifierPolicy
{
    Lenient,
    Strict,
}

/// A unit of configuration: installs bindings (and other modules) into a
/// [`Binder`]. The direct generalization of the teacher's implicit
/// "configure a `DIContainerBuilder`" step into a first-class,
/// introspectable object, mirroring `spec.md`'s `Module`/`Binder` split.
pub trait Module: Send + Sync
{
    fn configure(&self, binder: &mut Binder);
}

/// Accumulates a module's element stream while it configures itself:
/// bindings, scope registrations, type converters, sub-module installs, and
/// configuration errors.
pub struct Binder
{
    pub(crate) elements: Vec<Element>,
    pub(crate) errors: Vec<ConfigurationError>,
    pub(crate) qualifier_policy: QualifierPolicy,
    pub(crate) module_chain: Vec<&'static str>,
    pub(crate) skip_sources: bool,
    pub(crate) stack_trace_mode: StackTraceMode,
    installed_modules: Vec<Arc<dyn InstalledModule>>,
    pub(crate) private: bool,
}

/// Tracks one already-installed module by value, not merely by type —
/// installing a second, differently-configured instance of the same module
/// type is a distinct install, only an instance that compares equal to one
/// already on the chain collapses (`spec.md` §4.3).
trait InstalledModule: Send + Sync
{
    fn type_id(&self) -> TypeId;
    fn equals(&self, other: &dyn Any) -> bool;
}

impl<M: Module + PartialEq + 'static> InstalledModule for M
{
    fn type_id(&self) -> TypeId
    {
        TypeId::of::<M>()
    }

    fn equals(&self, other: &dyn Any) -> bool
    {
        other.downcast_ref::<M>().is_some_and(|m| m == self)
    }
}

impl Binder
{
    pub(crate) fn new(stack_trace_mode: StackTraceMode) -> Self
    {
        Self {
            elements: Vec::new(),
            errors: Vec::new(),
            qualifier_policy: QualifierPolicy::Lenient,
            module_chain: Vec::new(),
            skip_sources: false,
            stack_trace_mode,
            installed_modules: Vec::new(),
            private: false,
        }
    }

    fn child_for(&self, module_name: &'static str) -> Self
    {
        let mut module_chain = self.module_chain.clone();
        module_chain.push(module_name);

        Self {
            elements: Vec::new(),
            errors: Vec::new(),
            qualifier_policy: self.qualifier_policy,
            module_chain,
            skip_sources: self.skip_sources,
            stack_trace_mode: self.stack_trace_mode,
            installed_modules: self.installed_modules.clone(),
            private: self.private,
        }
    }

    #[track_caller]
    pub(crate) fn source(&self) -> Source
    {
        if self.skip_sources
        {
            Source::unknown()
        }
        else
        {
            Source::capture(self.module_chain.clone(), self.stack_trace_mode)
        }
    }

    pub fn bind<Interface: 'static + ?Sized>(&mut self) -> BindingBuilder<'_, Interface>
    {
        BindingBuilder::new(self)
    }

    /// Retroactively qualifies an already-made, still-unqualified binding.
    /// See [`WhenConfigurator`].
    pub fn rebind<Interface: 'static + ?Sized>(&mut self) -> WhenConfigurator<'_, Interface>
    {
        WhenConfigurator::new(self)
    }

    /// Installs `module`, merging its element stream into this one.
    /// Installing an instance that equals one already installed along the
    /// same chain is a no-op — the Rust stand-in for Guice's
    /// identity/equality-based idempotent re-install, and what keeps a
    /// module-installation cycle from recursing forever (`spec.md` §4.3's
    /// "installs collapse"). A second instance of the same module type that
    /// compares *unequal* (differently configured) installs as its own,
    /// separate module.
    pub fn install<M: Module + PartialEq + 'static>(&mut self, module: M)
    {
        let module = Arc::new(module);

        let already_installed = self
            .installed_modules
            .iter()
            .any(|installed| installed.type_id() == TypeId::of::<M>() && installed.equals(module.as_ref()));

        if already_installed
        {
            return;
        }

        self.installed_modules.push(module.clone());

        let module_name = std::any::type_name::<M>();

        let mut child = self.child_for(module_name);

        module.configure(&mut child);

        self.installed_modules = child.installed_modules;
        self.errors.extend(child.errors);
        self.elements.push(Element::InstallModule { module_name });
        self.elements.extend(child.elements);
    }

    /// Installs a [`PrivateModule`]: everything it binds stays encapsulated
    /// except the keys it exposes via [`Binder::expose`] from within its own
    /// `configure`. See `src/private_module.rs`.
    pub fn install_private<M: PrivateModule + 'static>(&mut self, module: M) -> PrivateModuleHandle
    {
        let module_name = std::any::type_name::<M>();
        let mut child = self.child_for(module_name);
        child.private = true;

        module.configure(&mut child);

        let exposed: Vec<Key> = child
            .elements
            .iter()
            .filter_map(|e| match e
            {
                Element::Expose { key } => Some(key.clone()),
                _ => None,
            })
            .collect();

        self.errors.extend(child.errors);
        self.elements.push(Element::InstallPrivateModule {
            module_name,
            elements: child.elements,
            exposed: exposed.clone(),
        });

        PrivateModuleHandle { exposed }
    }

    /// Registers `hint` as the default-binding provider for `Interface` —
    /// the `@ImplementedBy`/`@ProvidedBy` stand-in built by
    /// [`crate::injector::jit::implemented_by`]/[`crate::injector::jit::provided_by`].
    pub fn bind_default_hint<Interface: 'static + ?Sized>(
        &mut self,
        hint: Arc<dyn crate::injector::provision::ErasedProvider>,
    )
    {
        self.elements.push(Element::BindDefaultHint {
            key: Key::of::<Interface>(),
            hint,
        });
    }

    /// Registers `factory` as the circular-proxy factory for `Interface`.
    /// See `src/injector/cycle.rs`.
    pub fn bind_circular_proxy_factory<Interface: 'static + ?Sized>(
        &mut self,
        factory: Arc<dyn crate::injector::cycle::CircularProxyFactory>,
    )
    {
        self.elements.push(Element::BindCircularProxyFactory {
            key: Key::of::<Interface>(),
            factory,
        });
    }

    /// Marks `key` as exposed from the private module currently being
    /// configured. Only meaningful inside [`Binder::install_private`].
    pub fn expose<Interface: 'static + ?Sized>(&mut self)
    {
        let key = Key::of::<Interface>();

        if !self.private
        {
            self.errors.push(ConfigurationError::ExposingUnboundKey {
                key: key.clone(),
            });
        }

        self.elements.push(Element::Expose { key });
    }

    pub fn bind_scope(&mut self, name: &'static str, scope: Arc<dyn Scope>)
    {
        self.elements.push(Element::BindScope { name, scope });
    }

    pub fn register_type_converter(&mut self, converter: Arc<dyn TypeConverter>)
    {
        self.elements
            .push(Element::RegisterTypeConverter { converter });
    }

    #[track_caller]
    pub fn add_error(&mut self, message: impl Into<String>)
    {
        let error = ConfigurationError::Custom {
            message: message.into(),
            source: self.source(),
        };
        self.elements.push(Element::AddError(Arc::new(clone_error(&error))));
        self.errors.push(error);
    }

    pub fn skip_sources(&mut self)
    {
        self.skip_sources = true;
        self.elements.push(Element::SkipSources);
    }

    pub fn require_exact_binding_annotations(&mut self)
    {
        self.qualifier_policy = QualifierPolicy::Strict;
        self.elements.push(Element::RequireExactBindingAnnotations);
    }

    pub(crate) fn push_binding(&mut self, binding: Binding, is_constant: bool)
    {
        let binding = Arc::new(binding);

        if is_constant
        {
            self.elements.push(Element::BindConstant(binding));
        }
        else
        {
            self.elements.push(Element::Bind(binding));
        }
    }
}

/// `ConfigurationError` doesn't implement `Clone` (its `thiserror`-derived
/// `#[source]` chains aren't guaranteed cloneable in general), but the
/// element stream needs to keep a record of `add_error` calls independent
/// of the flat error list used to decide build success. Re-deriving a
/// `Custom` error as its own record sidesteps that without requiring
/// `Clone` on the whole enum.
fn clone_error(error: &ConfigurationError) -> ConfigurationError
{
    match error
    {
        ConfigurationError::Custom { message, source } => ConfigurationError::Custom {
            message: message.clone(),
            source: source.clone(),
        },
        other => ConfigurationError::Custom {
            message: other.to_string(),
            source: Source::unknown(),
        },
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::capability::StackTraceMode;

    #[derive(PartialEq)]
    struct PortModule(u16);

    impl Module for PortModule
    {
        fn configure(&self, binder: &mut Binder)
        {
            binder.bind::<u16>().to_instance(Arc::new(self.0));
        }
    }

    #[test]
    fn reinstalling_an_equal_instance_collapses()
    {
        let mut binder = Binder::new(StackTraceMode::default());
        binder.install(PortModule(8080));
        binder.install(PortModule(8080));

        let binds = binder.elements.iter().filter(|e| matches!(e, Element::Bind(_))).count();
        assert_eq!(binds, 1);
    }

    #[test]
    fn installing_a_differently_valued_instance_does_not_collapse()
    {
        let mut binder = Binder::new(StackTraceMode::default());
        binder.install(PortModule(8080));
        binder.install(PortModule(9090));

        let binds = binder.elements.iter().filter(|e| matches!(e, Element::Bind(_))).count();
        assert_eq!(binds, 2);
    }
}
