//! The binding data model: a declarative [`BindingKind`] plus the
//! executable [`crate::injector::provision::ErasedProvider`] it compiles
//! down to, wrapped by a chosen [`ScopeChoice`].
pub mod builder;
pub mod scope_configurator;
pub mod when_configurator;

use std::fmt;
use std::sync::Arc;

use crate::errors::ProvisionError;
use crate::injector::context::ResolveContext;
use crate::injector::provision::ErasedProvider;
use crate::injector::Injector;
use crate::key::Key;
use crate::source::Source;

pub use builder::BindingBuilder;

/// A simple, non-contextual provider — the Rust analogue of Guice's plain
/// `Provider<T>`. `None` models a legitimately-null production
/// (`spec.md` §4.8.5).
pub trait Provider<Interface: ?Sized>: Send + Sync
{
    fn get(
        &self,
        injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<Option<std::sync::Arc<Interface>>, ProvisionError>;
}

/// Which of the eight binding variants (`spec.md` §3) a [`Binding`] is —
/// purely descriptive, used for introspection (`Injector::get_binding`) and
/// duplicate-binding diagnostics. The actual resolution behavior lives in
/// `Binding::provider`.
#[derive(Debug, Clone)]
pub enum BindingKind
{
    Instance,
    Linked
    {
        target: Key
    },
    ProviderInstance,
    ProviderKey
    {
        provider_key: Key
    },
    Constructor
    {
        type_name: &'static str
    },
    Constant
    {
        literal_type: &'static str
    },
    Untargetted,
    Exposed
    {
        target: Key
    },
}

impl fmt::Display for BindingKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            BindingKind::Instance => write!(f, "instance"),
            BindingKind::Linked { target } => write!(f, "linked to {target}"),
            BindingKind::ProviderInstance => write!(f, "provider instance"),
            BindingKind::ProviderKey { provider_key } =>
            {
                write!(f, "provider key {provider_key}")
            }
            BindingKind::Constructor { type_name } => write!(f, "constructor {type_name}"),
            BindingKind::Constant { literal_type } => write!(f, "constant {literal_type}"),
            BindingKind::Untargetted => write!(f, "untargetted"),
            BindingKind::Exposed { target } => write!(f, "exposed {target}"),
        }
    }
}

/// The scope a binding was configured with (`spec.md` §4.9). `Custom`
/// carries the registered scope's name, looked up in the injector's scope
/// registry at binding-freeze time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeChoice
{
    Unscoped,
    Singleton,
    EagerSingleton,
    Custom(&'static str),
}

impl fmt::Display for ScopeChoice
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            ScopeChoice::Unscoped => write!(f, "unscoped"),
            ScopeChoice::Singleton => write!(f, "singleton"),
            ScopeChoice::EagerSingleton => write!(f, "eager singleton"),
            ScopeChoice::Custom(name) => write!(f, "custom scope {name}"),
        }
    }
}

/// A fully-built binding: the key it answers, what kind of binding it is,
/// the scope it runs under, where it was declared, and the executable
/// provider (already wrapped by its scope) that actually produces values.
pub struct Binding
{
    pub key: Key,
    pub kind: BindingKind,
    pub scope: ScopeChoice,
    pub source: Source,
    pub(crate) scoped_provider: Arc<dyn ErasedProvider>,
}

impl Binding
{
    pub fn provide(
        &self,
        injector: &Injector,
        ctx: &ResolveContext,
    ) -> Result<crate::provided::ProvidedValue, ProvisionError>
    {
        self.scoped_provider.provide(injector, ctx)
    }
}

impl fmt::Debug for Binding
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("scope", &self.scope)
            .finish()
    }
}

/// A read-only projection of a [`Binding`] for `Injector::get_binding`
/// (`spec.md` §6) — callers never see the executable provider directly, the
/// same discipline the teacher applies by keeping `Box<dyn IProvider<_>>`
/// private to the container.
#[derive(Debug, Clone)]
pub struct BindingView
{
    pub key: Key,
    pub kind_description: String,
    pub scope: ScopeChoice,
    pub source_description: String,
}

impl From<&Binding> for BindingView
{
    fn from(binding: &Binding) -> Self
    {
        Self {
            key: binding.key.clone(),
            kind_description: binding.kind.to_string(),
            scope: binding.scope.clone(),
            source_description: binding.source.to_string(),
        }
    }
}
