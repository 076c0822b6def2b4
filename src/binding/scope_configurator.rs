//! The terminal step of a binding chain: `bind::<T>().to_constructor(...)`
//! has already been pushed onto the [`Binder`] as `Unscoped` by the time a
//! [`ScopeConfigurator`] is handed back; `.in_scope()` (or its
//! `.as_singleton()`/`.as_eager_singleton()` shorthands) just rewrites that
//! freshly-pushed binding's scope in place. Generalizes the teacher's
//! `BindingScopeConfigurator` (`src/di_container/blocking/binding/scope_configurator.rs`)
//! from its closed transient/singleton choice to the full [`ScopeChoice`]
//! set, including custom scopes registered under a name.
use std::marker::PhantomData;
use std::sync::Arc;

use crate::binding::ScopeChoice;
use crate::element::Element;
use crate::module::Binder;

pub struct ScopeConfigurator<'b, Interface: ?Sized>
{
    binder: &'b mut Binder,
    _marker: PhantomData<Interface>,
}

impl<'b, Interface: ?Sized> ScopeConfigurator<'b, Interface>
{
    pub(crate) fn new(binder: &'b mut Binder) -> Self
    {
        Self {
            binder,
            _marker: PhantomData,
        }
    }

    fn rewrite_scope(self, scope: ScopeChoice) -> &'b mut Binder
    {
        if let Some(Element::Bind(binding) | Element::BindConstant(binding)) =
            self.binder.elements.last_mut()
        {
            // Refcount is still 1 here: nothing else has had a chance to
            // clone this `Arc` since `Binder::push_binding` created it a
            // moment ago.
            if let Some(binding) = Arc::get_mut(binding)
            {
                binding.scope = scope;
            }
        }

        self.binder
    }

    /// The general entry point, also used for `spec.md` §4.9's
    /// registered-by-name custom scopes via `ScopeChoice::Custom`.
    pub fn in_scope(self, scope: ScopeChoice) -> &'b mut Binder
    {
        self.rewrite_scope(scope)
    }

    pub fn as_singleton(self) -> &'b mut Binder
    {
        self.rewrite_scope(ScopeChoice::Singleton)
    }

    /// Built eagerly when the injector is constructed rather than lazily on
    /// first request — see `Injector::build`.
    pub fn as_eager_singleton(self) -> &'b mut Binder
    {
        self.rewrite_scope(ScopeChoice::EagerSingleton)
    }
}
