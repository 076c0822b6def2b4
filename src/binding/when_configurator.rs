//! Retroactively attaching a qualifier to an already-made binding — the
//! generalization of the teacher's `BindingWhenConfigurator::when_named`
//! (`src/di_container/blocking/binding/when_configurator.rs`), which
//! renames an existing unnamed binding rather than requiring the name be
//! known up front. Ordinary bindings reach for
//! [`crate::binding::builder::BindingBuilder::annotated_with`] instead,
//! since a qualifier is almost always known before the binding is written;
//! this is for the rarer case of qualifying a binding built by code that
//! doesn't know its own qualifier (e.g. a generic helper installing the
//! same constructor under several names).
use std::marker::PhantomData;
use std::sync::Arc;

use crate::element::Element;
use crate::errors::ConfigurationError;
use crate::key::Key;
use crate::module::Binder;
use crate::qualifier::Qualifier;

pub struct WhenConfigurator<'b, Interface: ?Sized>
{
    binder: &'b mut Binder,
    _marker: PhantomData<Interface>,
}

impl<'b, Interface: 'static + ?Sized> WhenConfigurator<'b, Interface>
{
    pub(crate) fn new(binder: &'b mut Binder) -> Self
    {
        Self {
            binder,
            _marker: PhantomData,
        }
    }

    /// Finds the most recently pushed, still-unqualified binding for
    /// `Interface` and re-keys it under `qualifier`. Fails if no such
    /// binding exists.
    pub fn when_qualified(self, qualifier: Qualifier) -> Result<(), ConfigurationError>
    {
        let target = Key::of::<Interface>();

        let found = self.binder.elements.iter_mut().rev().find_map(|element| {
            match element
            {
                Element::Bind(binding) | Element::BindConstant(binding) =>
                {
                    if binding.key == target
                    {
                        Arc::get_mut(binding)
                    }
                    else
                    {
                        None
                    }
                }
                _ => None,
            }
        });

        match found
        {
            Some(binding) =>
            {
                binding.key = binding.key.clone().with_annotation(qualifier);
                Ok(())
            }
            None => Err(ConfigurationError::BindingNotFound {
                key: target,
                source: self.binder.source(),
            }),
        }
    }
}
