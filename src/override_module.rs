//! Override composition (`spec.md` §4.5): `overrides(base).with(overlay)`
//! re-runs `base` and `overlay` into the same element stream, then, for any
//! key or named scope both configure, keeps only `overlay`'s. New relative
//! to the teacher, grounded in the same element-stream rewrite idea as
//! `src/private_module.rs`.
use std::collections::{HashMap, HashSet};

use crate::element::Element;
use crate::key::Key;
use crate::module::{Binder, Module};

/// A module composed of a base set of modules with a set of overlay modules
/// whose bindings win on conflict.
pub struct OverrideModule
{
    base: Vec<Box<dyn Module>>,
    overlay: Vec<Box<dyn Module>>,
}

/// Starts an override composition: `overrides(vec![Box::new(BaseModule)])`.
pub fn overrides(base: Vec<Box<dyn Module>>) -> OverrideModule
{
    OverrideModule {
        base,
        overlay: Vec::new(),
    }
}

impl OverrideModule
{
    #[must_use]
    pub fn with(mut self, overlay: Vec<Box<dyn Module>>) -> Self
    {
        self.overlay = overlay;
        self
    }
}

impl Module for OverrideModule
{
    fn configure(&self, binder: &mut Binder)
    {
        let mut base_binder = Binder::new(binder.stack_trace_mode);
        base_binder.module_chain = binder.module_chain.clone();
        for module in &self.base
        {
            module.configure(&mut base_binder);
        }

        let mut overlay_binder = Binder::new(binder.stack_trace_mode);
        overlay_binder.module_chain = binder.module_chain.clone();
        for module in &self.overlay
        {
            module.configure(&mut overlay_binder);
        }

        let overlay_keys: HashMap<Key, ()> = overlay_binder
            .elements
            .iter()
            .filter_map(element_key)
            .map(|k| (k, ()))
            .collect();

        let overlay_scopes: HashSet<&'static str> =
            overlay_binder.elements.iter().filter_map(element_scope_name).collect();

        binder.errors.extend(base_binder.errors);
        binder.errors.extend(overlay_binder.errors);

        for element in base_binder.elements
        {
            // Overlay wins: a base binding/scope overlay also configures is
            // dropped entirely rather than kept alongside it.
            let overridden = element_key(&element).is_some_and(|key| overlay_keys.contains_key(&key))
                || element_scope_name(&element).is_some_and(|name| overlay_scopes.contains(name));

            if !overridden
            {
                binder.elements.push(element);
            }
        }

        binder.elements.extend(overlay_binder.elements);
    }
}

fn element_key(element: &Element) -> Option<Key>
{
    match element
    {
        Element::Bind(b) | Element::BindConstant(b) => Some(b.key.clone()),
        _ => None,
    }
}

fn element_scope_name(element: &Element) -> Option<&'static str>
{
    match element
    {
        Element::BindScope { name, .. } => Some(*name),
        _ => None,
    }
}
