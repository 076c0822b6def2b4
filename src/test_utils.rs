//! Shared test fixtures, mirroring the purpose (if not the contents) of the
//! teacher's own `src/test_utils.rs`.
#![cfg(test)]

use crate::injector::Injector;
use crate::module::{Binder, Module};

struct EmptyModule;

impl Module for EmptyModule
{
    fn configure(&self, _binder: &mut Binder) {}
}

/// A freshly built injector with no bindings at all — enough to exercise
/// JIT construction of `Default`-able types and other paths that don't need
/// an explicit binding.
pub fn empty_injector() -> Injector
{
    let injector = Injector::build(vec![Box::new(EmptyModule)]).expect("empty module always builds");
    std::sync::Arc::try_unwrap(injector)
        .unwrap_or_else(|_| panic!("no other strong reference should exist yet"))
}
