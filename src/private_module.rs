//! Private modules (`spec.md` §4.4): bindings installed here stay
//! encapsulated from the rest of the injector unless explicitly exposed.
//! New relative to the teacher, which has no submodule privacy; grounded in
//! the modular-registry pattern in `other_examples/oosquare-iocc`.
use crate::module::Binder;

/// A module whose bindings are private by default. Distinct from
/// [`crate::module::Module`] only in name — the encapsulation itself is
/// enforced by [`Binder::install_private`], which only lets keys marked via
/// [`Binder::expose`] reach the outer injector.
pub trait PrivateModule: Send + Sync
{
    fn configure(&self, binder: &mut Binder);
}

impl<T: PrivateModule> crate::module::Module for Wrapped<T>
{
    fn configure(&self, binder: &mut Binder)
    {
        self.0.configure(binder);
    }
}

/// Adapts any [`PrivateModule`] into an ordinary [`crate::module::Module`]
/// for code paths (like `Binder::install`) that only know about the latter.
pub struct Wrapped<T>(pub T);

/// Returned by [`Binder::install_private`]: the set of keys the private
/// module chose to expose, for callers that want to confirm what became
/// visible without re-reading the element stream.
#[derive(Debug, Clone)]
pub struct PrivateModuleHandle
{
    pub exposed: Vec<crate::key::Key>,
}
