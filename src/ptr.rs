//! Smart pointer type aliases and the type-erasure bridge used to store
//! heterogeneous bindings behind one common map value type.
use std::any::Any;
use std::sync::Arc;

/// A type-erased, thread-safe handle to a provisioned value.
///
/// Every binding's output is stored behind this alias regardless of whether
/// the bound `Interface` is a concrete type or a trait object, via the
/// [`erase`]/[`unerase`] pair below.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Bridges an arbitrary `Arc<T>` (`T` possibly `?Sized`, e.g. a trait object)
/// into [`AnyArc`].
///
/// `Arc<dyn Trait>` cannot itself be downcast through `dyn Any` because
/// unsizing to `dyn Any` requires `Trait: Any`, which arbitrary user traits
/// don't declare. `Holder` sidesteps this: the *holder* is a plain, `Sized`,
/// `'static` struct (its only field is a fat pointer, not a DST), so it gets
/// `Any` for free no matter what `T` is.
struct Holder<T: ?Sized>(Arc<T>);

/// Erases `value` into an [`AnyArc`].
pub fn erase<T: 'static + ?Sized + Send + Sync>(value: Arc<T>) -> AnyArc {
    Arc::new(Holder(value))
}

/// Recovers an `Arc<T>` previously erased with [`erase`].
pub fn unerase<T: 'static + ?Sized + Send + Sync>(any: &AnyArc) -> Option<Arc<T>> {
    any.clone()
        .downcast::<Holder<T>>()
        .ok()
        .map(|holder| holder.0.clone())
}
