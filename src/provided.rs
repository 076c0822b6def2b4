//! The three-way result of a single provisioning attempt.
use crate::ptr::AnyArc;

/// What a provider produced for one resolution attempt.
///
/// `Null` is the Rust stand-in for "the binding legitimately produced no
/// value" (`spec.md` §4.8.5) — callers expecting a non-nullable dependency
/// turn this into [`crate::errors::ProvisionError::NullNotAllowed`], callers
/// resolving an `Option<Arc<T>>` dependency accept it as `None`.
///
/// `Proxy` marks a value that is a circular-dependency placeholder: scopes
/// must recognize this variant and must not cache it (`spec.md` §4.7/§4.9) —
/// caching a proxy would permanently hand out a stale placeholder instead of
/// the real value once construction completes.
#[derive(Clone)]
pub enum ProvidedValue
{
    Value(AnyArc),
    Proxy(AnyArc),
    Null,
}

impl ProvidedValue
{
    pub fn is_proxy(&self) -> bool
    {
        matches!(self, ProvidedValue::Proxy(_))
    }
}
