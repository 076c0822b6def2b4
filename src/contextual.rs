//! Injection-point-aware providers (`spec.md` §4.10): a plain boxed-closure
//! contract rather than the teacher's nightly-only `factory` feature
//! (`#![feature(unboxed_closures, fn_traits)]`), since that feature is not
//! representative of the wider stable-Rust corpus — see DESIGN.md.
use crate::errors::ProvisionError;
use crate::key::Key;
use crate::provided::ProvidedValue;

/// What member of what type is requesting the dependency a contextual
/// provider is bound at.
#[derive(Clone, Debug)]
pub enum MemberKind
{
    Constructor
    {
        type_name: &'static str, index: usize
    },
    Field
    {
        type_name: &'static str,
        field_name: &'static str,
    },
    Method
    {
        type_name: &'static str,
        method_name: &'static str,
    },
}

#[derive(Clone, Debug)]
pub struct InjectionPoint
{
    pub key: Key,
    pub member: MemberKind,
}

/// The context handed to a contextual provider: the key being resolved plus,
/// if known, the injection point that triggered the resolution.
#[derive(Clone, Debug)]
pub struct ProvisioningContext
{
    pub key: Key,
    pub injection_point: Option<InjectionPoint>,
}

/// A provider whose output may depend on where it is being injected —
/// the Rust equivalent of Guice's `Provider<T>` consulted with an
/// `InjectionPoint`.
pub trait ContextualProvider: Send + Sync
{
    fn get(&self, ctx: &ProvisioningContext) -> Result<ProvidedValue, ProvisionError>;
}

impl<F> ContextualProvider for F
where
    F: Fn(&ProvisioningContext) -> Result<ProvidedValue, ProvisionError> + Send + Sync,
{
    fn get(&self, ctx: &ProvisioningContext) -> Result<ProvidedValue, ProvisionError>
    {
        self(ctx)
    }
}
