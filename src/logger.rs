//! A minimal value type standing in for the injector's built-in "Logger"
//! default binding (`spec.md` §4.6 step 4's special-cased type). This is
//! deliberately not a real logging facade — integrating with an actual
//! logging crate is an external-collaborator concern (see Non-goals) — it
//! only carries the name the injector fills in from the injection site.

/// Its `Injectable` impl lives in `injector/provision.rs`, next to
/// `resolve_logger` which it calls — `Logger` deliberately does not
/// derive/implement `Default`, since that would make it satisfy the
/// blanket `Injectable` impl and never reach `resolve_logger` at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Logger
{
    name: Option<&'static str>,
}

impl Logger
{
    pub fn named(name: &'static str) -> Self
    {
        Self { name: Some(name) }
    }

    pub fn anonymous() -> Self
    {
        Self { name: None }
    }

    pub fn name(&self) -> Option<&'static str>
    {
        self.name
    }
}
