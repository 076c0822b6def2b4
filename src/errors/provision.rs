//! Errors raised while resolving a single instance from a built injector.
use thiserror::Error;

use crate::errors::configuration::ConfigurationError;
use crate::key::Key;

/// Failure to produce an instance for a [`Key`]. Mirrors the teacher's
/// `InjectableError` (`ResolveFailed`/`DetectedCircular`) widened with the
/// additional failure modes JIT binding and member injection introduce.
#[derive(Error, Debug)]
pub enum ProvisionError
{
    #[error("no binding exists for {key}")]
    BindingNotFound { key: Key },

    #[error("failed to resolve a dependency of {affected}: {reason}")]
    ResolveFailed
    {
        affected: Key,
        #[source]
        reason: Box<ProvisionError>,
    },

    #[error("constructing {key} failed: {cause}")]
    ConstructorFailed
    {
        key: Key,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{key} produced null but its injection point is not nullable (chain: {trace})")]
    NullNotAllowed { key: Key, trace: String },

    #[error("detected a circular dependency while resolving {key} (chain: {trace})")]
    Circular { key: Key, trace: String },

    #[error("detected a circular dependency while resolving {key}, and no circular-proxy factory is registered for it (chain: {trace})")]
    CircularWithoutProxy { key: Key, trace: String },

    #[error("the value bound for {key} does not match the type requested at its injection point")]
    DowncastMismatch { key: Key },

    #[error(transparent)]
    Configuration(#[from] Box<ConfigurationError>),
}

impl ProvisionError
{
    /// Wraps `self` as the reason a dependency of `affected` failed to
    /// resolve, the way the teacher's `InjectableError::ResolveFailed` wraps
    /// a nested `DIContainerError`.
    pub fn affecting(self, affected: Key) -> Self
    {
        Self::ResolveFailed {
            affected,
            reason: Box::new(self),
        }
    }
}

/// Renders a dependency chain with the offending key highlighted, the same
/// shape as the teacher's `create_dependency_trace`
/// (`src/dependency_trace.rs`), generalized from `&'static str` component
/// names to full [`Key`]s so qualifiers show up in the trace too.
pub fn create_dependency_trace(chain: &[Key], offending: &Key) -> String
{
    let mut trace = String::new();

    for (i, key) in chain.iter().enumerate()
    {
        if i > 0
        {
            trace.push_str(" -> ");
        }

        if key == offending
        {
            trace.push_str(&format!("\x1b[1m{key}\x1b[22m"));
        }
        else
        {
            trace.push_str(&key.to_string());
        }
    }

    if chain.last() != Some(offending)
    {
        if !chain.is_empty()
        {
            trace.push_str(" -> ");
        }
        trace.push_str(&format!("\x1b[1m{offending}\x1b[22m"));
    }

    trace
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn trace_highlights_offending_key()
    {
        let chain = vec![Key::of::<u32>(), Key::of::<u64>()];
        let trace = create_dependency_trace(&chain, &Key::of::<u64>());

        assert!(trace.contains("\x1b[1mu64\x1b[22m"));
        assert!(trace.starts_with("u32 ->"));
    }
}
