//! Errors raised while building an injector from a set of modules.
use std::fmt;

use thiserror::Error;

use crate::key::Key;
use crate::source::Source;

/// A single configuration-time failure. Module configuration accumulates
/// these rather than aborting on the first one (`spec.md` §4.3/§7): every
/// `Binder` method that can fail pushes an error onto the binder's error
/// list and the whole chain stops only once at build time.
#[derive(Error, Debug)]
pub enum ConfigurationError
{
    #[error("a binding for {key} already exists, bound {first_source} and again {second_source}")]
    DuplicateBinding
    {
        key: Key,
        first_source: Source,
        second_source: Source,
    },

    #[error("no binding found for {key}, requested {source}")]
    BindingNotFound { key: Key, source: Source },

    #[error("{type_name} contains an unresolved type variable and cannot be used as a key")]
    UnresolvedTypeVariable { type_name: String },

    #[error("the scope {scope} is already bound to a different implementation")]
    DuplicateScopeBinding { scope: &'static str },

    #[error("{key} is bound in scope {scope}, but no scope is registered under that name")]
    ScopeNotFound { key: Key, scope: &'static str },

    #[error("{key} is already explicitly bound in the parent injector and cannot be rebound")]
    ParentBindingConflict { key: Key },

    #[error("{key} cannot be exposed: it is not bound within the private module exposing it")]
    ExposingUnboundKey { key: Key },

    #[error("{message}, added {source}")]
    Custom { message: String, source: Source },
}

/// The aggregate of every [`ConfigurationError`] accumulated while building
/// an injector. Implemented by hand rather than via `thiserror`'s derive
/// because its `Display` needs to enumerate a `Vec` field, which is simplest
/// as a plain `impl`.
#[derive(Debug)]
pub struct ConfigurationErrors(pub Vec<ConfigurationError>);

impl ConfigurationErrors
{
    pub fn is_empty(&self) -> bool
    {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize
    {
        self.0.len()
    }
}

impl fmt::Display for ConfigurationErrors
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        writeln!(f, "configuration failed with {} error(s):", self.0.len())?;

        for (i, err) in self.0.iter().enumerate()
        {
            writeln!(f, "{}) {err}", i + 1)?;
        }

        Ok(())
    }
}

impl std::error::Error for ConfigurationErrors {}
