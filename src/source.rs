//! Declaring-source tracking for bindings and module installs.
use std::fmt;
use std::panic::Location;

use crate::capability::StackTraceMode;

/// Where a binding or module-level error was declared: the chain of modules
/// that were being installed at the time, plus (depending on
/// [`StackTraceMode`]) the call-site location or a full backtrace.
///
/// Rust has no reflective stack-walking the way a JVM does; `#[track_caller]`
/// plus `Location::caller()` is the closest stable equivalent to "capture
/// just the declaring frame", and `std::backtrace::Backtrace` (stable,
/// already in the standard library — no new dependency) covers the
/// `COMPLETE` case.
#[derive(Clone)]
pub struct Source
{
    module_chain: Vec<&'static str>,
    frame: Option<&'static Location<'static>>,
    backtrace: Option<std::sync::Arc<std::backtrace::Backtrace>>,
}

impl Source
{
    #[track_caller]
    pub fn capture(module_chain: Vec<&'static str>, mode: StackTraceMode) -> Self
    {
        let frame = match mode
        {
            StackTraceMode::Off => None,
            StackTraceMode::OnlyForDeclaringSource | StackTraceMode::Complete =>
            {
                Some(Location::caller())
            }
        };

        let backtrace = match mode
        {
            StackTraceMode::Complete =>
            {
                Some(std::sync::Arc::new(std::backtrace::Backtrace::capture()))
            }
            StackTraceMode::Off | StackTraceMode::OnlyForDeclaringSource => None,
        };

        Self {
            module_chain,
            frame,
            backtrace,
        }
    }

    pub fn unknown() -> Self
    {
        Self {
            module_chain: Vec::new(),
            frame: None,
            backtrace: None,
        }
    }

    pub fn module_chain(&self) -> &[&'static str]
    {
        &self.module_chain
    }
}

impl fmt::Display for Source
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        if self.module_chain.is_empty() && self.frame.is_none()
        {
            return write!(f, "an unknown source");
        }

        if !self.module_chain.is_empty()
        {
            write!(f, "via {}", self.module_chain.join(" -> "))?;
        }

        if let Some(frame) = self.frame
        {
            if !self.module_chain.is_empty()
            {
                write!(f, " ")?;
            }
            write!(f, "({}:{})", frame.file(), frame.line())?;
        }

        if let Some(backtrace) = &self.backtrace
        {
            write!(f, "\n{backtrace}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Source
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "Source({self})")
    }
}
