//! Build-time capability flags (`InjectorConfig`) and the `Stage` enum.
use std::env;
use std::str::FromStr;

use once_cell::sync::Lazy;
use strum_macros::{Display, EnumString};

/// How much source information a [`crate::source::Source`] captures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, Display)]
pub enum StackTraceMode
{
    #[strum(serialize = "OFF")]
    Off,
    #[strum(serialize = "ONLY_FOR_DECLARING_SOURCE")]
    OnlyForDeclaringSource,
    #[strum(serialize = "COMPLETE")]
    Complete,
}

impl Default for StackTraceMode
{
    fn default() -> Self
    {
        Self::OnlyForDeclaringSource
    }
}

/// Whether AOP method interception is available. Always `Disabled` in this
/// core — no bytecode generation backend is part of this crate (see
/// Non-goals) — but the flag is a real, checked field rather than a
/// hardcoded constant, queried through [`InjectorConfig::supports_interception`]
/// by external collaborators that implement interception on top of this
/// container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, Display)]
pub enum BytecodeGen
{
    #[strum(serialize = "enabled")]
    Enabled,
    #[strum(serialize = "disabled")]
    Disabled,
}

impl Default for BytecodeGen
{
    fn default() -> Self
    {
        Self::Disabled
    }
}

/// The build stage, affecting when singleton-scoped bindings are
/// provisioned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, EnumString, Display)]
pub enum Stage
{
    #[default]
    Development,
    Tool,
    Production,
}

fn read_env<T: FromStr + Default>(var: &str) -> T
{
    env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

static STACK_TRACE_MODE_FROM_ENV: Lazy<StackTraceMode> =
    Lazy::new(|| read_env("INCLUDE_STACK_TRACES"));

static BYTECODE_GEN_FROM_ENV: Lazy<BytecodeGen> = Lazy::new(|| read_env("BYTECODE_GEN"));

pub fn stack_trace_mode_from_env() -> StackTraceMode
{
    *STACK_TRACE_MODE_FROM_ENV
}

pub fn bytecode_gen_from_env() -> BytecodeGen
{
    *BYTECODE_GEN_FROM_ENV
}

/// Per-injector configuration: the two capability flags, the qualifier
/// matching policy, the build stage, and whether circular proxies are
/// permitted.
#[derive(Clone, Debug)]
pub struct InjectorConfig
{
    pub stack_traces: StackTraceMode,
    pub bytecode_gen: BytecodeGen,
    pub stage: Stage,
    /// `true` selects the strict qualifier-matching policy (qualifiers must
    /// match exactly); `false` (the default) allows the lenient fallback
    /// described in `spec.md` §4.2 for qualifiers whose members are all at
    /// their defaults.
    pub strict_qualifiers: bool,
    pub allow_circular_proxies: bool,
}

impl Default for InjectorConfig
{
    fn default() -> Self
    {
        Self {
            stack_traces: StackTraceMode::default(),
            bytecode_gen: BytecodeGen::default(),
            stage: Stage::default(),
            strict_qualifiers: false,
            allow_circular_proxies: true,
        }
    }
}

impl InjectorConfig
{
    pub fn from_env() -> Self
    {
        Self {
            stack_traces: stack_trace_mode_from_env(),
            bytecode_gen: bytecode_gen_from_env(),
            ..Default::default()
        }
    }

    /// Whether a method-interception binding would be honored by this
    /// injector. No interceptor dispatch exists in this core (see
    /// Non-goals), so this is the query point external AOP collaborators
    /// are expected to consult before assuming they'll be invoked.
    #[must_use]
    pub fn supports_interception(&self) -> bool
    {
        self.bytecode_gen == BytecodeGen::Enabled
    }
}
