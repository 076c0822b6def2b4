//! Circular-dependency proxies (`spec.md` §4.7 / design note in §9).
//!
//! Guice synthesizes a dynamic proxy class for an interface at runtime to
//! break a cycle; Rust has no equivalent (the Non-goals explicitly rule out
//! compile-time/bytecode code generation as a substitute). The idiomatic
//! stable-Rust translation kept here is that a trait usable as a circular
//! proxy target needs a small, hand-written forwarding implementation
//! registered once per trait — the author writes exactly the kind of
//! forwarding code a Guice-style dynamic proxy would have generated, just
//! ahead of time instead of at runtime. See DESIGN.md.
use std::sync::{Arc, OnceLock};

use crate::ptr::AnyArc;

/// A slot a circular proxy forwards every call through. Starts empty;
/// filled in exactly once, after the real value finishes constructing, by
/// the injector that created the proxy.
#[derive(Default)]
pub struct ProxySlot
{
    inner: OnceLock<AnyArc>,
}

impl ProxySlot
{
    pub fn new() -> Arc<Self>
    {
        Arc::new(Self::default())
    }

    pub fn fill(&self, value: AnyArc)
    {
        // Ignored if already filled: a slot is only ever supposed to be
        // filled once, by the resolution that created it.
        let _ = self.inner.set(value);
    }

    pub fn get(&self) -> Option<&AnyArc>
    {
        self.inner.get()
    }
}

/// Registered per-key so the injector knows how to build a placeholder for
/// that key when it is re-entered mid-construction. The factory returns the
/// placeholder value (already erased and ready to hand to the caller that
/// re-entered) plus the slot that must be filled once the real value is
/// ready.
pub trait CircularProxyFactory: Send + Sync
{
    fn create_proxy(&self) -> (AnyArc, Arc<ProxySlot>);
}
