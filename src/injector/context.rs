//! The explicit resolution context threaded through every recursive
//! resolve call — the generalization of the teacher's `dependency_history:
//! Vec<&'static str>` parameter threaded through
//! `Injectable::resolve` (`src/interfaces/injectable.rs`), widened from
//! type names to full [`Key`]s and paired with the JIT rollback-generation
//! bookkeeping described in `spec.md` §9.
use std::sync::{Arc, Mutex};

use crate::contextual::InjectionPoint;
use crate::key::Key;

type Cleanup = Box<dyn FnOnce() + Send>;

/// Carries the in-progress dependency chain (for cycle detection and error
/// traces) and the current JIT "generation" (the set of JIT bindings
/// speculatively created during this top-level resolution, rolled back as
/// one atomic unit on failure).
#[derive(Clone)]
pub struct ResolveContext
{
    chain: Vec<Key>,
    generation: Arc<Mutex<Vec<Cleanup>>>,
    is_root: bool,
    injection_point: Option<InjectionPoint>,
}

impl ResolveContext
{
    /// Starts a brand new top-level resolution — called only by the
    /// injector's public entry points, never recursively.
    pub fn root() -> Self
    {
        Self {
            chain: Vec::new(),
            generation: Arc::new(Mutex::new(Vec::new())),
            is_root: true,
            injection_point: None,
        }
    }

    pub fn chain(&self) -> &[Key]
    {
        &self.chain
    }

    pub fn is_in_progress(&self, key: &Key) -> bool
    {
        self.chain.contains(key)
    }

    /// Descends one level into resolving `key`, extending the dependency
    /// chain. The returned context is never the generation owner, so
    /// dropping it never triggers rollback bookkeeping — only the root
    /// context's owner does that, explicitly, via [`ResolveContext::finish`].
    #[must_use]
    pub fn descend(&self, key: Key) -> Self
    {
        let mut chain = self.chain.clone();
        chain.push(key);

        Self {
            chain,
            generation: self.generation.clone(),
            is_root: false,
            injection_point: self.injection_point.clone(),
        }
    }

    #[must_use]
    pub fn with_injection_point(&self, point: InjectionPoint) -> Self
    {
        let mut clone = self.clone();
        clone.injection_point = Some(point);
        clone
    }

    pub fn injection_point(&self) -> Option<&InjectionPoint>
    {
        self.injection_point.as_ref()
    }

    /// Records a cleanup to run if the top-level resolution that owns this
    /// generation ultimately fails. Called whenever a new JIT binding is
    /// materialized.
    pub fn record_jit_cleanup(&self, cleanup: Cleanup)
    {
        self.generation.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push(cleanup);
    }

    /// Finalizes the generation this context owns: on success, the
    /// speculative JIT bindings are kept; on failure, every cleanup
    /// recorded during the whole call tree runs, rolling them all back
    /// atomically. A no-op for non-root contexts.
    pub fn finish<T, E>(&self, result: Result<T, E>) -> Result<T, E>
    {
        if !self.is_root
        {
            return result;
        }

        let mut generation = self.generation.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        if result.is_err()
        {
            for cleanup in generation.drain(..)
            {
                cleanup();
            }
        }
        else
        {
            generation.clear();
        }

        drop(generation);

        result
    }
}
