//! Preemption-counter bypass for mapping in interrupt-like context.
//!
//! Debugger commands run in an interrupt-like context where the host keeps a
//! nonzero preemption/nesting count, and the mapping primitives assert that
//! count is zero before they will run. [`PreemptBypass`] swaps the counter to
//! zero for the duration of a scope and restores the saved depth on drop.
//! The saved value lives inside the guard itself, so scopes may nest or run
//! on independent counters without clobbering each other; the host shell is
//! still expected to serialize commands touching the same counter.
use std::sync::atomic::{AtomicU32, Ordering};

/// Per-CPU preemption/nesting counter as seen by the mapping primitives.
/// A nonzero value means "do not preempt / do not sleep here".
#[derive(Debug, Default)]
pub struct PreemptCount(AtomicU32);

impl PreemptCount {
    pub fn new(initial: u32) -> Self {
        Self(AtomicU32::new(initial))
    }

    #[inline(always)]
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    /// Increment the nesting depth, as the host does on interrupt entry.
    pub fn raise(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the nesting depth, as the host does on interrupt exit.
    pub fn lower(&self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }

    fn take(&self) -> u32 {
        self.0.swap(0, Ordering::SeqCst)
    }

    fn add(&self, depth: u32) {
        self.0.fetch_add(depth, Ordering::SeqCst);
    }
}

/// Scoped bypass: zero the counter on entry, add the saved depth back on
/// drop. Neither direction can fail.
pub struct PreemptBypass<'a> {
    count: &'a PreemptCount,
    saved: u32,
}

impl<'a> PreemptBypass<'a> {
    pub fn enter(count: &'a PreemptCount) -> Self {
        let saved = count.take();
        Self { count, saved }
    }

    /// Depth captured at entry.
    #[inline(always)]
    pub fn saved(&self) -> u32 {
        self.saved
    }
}

impl Drop for PreemptBypass<'_> {
    fn drop(&mut self) {
        self.count.add(self.saved);
    }
}
