//! Stack growth for the recursive parser and evaluator.
//!
//! Nesting depth is capped by the parser, but a tree at the cap still recurses
//! a few hundred levels deep (more in debug builds, where frames are large).
//! Recursive entry points run through [`ensure_sufficient_stack`], which grows
//! the stack on demand instead of overflowing it.

/// Grow when less than this much stack remains (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each newly allocated stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
