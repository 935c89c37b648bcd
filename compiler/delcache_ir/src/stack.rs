//! Stack growth for recursive reference walks.
//!
//! Type references nest arbitrarily (`int[][][]...`, deeply nested generic
//! arguments imported from metadata), and every walk over them recurses.
//! Wrap each recursive step in [`ensure_sufficient_stack`].

/// If less than this remains, grow the stack.
const RED_ZONE: usize = 100 * 1024;

/// Size of each additional stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if the remaining space is below the red zone.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
