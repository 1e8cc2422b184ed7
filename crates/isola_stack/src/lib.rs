//! Stack growth for recursive tree walks.
//!
//! Expression trees decoded from real modules can nest control flow
//! thousands of levels deep (compilers emit long `block` ladders for
//! `br_table` dispatch). Copying, printing and folding those trees are all
//! recursive, so every recursive step goes through [`ensure_sufficient_stack`].
//!
//! - **Native targets**: grows the stack on demand with `stacker`.
//! - **WASM targets**: plain call.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const NEW_SEGMENT: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than [`RED_ZONE`] remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, NEW_SEGMENT, f)
}

/// WASM version: the host engine owns the stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
