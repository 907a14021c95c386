//! Stack safety for recursive type inference.
//!
//! Inference is a memoized recursive descent over syntax trees that are
//! edited live and are often incomplete. Two things can go wrong:
//!
//! - A legitimately deep tree (long operator chains, nested blocks) exhausts
//!   the native stack.
//! - A malformed tree (a constant whose initializer refers back to itself
//!   through another constant) recurses without bound.
//!
//! [`ensure_sufficient_stack`] handles the first by growing the stack on
//! demand. [`DepthLimit`] handles the second by cutting recursion off at a
//! configured depth so the caller can fall back to an indeterminate result.
//!
//! # Platform Support
//!
//! - **Native targets**: Uses the `stacker` crate to grow the stack on demand.
//! - **WASM targets**: No-op passthrough (WASM has its own stack management).

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// If the remaining stack is below the red zone, additional stack is
/// allocated before calling `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Upper bound on recursion depth for a single top-level query.
///
/// The limit is a plain value; callers track the current depth themselves
/// (usually as the length of an explicit stack of active nodes) and ask
/// [`DepthLimit::allows`] before descending.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DepthLimit(u32);

impl DepthLimit {
    /// Default bound used by the inference engine.
    pub const DEFAULT: Self = Self(512);

    /// Create a limit. A zero limit is raised to one so the root is always visited.
    #[inline]
    pub const fn new(max_depth: u32) -> Self {
        if max_depth == 0 {
            Self(1)
        } else {
            Self(max_depth)
        }
    }

    /// The configured maximum depth.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether a frame at `depth` (0 = root) may still be entered.
    #[inline]
    pub fn allows(self, depth: usize) -> bool {
        u32::try_from(depth).is_ok_and(|d| d < self.0)
    }
}

impl Default for DepthLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}
