//! Cache invalidation shared by graph implementations.

/// Anything that caches derived structure (layer indices, ...) should
/// implement this.
pub trait InvalidateCache {
    /// Drop *all* internal caches so future queries recompute correctly.
    fn invalidate_cache(&mut self);
}
