use crate::{EnsureSend, EnsureSync};
use core::fmt;
use core::fmt::{Debug, Formatter};
use once_cell::sync::OnceCell;

/// Caches the result of a zero-argument supplier so it is computed exactly
/// once for the memoizer's lifetime, no matter how many threads race on the
/// first access.
///
/// Once the slot is populated, reads are lock-free. Concurrent first callers
/// block until the winning supplier run finishes and then all observe its
/// value. A produced value is cached even when it is `None` of an `Option`
/// type; only an `Err` from [`try_get`](Self::try_get) leaves the slot empty
/// for a retry.
///
/// # Example
/// ```
/// use memo_wait::SupplierMemoizer;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let runs = AtomicUsize::new(0);
/// let memoizer = SupplierMemoizer::new(|| runs.fetch_add(1, Ordering::SeqCst));
/// assert_eq!(*memoizer.get(), 0);
/// assert_eq!(*memoizer.get(), 0);
/// assert_eq!(runs.load(Ordering::SeqCst), 1);
/// ```
pub struct SupplierMemoizer<F, T> {
    supplier: F,
    slot: OnceCell<T>,
}
impl<F, T> SupplierMemoizer<F, T> {
    /// Wraps `supplier` with an empty slot.
    pub fn new(supplier: F) -> Self {
        Self {
            supplier,
            slot: OnceCell::new(),
        }
    }

    /// Returns the cached value, running the supplier on the first access.
    ///
    /// The supplier runs exactly once; every other caller blocks until the
    /// value is available and reads that same value.
    pub fn get(&self) -> &T
    where
        F: Fn() -> T,
    {
        self.slot.get_or_init(|| (self.supplier)())
    }

    /// Fallible version of [`get`](Self::get). An error from the supplier
    /// propagates to the caller that triggered the attempt and leaves the
    /// slot empty, so a later call retries. Failure is never cached.
    pub fn try_get<E>(&self) -> Result<&T, E>
    where
        F: Fn() -> Result<T, E>,
    {
        self.slot.get_or_try_init(|| (self.supplier)())
    }
}
impl<F, T> Debug for SupplierMemoizer<F, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupplierMemoizer")
            .field("supplier", &"omitted")
            .field("populated", &self.slot.get().is_some())
            .finish()
    }
}
impl<F, T> EnsureSend for SupplierMemoizer<F, T>
where
    F: Send,
    T: Send,
{
}
impl<F, T> EnsureSync for SupplierMemoizer<F, T>
where
    F: Sync,
    T: Send + Sync,
{
}
