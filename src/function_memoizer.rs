use crate::{EnsureSend, EnsureSync};
use core::fmt;
use core::fmt::{Debug, Formatter};
use core::hash::Hash;
use dashmap::DashMap;

/// Caches the results of a function per input key so each distinct key is
/// computed at most once across all callers, then served from the cache.
///
/// Cached entries are never updated or evicted. Under concurrent first calls
/// with the same key the function may run more than once, but only one result
/// is installed and every caller returns that installed value: at most one
/// cached result, not at most one invocation. Distinct keys never block each
/// other.
///
/// # Example
/// ```
/// use memo_wait::FunctionMemoizer;
///
/// let lengths = FunctionMemoizer::new(|word: &&str| word.len());
/// assert_eq!(lengths.call("ab"), 2);
/// assert_eq!(lengths.call("abc"), 3);
/// assert_eq!(lengths.call("ab"), 2);
/// ```
pub struct FunctionMemoizer<F, K, V> {
    function: F,
    cache: DashMap<K, V>,
}
impl<F, K, V> FunctionMemoizer<F, K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Wraps `function` with an empty cache.
    pub fn new(function: F) -> Self {
        Self {
            function,
            cache: DashMap::new(),
        }
    }

    /// Returns the cached value for `key`, computing it first if no call has
    /// cached it yet.
    pub fn call(&self, key: K) -> V
    where
        F: Fn(&K) -> V,
    {
        if let Some(value) = self.cache.get(&key) {
            return value.clone();
        }
        // Computed outside the map so a slow function never holds a shard
        // lock; whichever racer installs first wins.
        let value = (self.function)(&key);
        self.cache.entry(key).or_insert(value).clone()
    }

    /// Fallible version of [`call`](Self::call). An error from the function
    /// propagates untouched and leaves `key` uncached, so a later call
    /// retries the computation.
    pub fn try_call<E>(&self, key: K) -> Result<V, E>
    where
        F: Fn(&K) -> Result<V, E>,
    {
        if let Some(value) = self.cache.get(&key) {
            return Ok(value.clone());
        }
        let value = (self.function)(&key)?;
        Ok(self.cache.entry(key).or_insert(value).clone())
    }
}
impl<F, K, V> Debug for FunctionMemoizer<F, K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionMemoizer")
            .field("function", &"omitted")
            .field("cached", &self.cache.len())
            .finish()
    }
}
impl<F, K, V> EnsureSend for FunctionMemoizer<F, K, V>
where
    F: Send,
    K: Eq + Hash + Send,
    V: Send,
{
}
impl<F, K, V> EnsureSync for FunctionMemoizer<F, K, V>
where
    F: Sync,
    K: Eq + Hash + Send + Sync,
    V: Send + Sync,
{
}

#[cfg(test)]
mod test {
    use crate::FunctionMemoizer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn caches_first_result_per_key() {
        let counter = AtomicUsize::new(0);
        let memoizer = FunctionMemoizer::new(|_key: &String| counter.fetch_add(1, Ordering::SeqCst));
        let first = memoizer.call(String::from("input"));
        for _ in 0..30 {
            assert_eq!(memoizer.call(String::from("input")), first);
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn distinct_keys_are_cached_independently() {
        let lengths = FunctionMemoizer::new(|word: &&str| word.len());
        assert_eq!(lengths.call("ab"), 2);
        assert_eq!(lengths.call("abc"), 3);
        assert_eq!(lengths.call("ab"), 2);
    }

    #[test]
    fn different_keys_get_fresh_results() {
        let counter = AtomicUsize::new(0);
        let memoizer = FunctionMemoizer::new(|_key: &u32| counter.fetch_add(1, Ordering::SeqCst));
        let first = memoizer.call(1);
        let second = memoizer.call(2);
        assert_ne!(first, second);
        assert_eq!(memoizer.call(1), first);
        assert_eq!(memoizer.call(2), second);
    }

    #[test]
    fn failed_computation_is_not_cached() {
        let attempts = AtomicUsize::new(0);
        let memoizer = FunctionMemoizer::new(|key: &u32| -> Result<u32, String> {
            match attempts.fetch_add(1, Ordering::SeqCst) {
                0 => Err(String::from("first attempt fails")),
                _ => Ok(key * 2),
            }
        });
        assert!(memoizer.try_call(21).is_err());
        assert_eq!(memoizer.try_call(21), Ok(42));
        assert_eq!(memoizer.try_call(21), Ok(42));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrent_callers_observe_one_cached_value() {
        let counter = AtomicUsize::new(0);
        let memoizer = FunctionMemoizer::new(|_key: &&str| counter.fetch_add(1, Ordering::SeqCst));
        let barrier = Barrier::new(8);
        let results: Vec<usize> = thread::scope(|scope| {
            (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        memoizer.call("key")
                    })
                })
                .collect::<Vec<_>>()
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });
        let cached = memoizer.call("key");
        for result in results {
            assert_eq!(result, cached);
        }
    }
}
