#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_debug_implementations, missing_docs, unused_import_braces)]

//! Polling waits and memoization primitives for multithreaded code.
//!
//! The wait functions block the calling thread until a condition holds or a
//! timeout passes, re-checking at a fixed interval. The memoizers wrap an
//! expensive producer so repeated calls are served from a cache that is safe
//! to share between threads. Neither depends on the other.

extern crate alloc;

mod error;
#[cfg(feature = "std")]
mod function_memoizer;
mod polling_wait;
#[cfg(feature = "std")]
mod supplier_memoizer;

pub use error::*;
#[cfg(feature = "std")]
pub use function_memoizer::*;
pub use polling_wait::*;
#[cfg(feature = "std")]
pub use supplier_memoizer::*;

trait EnsureSend: Send {}
trait EnsureSync: Sync {}
