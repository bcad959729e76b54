use alloc::string::String;
use core::convert::Infallible;
use core::time::Duration;

/// Error returned by the [`wait_until`](crate::wait_until) family.
///
/// `E` is the error type of a fallible condition; waits on plain `bool`
/// conditions use the [`Infallible`] default.
#[derive(Debug, thiserror::Error)]
pub enum WaitError<E = Infallible> {
    /// The timeout/step pair was rejected before any waiting happened.
    #[error("invalid wait configuration: step {step:?} must be positive and within timeout {timeout:?}")]
    InvalidConfig {
        /// Maximum total wait duration that was requested.
        timeout: Duration,
        /// Interval between condition checks that was requested.
        step: Duration,
    },
    /// The condition itself failed. The cause is preserved and the wait is
    /// not retried.
    #[error("condition evaluation failed")]
    Condition(#[source] E),
    /// The condition never returned true within the timeout. Carries the
    /// configured failure message.
    #[error("{0}")]
    Timeout(String),
}
