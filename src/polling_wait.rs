use crate::{EnsureSend, EnsureSync, WaitError};
use alloc::string::String;
use concurrency_traits::{ThreadFunctions, TimeFunctions};
use core::convert::Infallible;
use core::time::Duration;

/// Interval between condition checks when none is configured.
pub const DEFAULT_STEP: Duration = Duration::from_millis(200);
/// Message carried by [`WaitError::Timeout`] when none is configured.
pub const DEFAULT_FAILURE_MESSAGE: &str = "waiting for condition timed out";

/// Configuration for a single wait: the timeout, the interval between
/// condition checks and an optional failure message.
///
/// A configuration is validated when the wait starts. `timeout` and step
/// must be positive and the step must not exceed the timeout, otherwise the
/// wait fails with [`WaitError::InvalidConfig`] before evaluating the
/// condition. Note that the 200 ms [`DEFAULT_STEP`] makes timeouts shorter
/// than 200 ms invalid unless a smaller step is set.
#[derive(Clone, Debug)]
pub struct WaitConfig {
    timeout: Duration,
    step: Duration,
    message: Option<String>,
}
impl WaitConfig {
    /// Creates a configuration with the given timeout, [`DEFAULT_STEP`] and
    /// the default failure message.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            step: DEFAULT_STEP,
            message: None,
        }
    }

    /// Sets the interval between condition checks.
    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    /// Sets the message carried by [`WaitError::Timeout`] if the wait fails.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
impl EnsureSend for WaitConfig {}
impl EnsureSync for WaitConfig {}

/// Blocks until `condition` returns true, checking every [`DEFAULT_STEP`].
///
/// Equivalent to [`wait_until_with`] with a default [`WaitConfig`].
///
/// # Example
/// ```
/// # #[cfg(feature = "std")]
/// # {
/// use concurrency_traits::StdThreadFunctions;
/// use memo_wait::wait_until;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::thread;
/// use std::time::Duration;
///
/// let ready = Arc::new(AtomicBool::new(false));
/// let ready_clone = ready.clone();
/// thread::spawn(move || {
///     thread::sleep(Duration::from_millis(50));
///     ready_clone.store(true, Ordering::Release);
/// });
/// wait_until::<StdThreadFunctions, _>(Duration::from_secs(5), || {
///     ready.load(Ordering::Acquire)
/// })
/// .expect("flag was never raised");
/// # }
/// ```
pub fn wait_until<CS, F>(timeout: Duration, condition: F) -> Result<(), WaitError>
where
    CS: ThreadFunctions + TimeFunctions,
    F: FnMut() -> bool,
{
    wait_until_with::<CS, F>(WaitConfig::new(timeout), condition)
}

/// Blocks until `condition` returns true, checking at the configured
/// interval. Fails with [`WaitError::Timeout`] once the timeout has passed.
pub fn wait_until_with<CS, F>(config: WaitConfig, mut condition: F) -> Result<(), WaitError>
where
    CS: ThreadFunctions + TimeFunctions,
    F: FnMut() -> bool,
{
    try_wait_until_with::<CS, _, Infallible>(config, move || Ok(condition()))
}

/// Blocks until `condition` returns `Ok(true)`, checking every
/// [`DEFAULT_STEP`].
///
/// Equivalent to [`try_wait_until_with`] with a default [`WaitConfig`].
pub fn try_wait_until<CS, F, E>(timeout: Duration, condition: F) -> Result<(), WaitError<E>>
where
    CS: ThreadFunctions + TimeFunctions,
    F: FnMut() -> Result<bool, E>,
{
    try_wait_until_with::<CS, F, E>(WaitConfig::new(timeout), condition)
}

/// Blocks until `condition` returns `Ok(true)`, checking at the configured
/// interval.
///
/// The condition is evaluated at least once for any valid configuration. An
/// `Err` from the condition aborts the wait immediately and is returned
/// wrapped in [`WaitError::Condition`] with the cause preserved. If the
/// condition keeps returning `Ok(false)` until the timeout has passed, the
/// wait fails with [`WaitError::Timeout`] after having blocked for at least
/// the timeout (the last sleep may overshoot it slightly).
///
/// There is no cancellation. A caller that needs to abandon a wait early
/// should run it on a thread it is willing to give up on, or fold its own
/// stop signal into the condition.
pub fn try_wait_until_with<CS, F, E>(
    config: WaitConfig,
    mut condition: F,
) -> Result<(), WaitError<E>>
where
    CS: ThreadFunctions + TimeFunctions,
    F: FnMut() -> Result<bool, E>,
{
    if config.timeout.is_zero() || config.step.is_zero() || config.step > config.timeout {
        return Err(WaitError::InvalidConfig {
            timeout: config.timeout,
            step: config.step,
        });
    }
    let deadline = CS::current_time() + config.timeout;
    loop {
        if condition().map_err(WaitError::Condition)? {
            return Ok(());
        }
        if deadline <= CS::current_time() {
            break;
        }
        log::trace!("condition not satisfied, sleeping for {:?}", config.step);
        CS::sleep(config.step);
    }
    let message = config
        .message
        .unwrap_or_else(|| String::from(DEFAULT_FAILURE_MESSAGE));
    log::debug!("wait timed out after {:?}: {}", config.timeout, message);
    Err(WaitError::Timeout(message))
}
