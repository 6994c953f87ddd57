use std::time::Duration;

/// How long a single logical call may take.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimeoutPolicy {
    /// One attempt that must finish within the given duration. Any failure,
    /// including `404 Not Found`, is returned immediately.
    Bounded(Duration),
    /// Retry until success or cancellation.
    ///
    /// Every attempt is capped at [`ClientOptions::unbounded_attempt_timeout_ms`]
    /// and failed attempts are followed by a fixed
    /// [`ClientOptions::retry_delay_ms`] pause. Transport errors and every
    /// non-2xx status (including 404, for resources that are not visible yet)
    /// are retried. **A call in this mode can block forever**: the only exits
    /// are success, a malformed success body, or firing the client's
    /// cancellation token.
    Unbounded,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self::Bounded(Duration::from_secs(60))
    }
}

/// Configures timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Policy applied to every call made through the client.
    pub timeout: TimeoutPolicy,
    /// Per-attempt timeout in milliseconds while in [`TimeoutPolicy::Unbounded`].
    pub unbounded_attempt_timeout_ms: u64,
    /// Fixed delay between unbounded attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: TimeoutPolicy::default(),
            unbounded_attempt_timeout_ms: 60_000,
            retry_delay_ms: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ClientOptions, TimeoutPolicy};

    #[test]
    fn defaults_are_bounded_sixty_seconds() {
        let opts = ClientOptions::default();
        assert_eq!(opts.timeout, TimeoutPolicy::Bounded(Duration::from_secs(60)));
        assert_eq!(opts.unbounded_attempt_timeout_ms, 60_000);
        assert_eq!(opts.retry_delay_ms, 1_000);
    }
}
