//! Retry decisions for the two timeout modes.

use std::time::Duration;

use crate::{classify::AttemptFailure, ClientOptions, TimeoutPolicy};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RetryDecision {
    /// Return the failure to the caller.
    Stop,
    /// Wait for the delay, then issue another attempt.
    RetryAfter(Duration),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct RetryPolicy {
    timeout: TimeoutPolicy,
    unbounded_attempt_timeout: Duration,
    retry_delay: Duration,
}

impl RetryPolicy {
    pub(crate) fn new(options: &ClientOptions) -> Self {
        Self {
            timeout: options.timeout,
            unbounded_attempt_timeout: Duration::from_millis(options.unbounded_attempt_timeout_ms),
            retry_delay: Duration::from_millis(options.retry_delay_ms),
        }
    }

    /// Deadline for a single attempt.
    pub(crate) fn attempt_timeout(&self) -> Duration {
        match self.timeout {
            TimeoutPolicy::Bounded(limit) => limit,
            TimeoutPolicy::Unbounded => self.unbounded_attempt_timeout,
        }
    }

    pub(crate) fn decide(&self, failure: &AttemptFailure) -> RetryDecision {
        match self.timeout {
            TimeoutPolicy::Bounded(_) => RetryDecision::Stop,
            TimeoutPolicy::Unbounded => match failure {
                // Retrying cannot fix a malformed payload.
                AttemptFailure::Decode(_) => RetryDecision::Stop,
                AttemptFailure::Transport(_)
                | AttemptFailure::NotFound { .. }
                | AttemptFailure::Status { .. } => RetryDecision::RetryAfter(self.retry_delay),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{RetryDecision, RetryPolicy};
    use crate::{classify::AttemptFailure, ClientOptions, TimeoutPolicy};

    fn policy(timeout: TimeoutPolicy) -> RetryPolicy {
        RetryPolicy::new(&ClientOptions {
            timeout,
            unbounded_attempt_timeout_ms: 5_000,
            retry_delay_ms: 250,
        })
    }

    fn transport_failure() -> AttemptFailure {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .expect_err("invalid url must fail to build");
        AttemptFailure::Transport(err)
    }

    fn failures() -> Vec<AttemptFailure> {
        vec![
            transport_failure(),
            AttemptFailure::NotFound {
                message: "not yet".to_owned(),
            },
            AttemptFailure::Status {
                status: 503,
                message: "unavailable".to_owned(),
            },
            AttemptFailure::Decode("bad json".to_owned()),
        ]
    }

    #[test]
    fn bounded_mode_never_retries() {
        let policy = policy(TimeoutPolicy::Bounded(Duration::from_secs(3)));
        for failure in failures() {
            assert_eq!(policy.decide(&failure), RetryDecision::Stop, "{failure}");
        }
    }

    #[test]
    fn bounded_mode_uses_its_own_deadline_per_attempt() {
        let policy = policy(TimeoutPolicy::Bounded(Duration::from_secs(3)));
        assert_eq!(policy.attempt_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn unbounded_mode_retries_transport_and_status_failures() {
        let policy = policy(TimeoutPolicy::Unbounded);
        let retryable = failures()
            .into_iter()
            .filter(|failure| !matches!(failure, AttemptFailure::Decode(_)));
        for failure in retryable {
            assert_eq!(
                policy.decide(&failure),
                RetryDecision::RetryAfter(Duration::from_millis(250)),
                "{failure}"
            );
        }
    }

    #[test]
    fn unbounded_mode_stops_on_decode_failure() {
        let policy = policy(TimeoutPolicy::Unbounded);
        let failure = AttemptFailure::Decode("bad json".to_owned());
        assert_eq!(policy.decide(&failure), RetryDecision::Stop);
    }

    #[test]
    fn unbounded_mode_caps_each_attempt() {
        let policy = policy(TimeoutPolicy::Unbounded);
        assert_eq!(policy.attempt_timeout(), Duration::from_secs(5));
    }
}
