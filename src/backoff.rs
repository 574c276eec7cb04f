use std::time::{Duration, Instant};

/// Jittered exponential backoff between retry attempts.
///
/// The base delay for attempt `n` (0-based) is
/// `min(initial * multiplier^n, max)`, scaled by a random factor in
/// `[1 - jitter, 1 + jitter]`.
///
/// The jittered delay is a deadline measured from when the failed attempt
/// started, not from when it returned. Time already spent inside that attempt
/// (e.g. a slow response that ended in a 429) is subtracted, and the result is
/// clamped at zero, so the next attempt starts roughly `base * factor` after
/// the previous one started instead of stacking the wait on top of it.
#[derive(Clone, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub initial: Duration,
    /// Growth factor per attempt.
    pub multiplier: f64,
    /// Upper bound for the un-jittered delay.
    pub max: Duration,
    /// Relative jitter, `0.23` gives factors in `[0.77, 1.23]`.
    pub jitter: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(1_000),
            multiplier: 1.6,
            max: Duration::from_millis(60_000),
            jitter: 0.23,
        }
    }
}

impl BackoffPolicy {
    /// Un-jittered delay for `attempt`, capped at [`BackoffPolicy::max`].
    pub fn base_delay(&self, attempt: usize) -> Duration {
        let exp = i32::try_from(attempt).unwrap_or(i32::MAX);
        let millis = self.initial.as_secs_f64() * 1_000.0 * self.multiplier.powi(exp);
        let capped = millis.min(self.max.as_secs_f64() * 1_000.0);
        if capped.is_finite() && capped > 0.0 {
            Duration::from_secs_f64(capped / 1_000.0)
        } else {
            Duration::ZERO
        }
    }

    /// Random multiplier in `[1 - jitter, 1 + jitter]`.
    pub fn jitter_factor(&self) -> f64 {
        let jitter = self.jitter.clamp(0.0, 1.0);
        1.0 + jitter * (2.0 * fastrand::f64() - 1.0)
    }

    /// How long to sleep before the attempt after `attempt`, which began at
    /// `started`.
    pub fn delay(&self, attempt: usize, started: Instant) -> Duration {
        self.delay_with(attempt, started.elapsed(), self.jitter_factor())
    }

    fn delay_with(&self, attempt: usize, elapsed: Duration, factor: f64) -> Duration {
        let target = self.base_delay(attempt).mul_f64(factor.max(0.0));
        target.saturating_sub(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::BackoffPolicy;

    #[test]
    fn base_delay_grows_and_caps() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.base_delay(0), Duration::from_millis(1_000));
        assert_eq!(policy.base_delay(1).as_millis(), 1_600);
        assert_eq!(policy.base_delay(2).as_millis(), 2_560);

        let mut previous = Duration::ZERO;
        for attempt in 0..5 {
            let delay = policy.base_delay(attempt);
            assert!(delay >= previous);
            assert!(delay <= Duration::from_millis(60_000));
            previous = delay;
        }

        assert_eq!(policy.base_delay(40), Duration::from_millis(60_000));
        assert_eq!(policy.base_delay(usize::MAX), Duration::from_millis(60_000));
    }

    #[test]
    fn jitter_factor_stays_in_range() {
        let policy = BackoffPolicy::default();
        for _ in 0..1_000 {
            let factor = policy.jitter_factor();
            assert!((0.77..=1.23).contains(&factor), "factor {factor} out of range");
        }
    }

    #[test]
    fn elapsed_time_counts_against_the_wait() {
        let policy = BackoffPolicy::default();
        let delay = policy.delay_with(0, Duration::from_millis(400), 1.0);
        assert_eq!(delay, Duration::from_millis(600));
    }

    #[test]
    fn delay_never_goes_negative() {
        let policy = BackoffPolicy::default();
        let delay = policy.delay_with(0, Duration::from_secs(30), 1.23);
        assert_eq!(delay, Duration::ZERO);

        let delay = policy.delay(2, Instant::now());
        assert!(delay <= Duration::from_millis(3_149));
    }
}
