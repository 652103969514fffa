// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Deadline-bounded polling.
//!
//! [`wait`] is the only place the engine suspends. Everything above it threads a [`Deadline`]
//! down and derives sub-budgets from [`Deadline::remaining`], so nested operations never outlive
//! the caller's allowance.

use std::convert::Infallible;
use std::time::Duration;

use tokio::time::{sleep, Instant};

/// Default polling interval for [`wait`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(20);

// Used when a budget is too large to represent as an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// An absolute point in time after which an operation gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        let now = Instant::now();
        let at = now
            .checked_add(budget)
            .unwrap_or_else(|| now + FAR_FUTURE);
        Self { at }
    }

    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    /// An already-expired deadline.
    pub fn now() -> Self {
        Self { at: Instant::now() }
    }

    pub fn instant(&self) -> Instant {
        self.at
    }

    /// `max(deadline - now, 0)`.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// The earlier of `self` and `now + cap`.
    pub fn capped(self, cap: Duration) -> Self {
        self.min(Self::after(cap))
    }
}

/// Polls `predicate` every [`POLL_INTERVAL`] until it holds or `deadline` passes.
///
/// The predicate is evaluated at least once, even for an expired deadline. Returns `Ok(false)`
/// on timeout; a predicate error aborts the wait and is returned as-is.
pub async fn wait<F, E>(deadline: Deadline, predicate: F) -> Result<bool, E>
where
    F: FnMut() -> Result<bool, E>,
{
    wait_every(deadline, POLL_INTERVAL, predicate).await
}

/// [`wait`] with an explicit polling interval.
pub async fn wait_every<F, E>(
    deadline: Deadline,
    interval: Duration,
    mut predicate: F,
) -> Result<bool, E>
where
    F: FnMut() -> Result<bool, E>,
{
    loop {
        if predicate()? {
            return Ok(true);
        }
        let remaining = deadline.remaining();
        if remaining.is_zero() {
            return Ok(false);
        }
        sleep(interval.min(remaining)).await;
    }
}

/// Suspends for `duration`; expressed as a wait on a predicate that never holds.
pub async fn pause(duration: Duration) {
    let _ = wait::<_, Infallible>(Deadline::after(duration), || Ok(false)).await;
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use rstest::rstest;
    use tokio::time::Instant;

    use super::{pause, wait, wait_every, Deadline, POLL_INTERVAL};

    #[tokio::test(start_paused = true)]
    async fn expired_deadline_with_false_predicate_returns_false_immediately() {
        let started = Instant::now();
        let calls = Cell::new(0);
        let result = wait::<_, ()>(Deadline::after(Duration::ZERO), || {
            calls.set(calls.get() + 1);
            Ok(false)
        })
        .await;
        assert_eq!(result, Ok(false));
        assert_eq!(calls.get(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn true_predicate_returns_without_consuming_budget() {
        let started = Instant::now();
        let result = wait::<_, ()>(Deadline::after(Duration::from_secs(5)), || Ok(true)).await;
        assert_eq!(result, Ok(true));
        assert!(started.elapsed() < POLL_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_never_overshoots_deadline() {
        let budget = Duration::from_millis(250);
        let started = Instant::now();
        let result = wait::<_, ()>(Deadline::after(budget), || Ok(false)).await;
        assert_eq!(result, Ok(false));
        let elapsed = started.elapsed();
        assert!(elapsed >= budget && elapsed <= budget + Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn predicate_error_aborts_early() {
        let started = Instant::now();
        let calls = Cell::new(0);
        let result = wait(Deadline::after(Duration::from_secs(1)), || {
            calls.set(calls.get() + 1);
            if calls.get() == 3 {
                Err("stale")
            } else {
                Ok(false)
            }
        })
        .await;
        assert_eq!(result, Err("stale"));
        assert!(started.elapsed() >= POLL_INTERVAL * 2);
        assert!(started.elapsed() < POLL_INTERVAL * 3);
    }

    #[rstest]
    #[case(Duration::from_millis(5))]
    #[case(Duration::from_millis(50))]
    #[tokio::test(start_paused = true)]
    async fn eventually_true_predicate_is_observed(#[case] interval: Duration) {
        let calls = Cell::new(0);
        let result = wait_every::<_, ()>(Deadline::after(Duration::from_secs(1)), interval, || {
            calls.set(calls.get() + 1);
            Ok(calls.get() >= 4)
        })
        .await;
        assert_eq!(result, Ok(true));
        assert_eq!(calls.get(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn remaining_saturates_and_capped_picks_earlier() {
        let deadline = Deadline::after(Duration::from_millis(100));
        assert_eq!(deadline.capped(Duration::from_secs(2)), deadline);
        assert!(deadline.capped(Duration::from_millis(10)) < deadline);

        pause(Duration::from_millis(150)).await;
        assert_eq!(deadline.remaining(), Duration::ZERO);
        assert!(deadline.is_expired());
    }
}
