//! Shared rate budget for page fetches
//!
//! The provider enforces a rolling ceiling on API calls per window across the
//! whole process, not per account. Every harvest task reserves its page quota
//! here before fetching. The lock is held only for the counter update, never
//! across a sleep or a network call.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::warn;

/// Provider ceiling: calls allowed per rolling window.
pub const WINDOW_CEILING: u32 = 900;

/// Length of the provider's rolling window.
pub const WINDOW_LENGTH: Duration = Duration::from_secs(15 * 60);

#[derive(Debug)]
struct BudgetState {
    /// Pages reserved since the process started. Never resets.
    total: u64,
    /// Pages reserved in the current window.
    in_window: u32,
    /// Highest window fill observed so far.
    window_peak: u32,
    window_started: Instant,
}

/// Process-wide page-fetch budget, shared by all concurrent harvest tasks.
#[derive(Debug)]
pub struct RateBudget {
    state: Mutex<BudgetState>,
    ceiling: u32,
    window: Duration,
}

impl RateBudget {
    /// Budget matching the provider's documented limits.
    pub fn new() -> Self {
        Self::with_limits(WINDOW_CEILING, WINDOW_LENGTH)
    }

    /// Budget with custom limits, for tests and alternative providers.
    pub fn with_limits(ceiling: u32, window: Duration) -> Self {
        Self {
            state: Mutex::new(BudgetState {
                total: 0,
                in_window: 0,
                window_peak: 0,
                window_started: Instant::now(),
            }),
            ceiling,
            window,
        }
    }

    /// Reserve quota for `pages` upcoming calls.
    ///
    /// If the reservation would push the current window past the ceiling,
    /// the caller sleeps until the window resets and tries again. Only the
    /// reserving task waits; other accounts keep running. A reservation
    /// larger than the ceiling is admitted into an empty window so it can
    /// never deadlock.
    pub async fn reserve(&self, pages: u32) {
        if pages == 0 {
            return;
        }
        loop {
            let wait = {
                let mut state = self.state.lock().unwrap();
                let now = Instant::now();
                if now.duration_since(state.window_started) >= self.window {
                    state.in_window = 0;
                    state.window_started = now;
                }
                if state.in_window == 0 || state.in_window.saturating_add(pages) <= self.ceiling {
                    state.total += u64::from(pages);
                    state.in_window = state.in_window.saturating_add(pages);
                    if state.in_window > state.window_peak {
                        state.window_peak = state.in_window;
                    }
                    None
                } else {
                    Some(self.window - now.duration_since(state.window_started))
                }
            };
            match wait {
                None => return,
                Some(remaining) => {
                    warn!(
                        pages,
                        wait_ms = remaining.as_millis() as u64,
                        "rate window full, waiting for reset"
                    );
                    sleep(remaining).await;
                }
            }
        }
    }

    /// Pages reserved since the process started.
    pub fn total(&self) -> u64 {
        self.state.lock().unwrap().total
    }

    /// Highest window fill observed so far.
    pub fn window_peak(&self) -> u32 {
        self.state.lock().unwrap().window_peak
    }
}

impl Default for RateBudget {
    fn default() -> Self {
        Self::new()
    }
}
