//! # Circuit Breaker Module
//!
//! This module implements the circuit breaker pattern for calls to the
//! spreadsheet. When click-log appends fail repeatedly the breaker opens and
//! further appends are skipped until the reset timeout elapses. After that a
//! single trial append decides whether the breaker closes or opens again.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config::RecoveryConfig;

#[derive(Debug, Default)]
struct BreakerState {
    failure_count: u32,
    last_failure_time: Option<Instant>,
    /// A half-open trial call has been let through and not yet reported
    trial_in_flight: bool,
}

/// Circuit breaker for spreadsheet operations
///
/// # State Machine
///
/// - **Closed**: Normal operation, requests pass through
/// - **Open**: Failure threshold exceeded, requests are skipped
/// - **Half-Open**: Reset timeout elapsed; exactly one trial request is let
///   through. Success closes the breaker, failure reopens it for another
///   full timeout.
///
/// # Configuration
///
/// Uses `RecoveryConfig` for:
/// - `circuit_breaker_threshold`: Failures before opening (default: 5)
/// - `circuit_breaker_reset_secs`: Time before attempting reset (default: 60s)
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    config: RecoveryConfig,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use esim_plans_bot::config::RecoveryConfig;
    /// use esim_plans_bot::circuit_breaker::CircuitBreaker;
    ///
    /// let circuit_breaker = CircuitBreaker::new(RecoveryConfig::default());
    /// assert!(!circuit_breaker.is_open());
    /// ```
    pub fn new(config: RecoveryConfig) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            config,
        }
    }

    /// Check if circuit breaker is open (blocking requests)
    ///
    /// Returns `true` when the failure count has reached the threshold and the
    /// reset time hasn't elapsed. Once it has, the first caller gets `false`
    /// and becomes the half-open trial; later callers keep getting `true`
    /// until that trial reports success or failure.
    pub fn is_open(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.failure_count < self.config.circuit_breaker_threshold {
            return false;
        }

        let reset = Duration::from_secs(self.config.circuit_breaker_reset_secs);
        let cooling_down = state
            .last_failure_time
            .is_some_and(|last_time| last_time.elapsed() < reset);
        if cooling_down || state.trial_in_flight {
            return true;
        }

        state.trial_in_flight = true;
        false
    }

    /// Record a failed call
    pub fn record_failure(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.failure_count += 1;
        state.last_failure_time = Some(Instant::now());
        state.trial_in_flight = false;
    }

    /// Record a successful call, closing the breaker
    pub fn record_success(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = BreakerState::default();
    }

    pub fn failure_count(&self) -> u32 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .failure_count
    }
}
