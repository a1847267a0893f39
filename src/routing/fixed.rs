//! Scripted routing engine for tests and offline demos
//!
//! Returns queued outcomes in order, then falls back to a default outcome.
//! Every request is recorded so callers can assert on what was asked.

use crate::error::{NavError, Result};
use crate::routing::{RawRoute, RoutingEngine};
use crate::types::Coordinate;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// What the engine answers to one request
#[derive(Debug, Clone)]
pub enum EngineOutcome {
    Route(RawRoute),
    NoRoute,
    Timeout,
    Unavailable,
}

impl EngineOutcome {
    fn into_result(self, timeout_ms: u64) -> Result<RawRoute> {
        match self {
            EngineOutcome::Route(route) => Ok(route),
            EngineOutcome::NoRoute => Err(NavError::RouteNotFound("경로를 찾을 수 없습니다".into())),
            EngineOutcome::Timeout => Err(NavError::RoutingEngineTimeout { timeout_ms }),
            EngineOutcome::Unavailable => {
                Err(NavError::RoutingEngineUnavailable("fixed engine offline".into()))
            }
        }
    }
}

/// Reported by `EngineOutcome::Timeout` unless overridden
const DEFAULT_TIMEOUT_MS: u64 = 5000;

#[derive(Default)]
struct FixedState {
    queued: VecDeque<EngineOutcome>,
    calls: Vec<(Coordinate, Coordinate)>,
}

/// In-process routing engine with scripted answers
pub struct FixedEngine {
    fallback: EngineOutcome,
    timeout_ms: u64,
    state: Mutex<FixedState>,
}

impl FixedEngine {
    /// Engine that always answers with `route`
    pub fn new(route: RawRoute) -> Self {
        Self::with_fallback(EngineOutcome::Route(route))
    }

    /// Engine that answers with `fallback` once the queue is empty
    pub fn with_fallback(fallback: EngineOutcome) -> Self {
        Self {
            fallback,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            state: Mutex::new(FixedState::default()),
        }
    }

    /// Timeout reported by scripted `Timeout` outcomes
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Queue a one-off outcome for the next request
    pub fn push(&self, outcome: EngineOutcome) -> Result<()> {
        self.lock_state()?.queued.push_back(outcome);
        Ok(())
    }

    /// Requests received so far, as (origin, destination)
    pub fn calls(&self) -> Result<Vec<(Coordinate, Coordinate)>> {
        Ok(self.lock_state()?.calls.clone())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, FixedState>> {
        self.state.lock().map_err(|e| {
            NavError::RoutingEngineUnavailable(format!("Failed to acquire engine lock: {}", e))
        })
    }
}

#[async_trait]
impl RoutingEngine for FixedEngine {
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RawRoute> {
        let outcome = {
            let mut state = self.lock_state()?;
            state.calls.push((origin, destination));
            state.queued.pop_front().unwrap_or_else(|| self.fallback.clone())
        };
        outcome.into_result(self.timeout_ms)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
