//! # a3s-nav
//!
//! Pedestrian navigation sessions with accessible, speech-ready
//! turn-by-turn guidance.
//!
//! ## Overview
//!
//! `a3s-nav` turns a street-routing engine's raw output into a stateful
//! navigation session. It owns the session lifecycle (a user has at most
//! one active trip), orchestrates route and reroute requests against a
//! pluggable routing engine, and translates maneuvers into Korean
//! sentences suitable for text-to-speech.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use a3s_nav::{Coordinate, RouteOrchestrator, RouteRequest, UserRecord};
//! use a3s_nav::routing::{RawRoute, RawStep};
//! use a3s_nav::routing::fixed::FixedEngine;
//! use a3s_nav::store::memory::{MemorySessionStore, MemoryUserStore};
//!
//! # async fn example() -> a3s_nav::Result<()> {
//! let users = MemoryUserStore::new();
//! let user_id = uuid::Uuid::new_v4();
//! users.insert(UserRecord::new(user_id)).await;
//!
//! let engine = FixedEngine::new(RawRoute {
//!     distance: 850.0,
//!     duration: 600.0,
//!     steps: vec![RawStep::new("depart", Coordinate::new(37.123, 127.456))],
//! });
//!
//! let nav = RouteOrchestrator::new(
//!     engine,
//!     Arc::new(users),
//!     Arc::new(MemorySessionStore::new()),
//! );
//!
//! let route = nav
//!     .calculate_route(
//!         user_id,
//!         RouteRequest::new(Coordinate::new(37.123, 127.456), Coordinate::new(37.130, 127.460)),
//!     )
//!     .await?;
//!
//! println!("{}", route.instructions[0].text);
//! # Ok(())
//! # }
//! ```
//!
//! ## Routing engines
//!
//! - **osrm** — HTTP client for an OSRM route service
//! - **fixed** — scripted in-process engine for testing and offline use
//!
//! ## Architecture
//!
//! - **RoutingEngine** trait — external path finder abstraction
//! - **SessionStore** / **UserStore** traits — consumed storage
//! - **SessionManager** — lifecycle transitions and per-user serialization
//! - **RouteOrchestrator** — `calculate_route`, `reroute`, `update_session_status`
//! - **translator** — maneuver → spoken instruction mapping

pub mod config;
pub mod error;
pub mod manager;
pub mod orchestrator;
pub mod routing;
pub mod session;
pub mod store;
pub mod translator;
pub mod types;

// Re-export core types
pub use config::NavConfig;
pub use error::{ErrorResponse, NavError, Result};
pub use manager::{NewSession, SessionManager, StartedSession};
pub use orchestrator::RouteOrchestrator;
pub use routing::{RawRoute, RawStep, RoutingEngine};
pub use session::{transition, NavigationSession, SessionEvent, SessionStatus};
pub use store::{SessionStore, UserRecord, UserStore};
pub use translator::format_distance;
pub use types::{
    Coordinate, HistoryPage, Instruction, InstructionType, RerouteRequest, RouteRequest,
    RouteResponse, RouteResult, SessionSummary, TurnModifier, Waypoint,
};

// Re-export backends for convenience
pub use routing::fixed::{EngineOutcome, FixedEngine};
pub use routing::osrm::{OsrmClient, OsrmConfig, OsrmEngine};
pub use store::file::FileSessionStore;
pub use store::memory::{MemorySessionStore, MemoryUserStore};
