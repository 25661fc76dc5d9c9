//! REST API client module for the Dominion backend.
//!
//! This module provides the `ApiClient` for talking to the fitness API:
//! auth, the exercise and mobility catalogs, progress logging, workouts,
//! communities, the leaderboard, and the shop.
//!
//! The API uses bearer token authentication; tokens come from the login and
//! registration endpoints and are attached from the shared session at
//! request dispatch.

pub mod client;
pub mod error;

pub use client::{ApiClient, AuthSuccess};
pub use error::ApiError;
