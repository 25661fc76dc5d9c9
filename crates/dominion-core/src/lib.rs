//! Core library for the Dominion bodyweight-fitness client.
//!
//! This crate holds everything below the presentation layer:
//!
//! - [`api`]: REST client for the Dominion backend, with a central 401
//!   interceptor
//! - [`auth`]: the session state machine, persistence, and the OS keychain
//!   credential store
//! - [`guard`]: the access policy gate in front of protected operations
//! - [`models`]: domain types for accounts, the exercise catalog, training
//!   data, communities, and the shop
//! - [`config`]: client configuration on disk with env overrides
//! - [`service`]: the `Dominion` facade tying the above together

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod service;

pub use api::{ApiClient, ApiError, AuthSuccess};
pub use auth::{CredentialStore, Session, SessionManager, SessionState, SessionStore};
pub use config::Config;
pub use guard::{Access, AccessDenied, AccessGuard, DeniedReason, Operation};
pub use service::Dominion;
