//! Authentication module for managing the user session and credentials.
//!
//! This module provides:
//! - `Session`, `SessionState`: the shared session state machine
//! - `SessionManager`: login/register/logout/restore orchestration
//! - `SessionStore`: durable session file under the cache directory
//! - `CredentialStore`: secure OS-level password storage via keyring
//!
//! Token validity is server-enforced; the client reacts to rejection rather
//! than running its own expiry clock.

pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::CredentialStore;
pub use session::{Session, SessionManager, SessionState};
pub use store::{PersistedSession, SessionStore};
