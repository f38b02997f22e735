//! `panelkit-auth` — token/session management over the identity store.
//!
//! This crate owns the signed access/refresh token protocol and the
//! self-healing session refresh path. It is transport-agnostic: cookie
//! plumbing lives in the API crate, persistence behind [`IdentityStore`].

pub mod config;
pub mod password;
pub mod session;
pub mod store;
pub mod token;

pub use config::AuthConfig;
pub use password::{hash_password, verify_password};
pub use session::{AuthSession, LoginError, LoginSession, SessionError, SessionManager, TokenPair};
pub use store::{IdentityStore, InMemoryIdentityStore, LoginRecord, StoreError, UserSeed};
pub use token::{Claims, TokenError, TokenService};
