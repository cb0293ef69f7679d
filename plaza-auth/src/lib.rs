//! plaza-auth: the authentication and session subsystem for Plaza.
//!
//! [`service::AuthService`] is the entry point; it composes the password
//! verifier, token issuer, session store and user store into the login,
//! logout, refresh, registration, change-password and provisioning flows.

pub mod password;
pub mod service;
pub mod session;
pub mod token;
pub mod user;

pub use service::{AuthService, AuthenticatedUser};
pub use session::{Session, SessionStore};
pub use token::{strip_bearer, AccessClaims, IssuedToken, TokenIssuer};
pub use user::{User, UserMapper, UserStore};
