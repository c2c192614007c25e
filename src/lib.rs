//! Session guard and asset inventory handlers.
//!
//! Every protected action passes through a [`SessionGuard`] that reads an
//! already-resolved [`RequestContext`] and either lets the request continue
//! or halts it with a ready-made response:
//!
//! - **Explicit resolution**: a credential becomes a [`Principal`] only through
//!   a [`PrincipalResolver`], once per request, before the guard runs
//! - **Two failure policies**: [`GuardPolicy::RejectSilently`] answers 401,
//!   [`GuardPolicy::RedirectToSignIn`] sends browsers to the sign-in page
//! - **Taint at the boundary**: cookies and form fields arrive as
//!   [`Tainted`] and must pass a [`Sanitizer`] before use
//!
//! # Core Types
//!
//! - [`SessionGuard`]: the access-control checkpoint
//! - [`RequestContext`]: per-request state with the resolved principal
//! - [`SessionSigner`]: issues and verifies remember tokens
//! - [`Secret<T>`]: redacts sensitive values in logs and output
//! - [`web::AssetHandler`]: asset actions behind the guard
//!
//! # Examples
//!
//! ```
//! use asset_guard::{
//!     GuardResult, RememberTokenResolver, RequestContext, SessionGuard, SessionSigner, Tainted,
//!     UserDirectory,
//! };
//!
//! let signer = SessionSigner::generate();
//! let mut users = UserDirectory::new();
//! let id = users.add("dude", "mctalis", "dude@example.com");
//! let token = signer.issue(id);
//!
//! let resolver = RememberTokenResolver::new(&signer, &users);
//! let ctx = RequestContext::with_credential("req-1", Tainted::new(token.expose_secret().clone()))
//!     .resolve(&resolver)
//!     .expect("directory available");
//!
//! let guard = SessionGuard::default();
//! assert_eq!(guard.enforce_authenticated(&ctx), GuardResult::Continue);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assets;
pub mod audit;
mod config;
mod error;
mod guard;
mod logging;
mod request;
mod resolver;
mod sanitizer;
mod secret;
mod session;
mod tainted;
mod verified;
pub mod web;

pub use config::{GuardConfig, SIGN_IN_NOTICE};
pub use error::Error;
pub use guard::{GuardPolicy, GuardResult, Halt, SessionGuard, StatusCode};
pub use logging::RequestLog;
pub use request::{Principal, RequestContext};
pub use resolver::{PrincipalResolver, RememberTokenResolver, ResolveError, User, UserDirectory, UserId};
pub use sanitizer::{
    CredentialSanitizer, Ipv4Sanitizer, MacAddressSanitizer, SanitizationError, SanitizationErrorKind,
    Sanitizer, SerialNumberSanitizer, TextSanitizer,
};
pub use secret::Secret;
pub use session::{sign_in, sign_out, CookieExpiry, SessionSigner, SetCookie};
pub use tainted::Tainted;
pub use verified::Verified;
