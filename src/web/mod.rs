//! Web integration surface.
//!
//! The boundary between an HTTP framework and the session guard. A request
//! flows through it in a fixed order:
//!
//! ```text
//! framework request
//!   -> RequestAdapter (cookies and params, all Tainted)
//!   -> RequestAdapter::resolve (credential -> principal, once)
//!   -> AssetHandler::handle (SessionGuard::check, then the action)
//!   -> Response (halts map straight onto it)
//! ```
//!
//! Nothing here depends on a particular framework and there is no global
//! state; every collaborator is passed in explicitly.

mod adapter;
pub mod assets;
mod extract;
mod response;
pub mod sessions;

pub use adapter::RequestAdapter;
pub use assets::{AssetAction, AssetHandler};
pub use extract::{ExtractCredential, ExtractParams};
pub use response::{Body, FormView, Response};
pub use sessions::SessionHandler;
