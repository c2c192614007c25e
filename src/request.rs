use crate::error::Error;
use crate::resolver::PrincipalResolver;
use crate::sanitizer::{CredentialSanitizer, Sanitizer};
use crate::Tainted;

/// An authenticated user acting on a request.
///
/// Only a [`PrincipalResolver`] produces principals that end up attached to a
/// [`RequestContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Unique identifier for this principal
    pub id: String,
    /// Display name
    pub name: String,
}

/// Per-request state consulted by the session guard.
///
/// A context starts out anonymous, optionally carrying the raw credential
/// lifted from the request. [`resolve`](Self::resolve) consumes it and returns
/// a context whose principal is whatever the resolver answered. There is no
/// setter for the principal, so a context can never claim an identity that
/// was not positively resolved.
///
/// # Examples
///
/// ```
/// use asset_guard::RequestContext;
///
/// let ctx = RequestContext::new("req-1");
/// assert!(ctx.principal().is_none());
/// assert!(!ctx.has_credential());
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    credential: Option<Tainted<String>>,
    principal: Option<Principal>,
    resolved: bool,
}

impl RequestContext {
    /// Creates an anonymous context without a credential.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            credential: None,
            principal: None,
            resolved: false,
        }
    }

    /// Creates an anonymous context carrying a raw, unverified credential.
    pub fn with_credential(request_id: impl Into<String>, credential: Tainted<String>) -> Self {
        Self {
            credential: Some(credential),
            ..Self::new(request_id)
        }
    }

    /// Returns the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the resolved principal, if any.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Returns true if the request carried a credential.
    ///
    /// This says nothing about authentication.
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Returns true once [`resolve`](Self::resolve) has run.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Returns true if `principal` is the principal acting on this request.
    pub fn is_current(&self, principal: &Principal) -> bool {
        self.principal.as_ref() == Some(principal)
    }

    /// Resolves the carried credential into a principal.
    ///
    /// A missing or malformed credential yields an anonymous, resolved context
    /// without consulting the resolver. Anything the resolver returns is taken
    /// as-is.
    ///
    /// # Errors
    ///
    /// Returns `Error::Resolve` when the resolver itself fails. The error is
    /// passed through untouched.
    pub fn resolve<R>(self, resolver: &R) -> Result<Self, Error>
    where
        R: PrincipalResolver + ?Sized,
    {
        let Some(raw) = self.credential.clone() else {
            return Ok(self.into_resolved(None));
        };

        let verified = match CredentialSanitizer::default().sanitize(raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(request_id = %self.request_id, error = %e, "rejected malformed credential");
                return Ok(self.into_resolved(None));
            }
        };

        let principal = {
            let _span = tracing::debug_span!("resolve", request_id = %self.request_id).entered();
            resolver.resolve(&verified)?
        };
        if principal.is_none() {
            tracing::debug!(request_id = %self.request_id, "credential did not resolve to a principal");
        }
        Ok(self.into_resolved(principal))
    }

    fn into_resolved(self, principal: Option<Principal>) -> Self {
        Self {
            principal,
            resolved: true,
            ..self
        }
    }
}
