//! Framework-neutral request adapter.

use std::collections::HashMap;

use crate::config::GuardConfig;
use crate::error::Error;
use crate::request::RequestContext;
use crate::resolver::PrincipalResolver;
use crate::sanitizer::{Sanitizer, TextSanitizer};
use crate::Tainted;

use super::{ExtractCredential, ExtractParams};

/// An incoming request reduced to what the guard and handlers need.
///
/// Framework integrations copy the request id, cookies and submitted
/// parameters in, then run [`resolve`](Self::resolve) once before any guard
/// check. Handlers read the resolved context through
/// [`context`](Self::context).
///
/// # Examples
///
/// ```
/// use asset_guard::web::RequestAdapter;
/// use asset_guard::{GuardConfig, RememberTokenResolver, SessionSigner, UserDirectory};
///
/// let signer = SessionSigner::generate();
/// let users = UserDirectory::new();
/// let resolver = RememberTokenResolver::new(&signer, &users);
///
/// let mut adapter = RequestAdapter::new("req-1");
/// adapter.add_param("page", "2");
/// adapter.resolve(&resolver, &GuardConfig::default()).unwrap();
///
/// assert!(adapter.context().principal().is_none());
/// assert_eq!(adapter.page(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    request_id: String,
    cookies: HashMap<String, String>,
    params: Vec<(String, String)>,
    context: Option<RequestContext>,
}

impl RequestAdapter {
    /// Creates an adapter with no cookies or parameters.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            cookies: HashMap::new(),
            params: Vec::new(),
            context: None,
        }
    }

    /// Adds a request cookie.
    pub fn add_cookie(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Adds a submitted parameter. Later values for the same name win.
    pub fn add_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.push((name.into(), value.into()));
    }

    /// Returns the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the `page` parameter, defaulting to 1 when absent or invalid.
    pub fn page(&self) -> usize {
        self.param("page")
            .and_then(|raw| TextSanitizer::new(10).sanitize(raw).ok())
            .and_then(|v| v.as_ref().parse().ok())
            .filter(|&page| page > 0)
            .unwrap_or(1)
    }

    /// Returns the last value submitted for `name`.
    pub fn param(&self, name: &str) -> Option<Tainted<String>> {
        self.params
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| Tainted::new(v.clone()))
    }

    /// Builds this request's context and resolves its principal.
    ///
    /// Runs once per request, before any guard check. Calling it again
    /// replaces the earlier context.
    ///
    /// # Errors
    ///
    /// Returns `Error::Resolve` when the resolver itself fails; the adapter
    /// is left without a context in that case.
    pub fn resolve<R>(&mut self, resolver: &R, config: &GuardConfig) -> Result<&RequestContext, Error>
    where
        R: PrincipalResolver + ?Sized,
    {
        self.context = None;
        let ctx = match self.extract_credential(&config.cookie_name) {
            Some(token) => RequestContext::with_credential(self.request_id.clone(), token),
            None => RequestContext::new(self.request_id.clone()),
        };
        let ctx: &RequestContext = self.context.insert(ctx.resolve(resolver)?);
        Ok(ctx)
    }

    /// Returns the resolved context.
    ///
    /// # Panics
    ///
    /// Panics if [`resolve`](Self::resolve) has not succeeded on this
    /// request. Guarding a request whose context was never established is a
    /// wiring bug, not an anonymous visitor.
    pub fn context(&self) -> &RequestContext {
        match &self.context {
            Some(ctx) => ctx,
            None => panic!(
                "request {}: no resolved RequestContext; RequestAdapter::resolve must run before the guard",
                self.request_id
            ),
        }
    }
}

impl ExtractCredential for RequestAdapter {
    fn extract_credential(&self, cookie_name: &str) -> Option<Tainted<String>> {
        self.cookies
            .get(cookie_name)
            .map(|value| Tainted::new(value.clone()))
    }
}

impl ExtractParams for RequestAdapter {
    fn extract_params(&self) -> Vec<(String, Tainted<String>)> {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), Tainted::new(v.clone())))
            .collect()
    }
}
