use std::fmt;

use crate::request::RequestContext;

/// Request-scoped logger.
///
/// Every line carries the request id and, once resolved, the principal id.
/// Borrowed from the [`RequestContext`], so it cannot outlive the request.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog<'a> {
    request_id: &'a str,
    principal_id: Option<&'a str>,
}

impl<'a> RequestLog<'a> {
    /// Creates a logger for `ctx`.
    pub fn new(ctx: &'a RequestContext) -> Self {
        Self {
            request_id: ctx.request_id(),
            principal_id: ctx.principal().map(|p| p.id.as_str()),
        }
    }

    /// Returns the request id.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Logs at info level.
    ///
    /// ```no_run
    /// # use asset_guard::{RequestContext, RequestLog};
    /// let ctx = RequestContext::new("req-1");
    /// RequestLog::new(&ctx).info(format_args!("listing page {}", 2));
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(request_id = %self.request_id, principal = ?self.principal_id, "{}", args);
    }

    /// Logs at warn level.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, principal = ?self.principal_id, "{}", args);
    }

    /// Logs at debug level.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, principal = ?self.principal_id, "{}", args);
    }
}
