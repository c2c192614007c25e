use std::fmt;

use crate::config::GuardConfig;
use crate::request::RequestContext;

/// An HTTP status code carried by a halted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK
    pub const OK: StatusCode = StatusCode(200);
    /// 302 Found
    pub const FOUND: StatusCode = StatusCode(302);
    /// 401 Unauthorized
    pub const UNAUTHORIZED: StatusCode = StatusCode(401);
    /// 404 Not Found
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    /// 422 Unprocessable Entity
    pub const UNPROCESSABLE: StatusCode = StatusCode(422);

    /// Returns the numeric code.
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns true for 3xx codes.
    pub fn is_redirection(self) -> bool {
        (300..400).contains(&self.0)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a protected action responds to an unauthenticated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPolicy {
    /// Bare 401, no redirect, no message. For programmatic clients.
    RejectSilently,
    /// Redirect to the sign-in page with a notice. For browsers.
    RedirectToSignIn,
}

impl fmt::Display for GuardPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardPolicy::RejectSilently => write!(f, "reject_silently"),
            GuardPolicy::RedirectToSignIn => write!(f, "redirect_to_sign_in"),
        }
    }
}

/// The response a halted request must produce instead of running its handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halt {
    /// Status to emit
    pub status: StatusCode,
    /// Redirect target, if any
    pub redirect_to: Option<String>,
    /// User-facing notice, if any
    pub notice: Option<String>,
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardResult {
    /// The request may proceed into its handler.
    Continue,
    /// The request must stop with the given response.
    Halt(Halt),
}

impl GuardResult {
    /// Returns true for [`GuardResult::Continue`].
    pub fn is_continue(&self) -> bool {
        matches!(self, GuardResult::Continue)
    }

    /// Returns the halt details, if halted.
    pub fn halt(&self) -> Option<&Halt> {
        match self {
            GuardResult::Continue => None,
            GuardResult::Halt(h) => Some(h),
        }
    }
}

/// The access-control checkpoint in front of every protected action.
///
/// The guard only reads already-resolved state. It never resolves
/// credentials, never mutates the context, and reports "not signed in" as a
/// [`GuardResult::Halt`] rather than an error. The caller is responsible for
/// actually short-circuiting on a halt.
///
/// # Examples
///
/// ```
/// use asset_guard::{GuardResult, RequestContext, SessionGuard, StatusCode};
///
/// let guard = SessionGuard::default();
/// let ctx = RequestContext::new("req-1");
///
/// match guard.require_authenticated(&ctx) {
///     GuardResult::Halt(halt) => {
///         assert_eq!(halt.status, StatusCode::UNAUTHORIZED);
///         assert!(halt.redirect_to.is_none());
///     }
///     GuardResult::Continue => unreachable!("anonymous request"),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionGuard {
    config: GuardConfig,
}

impl SessionGuard {
    /// Creates a guard using the sign-in path and notice from `config`.
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// Returns the guard's configuration.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Returns true iff the context carries a resolved principal.
    pub fn is_authenticated(&self, ctx: &RequestContext) -> bool {
        ctx.principal().is_some()
    }

    /// Halts with a bare 401 unless the request is authenticated.
    pub fn require_authenticated(&self, ctx: &RequestContext) -> GuardResult {
        let result = if self.is_authenticated(ctx) {
            GuardResult::Continue
        } else {
            GuardResult::Halt(Halt {
                status: StatusCode::UNAUTHORIZED,
                redirect_to: None,
                notice: None,
            })
        };
        trace_decision(ctx, GuardPolicy::RejectSilently, &result);
        result
    }

    /// Redirects to the sign-in page with a notice unless the request is
    /// authenticated.
    pub fn enforce_authenticated(&self, ctx: &RequestContext) -> GuardResult {
        let result = if self.is_authenticated(ctx) {
            GuardResult::Continue
        } else {
            GuardResult::Halt(Halt {
                status: StatusCode::FOUND,
                redirect_to: Some(self.config.sign_in_path.clone()),
                notice: Some(self.config.notice.clone()),
            })
        };
        trace_decision(ctx, GuardPolicy::RedirectToSignIn, &result);
        result
    }

    /// Applies the named operation matching `policy`.
    pub fn check(&self, policy: GuardPolicy, ctx: &RequestContext) -> GuardResult {
        match policy {
            GuardPolicy::RejectSilently => self.require_authenticated(ctx),
            GuardPolicy::RedirectToSignIn => self.enforce_authenticated(ctx),
        }
    }
}

fn trace_decision(ctx: &RequestContext, policy: GuardPolicy, result: &GuardResult) {
    match result {
        GuardResult::Continue => {
            tracing::debug!(request_id = %ctx.request_id(), %policy, "guard: continue");
        }
        GuardResult::Halt(halt) => {
            tracing::info!(
                request_id = %ctx.request_id(),
                %policy,
                status = %halt.status,
                "guard: halted unauthenticated request"
            );
        }
    }
}
