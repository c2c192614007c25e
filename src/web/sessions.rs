//! Sign-in and sign-out handlers.

use crate::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditTrail};
use crate::config::GuardConfig;
use crate::logging::RequestLog;
use crate::request::RequestContext;
use crate::resolver::UserDirectory;
use crate::sanitizer::{Sanitizer, TextSanitizer};
use crate::session::{sign_in, sign_out, SessionSigner};
use crate::Tainted;

use super::Response;

/// Where a successful sign-in lands.
pub const AFTER_SIGN_IN_PATH: &str = "/assets";
/// Notice after a successful sign-in.
pub const SIGNED_IN_NOTICE: &str = "Signed in!";
/// Notice after signing out.
pub const SIGNED_OUT_NOTICE: &str = "Signed out!";
/// Notice when no user matches.
pub const SIGN_IN_FAILED_NOTICE: &str = "Sign in failed.";

/// Issues and clears remember-token cookies.
///
/// Sign-in and sign-out are public: neither passes through the guard.
#[derive(Debug)]
pub struct SessionHandler<'a> {
    signer: &'a SessionSigner,
    users: &'a UserDirectory,
    config: &'a GuardConfig,
    audit: &'a AuditTrail,
}

impl<'a> SessionHandler<'a> {
    /// Creates a handler over the given collaborators.
    pub fn new(
        signer: &'a SessionSigner,
        users: &'a UserDirectory,
        config: &'a GuardConfig,
        audit: &'a AuditTrail,
    ) -> Self {
        Self {
            signer,
            users,
            config,
            audit,
        }
    }

    /// Signs in the user registered under `email`.
    ///
    /// On success the response carries a permanent remember-token cookie and
    /// redirects to the asset list. An unknown email redirects back to the
    /// sign-in page without a cookie.
    pub fn create(&self, ctx: &RequestContext, email: Tainted<String>) -> Response {
        let log = RequestLog::new(ctx);
        let user = TextSanitizer::new(254)
            .sanitize(email)
            .ok()
            .and_then(|email| self.users.find_by_email(email.as_ref()));

        let Some(user) = user else {
            log.info(format_args!("sign-in rejected"));
            self.audit.record(AuditEvent::new(
                ctx.request_id(),
                None::<String>,
                AuditEventKind::SignIn,
                AuditOutcome::Rejected,
            ));
            return Response::redirect(self.config.sign_in_path.clone()).with_notice(SIGN_IN_FAILED_NOTICE);
        };

        self.audit.record(
            AuditEvent::new(
                ctx.request_id(),
                Some(user.id.to_string()),
                AuditEventKind::SignIn,
                AuditOutcome::Success,
            )
            .with_resource_id(user.id.to_string()),
        );
        Response::redirect(AFTER_SIGN_IN_PATH)
            .with_notice(SIGNED_IN_NOTICE)
            .with_cookie(sign_in(self.signer, user, self.config))
    }

    /// Signs the browser out by removing the remember-token cookie, then
    /// sends it back to the sign-in page.
    pub fn destroy(&self, ctx: &RequestContext) -> Response {
        RequestLog::new(ctx).info(format_args!("signing out"));
        self.audit.record(AuditEvent::new(
            ctx.request_id(),
            ctx.principal().map(|p| p.id.clone()),
            AuditEventKind::SignOut,
            AuditOutcome::Success,
        ));
        Response::redirect(self.config.sign_in_path.clone())
            .with_notice(SIGNED_OUT_NOTICE)
            .with_cookie(sign_out(self.config))
    }
}
