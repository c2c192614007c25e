//! Asset handlers.
//!
//! Each [`AssetAction`] names its guard policy. [`AssetHandler::handle`]
//! runs the guard first and only reaches the action body on
//! [`GuardResult::Continue`].

use crate::assets::{Asset, AssetForm, AssetId, AssetRegistry, FieldErrors};
use crate::audit::{AuditEvent, AuditEventKind, AuditOutcome, AuditTrail};
use crate::guard::{GuardPolicy, GuardResult, SessionGuard};
use crate::logging::RequestLog;
use crate::request::RequestContext;
use crate::resolver::UserDirectory;

use super::{Body, ExtractParams, FormView, RequestAdapter, Response};

/// Notice after a successful create.
pub const CREATED_NOTICE: &str = "Asset was successfully created.";
/// Notice after a successful update.
pub const UPDATED_NOTICE: &str = "Asset was successfully updated.";

/// A protected asset action.
#[derive(Debug, Clone)]
pub enum AssetAction {
    /// List assets, newest first
    Index {
        /// 1-based page
        page: usize,
    },
    /// Show one asset and its history
    Show {
        /// Asset to show
        id: AssetId,
    },
    /// Blank form
    New,
    /// Prefilled form
    Edit {
        /// Asset to edit
        id: AssetId,
    },
    /// Create from a submitted form
    Create {
        /// Submitted fields
        form: AssetForm,
    },
    /// Update from a submitted form, answering with a redirect
    Update {
        /// Asset to update
        id: AssetId,
        /// Submitted fields
        form: AssetForm,
    },
    /// Update from a programmatic client
    ApiUpdate {
        /// Asset to update
        id: AssetId,
        /// Submitted fields
        form: AssetForm,
    },
    /// List versions across all assets, newest first
    Versions {
        /// 1-based page
        page: usize,
    },
}

impl AssetAction {
    /// Returns the guard policy this action is declared with.
    ///
    /// Browser-facing actions redirect to sign-in; the API update is
    /// silently rejected.
    pub fn policy(&self) -> GuardPolicy {
        match self {
            AssetAction::ApiUpdate { .. } => GuardPolicy::RejectSilently,
            _ => GuardPolicy::RedirectToSignIn,
        }
    }

    /// Returns the `controller#action` name used in logs and audit events.
    pub fn name(&self) -> &'static str {
        match self {
            AssetAction::Index { .. } => "assets#index",
            AssetAction::Show { .. } => "assets#show",
            AssetAction::New => "assets#new",
            AssetAction::Edit { .. } => "assets#edit",
            AssetAction::Create { .. } => "assets#create",
            AssetAction::Update { .. } => "assets#update",
            AssetAction::ApiUpdate { .. } => "api/assets#update",
            AssetAction::Versions { .. } => "assets#versions",
        }
    }

    /// Builds a `Create` action from the submitted parameters.
    pub fn create_from(adapter: &RequestAdapter) -> Self {
        AssetAction::Create {
            form: form_from(adapter),
        }
    }

    /// Builds an `Update` action from the submitted parameters.
    pub fn update_from(id: AssetId, adapter: &RequestAdapter) -> Self {
        AssetAction::Update {
            id,
            form: form_from(adapter),
        }
    }

    /// Builds an `ApiUpdate` action from the submitted parameters.
    pub fn api_update_from(id: AssetId, adapter: &RequestAdapter) -> Self {
        AssetAction::ApiUpdate {
            id,
            form: form_from(adapter),
        }
    }
}

fn form_from(adapter: &RequestAdapter) -> AssetForm {
    let params = adapter.extract_params();
    AssetForm::from_params(params.iter().map(|(k, v)| (k.as_str(), v.clone())))
}

/// Runs asset actions behind the session guard.
#[derive(Debug)]
pub struct AssetHandler<'a> {
    guard: &'a SessionGuard,
    registry: &'a mut AssetRegistry,
    users: &'a UserDirectory,
    audit: &'a AuditTrail,
}

impl<'a> AssetHandler<'a> {
    /// Creates a handler over the given collaborators.
    pub fn new(
        guard: &'a SessionGuard,
        registry: &'a mut AssetRegistry,
        users: &'a UserDirectory,
        audit: &'a AuditTrail,
    ) -> Self {
        Self {
            guard,
            registry,
            users,
            audit,
        }
    }

    /// Guards and runs `action` for the request in `ctx`.
    ///
    /// A halted guard becomes the response as-is and the action body never
    /// runs. Every guard decision is audited.
    pub fn handle(&mut self, ctx: &RequestContext, action: AssetAction) -> Response {
        let name = action.name();
        let decision = self.guard.check(action.policy(), ctx);
        let outcome = match decision {
            GuardResult::Continue => AuditOutcome::Success,
            GuardResult::Halt(_) => AuditOutcome::Halted,
        };
        self.audit.record(
            AuditEvent::new(ctx.request_id(), principal_id(ctx), AuditEventKind::GuardDecision, outcome)
                .with_action(name),
        );
        if let GuardResult::Halt(halt) = decision {
            return halt.into();
        }

        let log = RequestLog::new(ctx);
        log.debug(format_args!("running {}", name));
        let per_page = self.guard.config().per_page;

        match action {
            AssetAction::Index { page } => Response::ok(Body::Assets(self.registry.page(page, per_page))),
            AssetAction::Show { id } => match self.registry.get(id) {
                Some(asset) => Response::ok(Body::Asset {
                    asset: asset.clone(),
                    history: self.registry.history(id),
                }),
                None => self.not_found(&log, id),
            },
            AssetAction::New => Response::ok(self.form(FormView::New, None, FieldErrors::default())),
            AssetAction::Edit { id } => match self.registry.get(id).cloned() {
                Some(asset) => Response::ok(self.form(FormView::Edit, Some(asset), FieldErrors::default())),
                None => self.not_found(&log, id),
            },
            AssetAction::Create { form } => self.create(ctx, &log, form),
            AssetAction::Update { id, form } => self.update(ctx, &log, id, form, false),
            AssetAction::ApiUpdate { id, form } => self.update(ctx, &log, id, form, true),
            AssetAction::Versions { page } => {
                Response::ok(Body::Versions(self.registry.versions_page(page, per_page)))
            }
        }
    }

    fn create(&mut self, ctx: &RequestContext, log: &RequestLog<'_>, form: AssetForm) -> Response {
        let changes = match form.validate_new(self.users, self.registry) {
            Ok(changes) => changes,
            Err(errors) => {
                log.info(format_args!("create rejected: {}", errors));
                self.record_change(ctx, AuditEventKind::AssetCreated, AuditOutcome::Rejected, None);
                return Response::unprocessable(self.form(FormView::New, None, errors));
            }
        };

        let id = self.registry.create(changes, principal_id(ctx).as_deref());
        log.info(format_args!("created asset {}", id));
        self.record_change(ctx, AuditEventKind::AssetCreated, AuditOutcome::Success, Some(id));
        Response::redirect(format!("/assets/{}", id)).with_notice(CREATED_NOTICE)
    }

    fn update(
        &mut self,
        ctx: &RequestContext,
        log: &RequestLog<'_>,
        id: AssetId,
        form: AssetForm,
        api: bool,
    ) -> Response {
        let Some(current) = self.registry.get(id).cloned() else {
            return self.not_found(log, id);
        };

        let changes = match form.validate(self.users, self.registry) {
            Ok(changes) => changes,
            Err(errors) => {
                log.info(format_args!("update of asset {} rejected: {}", id, errors));
                self.record_change(ctx, AuditEventKind::AssetUpdated, AuditOutcome::Rejected, Some(id));
                let body = if api {
                    Body::Errors(errors)
                } else {
                    self.form(FormView::Edit, Some(current), errors)
                };
                return Response::unprocessable(body);
            }
        };

        let asset = match self.registry.update(id, changes, principal_id(ctx).as_deref()) {
            Ok(asset) => asset.clone(),
            Err(_) => return self.not_found(log, id),
        };
        log.info(format_args!("updated asset {}", id));
        self.record_change(ctx, AuditEventKind::AssetUpdated, AuditOutcome::Success, Some(id));

        if api {
            Response::ok(Body::Asset {
                asset,
                history: self.registry.history(id),
            })
        } else {
            Response::redirect(format!("/assets/{}", id)).with_notice(UPDATED_NOTICE)
        }
    }

    fn form(&self, view: FormView, asset: Option<Asset>, errors: FieldErrors) -> Body {
        Body::Form {
            view,
            asset,
            errors,
            hardware_versions: self.registry.hardware_versions(),
        }
    }

    fn not_found(&self, log: &RequestLog<'_>, id: AssetId) -> Response {
        log.info(format_args!("asset {} not found", id));
        Response::not_found()
    }

    fn record_change(
        &self,
        ctx: &RequestContext,
        kind: AuditEventKind,
        outcome: AuditOutcome,
        id: Option<AssetId>,
    ) {
        let mut event = AuditEvent::new(ctx.request_id(), principal_id(ctx), kind, outcome);
        if let Some(id) = id {
            event = event.with_resource_id(id.to_string());
        }
        self.audit.record(event);
    }
}

fn principal_id(ctx: &RequestContext) -> Option<String> {
    ctx.principal().map(|p| p.id.clone())
}
