//! Handler responses.

use crate::assets::{Asset, FieldErrors, HardwareVersion, Page, Version};
use crate::guard::{Halt, StatusCode};
use crate::session::SetCookie;

/// Which form a [`Body::Form`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormView {
    /// Blank form for a new asset
    New,
    /// Form prefilled with an existing asset
    Edit,
}

/// Structured response payload, rendered by the host framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Nothing to render
    Empty,
    /// A page of assets
    Assets(Page<Asset>),
    /// One asset with its history, newest first
    Asset {
        /// The asset
        asset: Asset,
        /// Its versions
        history: Vec<Version>,
    },
    /// An asset form, possibly with errors from a failed submission
    Form {
        /// New or edit
        view: FormView,
        /// The asset being edited
        asset: Option<Asset>,
        /// Field errors
        errors: FieldErrors,
        /// Selectable hardware versions
        hardware_versions: Vec<HardwareVersion>,
    },
    /// A page of versions across all assets
    Versions(Page<Version>),
    /// Field errors for a non-HTML client
    Errors(FieldErrors),
}

/// What a handler or a halted guard produces.
#[derive(Debug)]
pub struct Response {
    /// Status code
    pub status: StatusCode,
    /// Redirect target
    pub location: Option<String>,
    /// Flash notice
    pub notice: Option<String>,
    /// Payload
    pub body: Body,
    /// Cookies to set or remove
    pub cookies: Vec<SetCookie>,
}

impl Response {
    /// `200 OK` with `body`.
    pub fn ok(body: Body) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    /// `302 Found` to `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::with_status(StatusCode::FOUND, Body::Empty)
        }
    }

    /// `404 Not Found`.
    pub fn not_found() -> Self {
        Self::with_status(StatusCode::NOT_FOUND, Body::Empty)
    }

    /// `422 Unprocessable Entity` with `body`.
    pub fn unprocessable(body: Body) -> Self {
        Self::with_status(StatusCode::UNPROCESSABLE, body)
    }

    /// Attaches a flash notice.
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    /// Attaches a cookie instruction.
    pub fn with_cookie(mut self, cookie: SetCookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    fn with_status(status: StatusCode, body: Body) -> Self {
        Self {
            status,
            location: None,
            notice: None,
            body,
            cookies: Vec::new(),
        }
    }
}

impl From<Halt> for Response {
    fn from(halt: Halt) -> Self {
        Self {
            status: halt.status,
            location: halt.redirect_to,
            notice: halt.notice,
            body: Body::Empty,
            cookies: Vec::new(),
        }
    }
}
