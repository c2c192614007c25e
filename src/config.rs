//! Guard and handler configuration.

/// Settings shared by the session guard, the session cookie and the asset
/// handlers.
///
/// # Examples
///
/// ```
/// use asset_guard::GuardConfig;
///
/// let config = GuardConfig::new()
///     .with_sign_in_path("/auth/google")
///     .with_per_page(25);
///
/// assert_eq!(config.sign_in_path, "/auth/google");
/// assert_eq!(config.cookie_name, "remember_token");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Where `RedirectToSignIn` sends anonymous browsers.
    pub sign_in_path: String,
    /// Notice attached to sign-in redirects.
    pub notice: String,
    /// Name of the remember-token cookie.
    pub cookie_name: String,
    /// Page size for asset and version listings.
    pub per_page: usize,
}

/// Default notice shown when a browser is sent to sign in.
pub const SIGN_IN_NOTICE: &str = "Please sign in to access this page.";

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            sign_in_path: "/signin".to_string(),
            notice: SIGN_IN_NOTICE.to_string(),
            cookie_name: "remember_token".to_string(),
            per_page: 2,
        }
    }
}

impl GuardConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sign-in path.
    pub fn with_sign_in_path(mut self, path: impl Into<String>) -> Self {
        self.sign_in_path = path.into();
        self
    }

    /// Sets the sign-in notice.
    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = notice.into();
        self
    }

    /// Sets the remember-token cookie name.
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Sets the listing page size. Zero is clamped to one.
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }
}
