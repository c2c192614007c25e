//! Extraction boundary traits.
//!
//! Everything lifted out of a request arrives as [`Tainted`]. Extraction
//! neither verifies credentials nor decides access.

use crate::Tainted;

/// Lifts the raw remember-token credential out of a request.
///
/// # Examples
///
/// ```
/// use asset_guard::web::ExtractCredential;
/// use asset_guard::Tainted;
///
/// struct BearerOnly(Option<String>);
///
/// impl ExtractCredential for BearerOnly {
///     fn extract_credential(&self, _cookie_name: &str) -> Option<Tainted<String>> {
///         self.0.clone().map(Tainted::new)
///     }
/// }
///
/// assert!(BearerOnly(None).extract_credential("remember_token").is_none());
/// ```
pub trait ExtractCredential {
    /// Returns the credential stored under `cookie_name`, if any.
    fn extract_credential(&self, cookie_name: &str) -> Option<Tainted<String>>;
}

/// Lifts submitted form or query parameters out of a request.
pub trait ExtractParams {
    /// Returns every `(name, value)` pair in submission order.
    fn extract_params(&self) -> Vec<(String, Tainted<String>)>;
}
