use std::fmt;

/// Holder for credential material: remember tokens and signing keys.
///
/// Formatting a `Secret` always prints `[REDACTED]`, so tokens can sit inside
/// structs that derive `Debug` and flow near `tracing` calls without ending
/// up in logs. The value is reachable only through
/// [`expose_secret`](Self::expose_secret).
///
/// # Examples
///
/// ```
/// use asset_guard::Secret;
///
/// let token = Secret::new("3.bm9uY2U.c2ln".to_string());
/// assert_eq!(format!("{:?}", token), "[REDACTED]");
/// assert_eq!(token.expose_secret(), "3.bm9uY2U.c2ln");
/// ```
// No Clone/Copy/Default: a token should be moved to where it is needed, not duplicated.
pub struct Secret<T> {
    inner: T,
}

impl<T> Secret<T> {
    /// Wraps credential material.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Borrows the wrapped value.
    ///
    /// Call sites should hand the result straight to the code that needs the
    /// raw bytes (a cookie header, an HMAC) and never format it.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
