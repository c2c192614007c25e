use std::fmt;

/// A value lifted straight from the request: cookie contents, form fields,
/// query parameters.
///
/// The only way to read it is through a [`Sanitizer`](crate::Sanitizer), which
/// either validates it into a [`Verified`](crate::Verified) value or rejects it.
///
/// # Examples
///
/// ```
/// use asset_guard::{Sanitizer, SerialNumberSanitizer, Tainted};
///
/// let field = Tainted::new("  DEV1234 ".to_string());
/// let serial = SerialNumberSanitizer::default().sanitize(field).unwrap();
/// assert_eq!(serial.as_ref(), "DEV1234");
/// ```
#[derive(Clone)]
pub struct Tainted<T> {
    // Private: reading the value must go through a sanitizer.
    inner: T,
}

impl<T> Tainted<T> {
    /// Marks a value as untrusted.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Hands the raw value to a sanitizer inside this crate.
    pub(crate) fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for Tainted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tainted").field(&self.inner).finish()
    }
}
