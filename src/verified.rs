/// A request value that passed a [`Sanitizer`](crate::Sanitizer).
///
/// Resolvers and asset handlers accept only `Verified` inputs, so a raw
/// cookie or form field cannot reach them unchecked. There is no public
/// constructor.
///
/// ```compile_fail
/// use asset_guard::Verified;
///
/// let forged = Verified::new_unchecked("1.abc.def".to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified<T> {
    inner: T,
}

impl<T> Verified<T> {
    /// Wraps a value a sanitizer has just checked.
    pub(crate) fn new_unchecked(value: T) -> Self {
        Self { inner: value }
    }

    /// Consumes the wrapper.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsRef<T> for Verified<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}
