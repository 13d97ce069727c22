//! Branch-free validity accumulation.
//!
//! Padding validation and tag comparison must look at every byte regardless of where the first
//! problem is. `Res` lets those checks fold many conditions together and only turn the outcome
//! into an [`Error`] once, at the very end.
use crate::error::Error;

/// An opaque success flag which can only be narrowed from OK to ERR.
#[must_use = "You must handle the potential error"]
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Res(bool);

impl Default for Res {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Res {
    /// Represents a successful result.
    pub const OK: Self = Self(true);
    /// Represents an error result.
    pub const ERR: Self = Self(false);

    /// Creates a new `Res` initialized to `OK`.
    pub const fn new() -> Self {
        Self::OK
    }

    /// Builds a `Res` from a `1`/`0` constant-time mask, such as the output of
    /// [`ct::cmp_slice`](crate::ct::cmp_slice).
    #[inline]
    pub const fn from_mask(mask: u8) -> Self {
        Self(mask & 1 == 1)
    }

    #[inline]
    pub const fn is_ok(&self) -> bool {
        self.0
    }

    #[inline]
    pub const fn is_err(&self) -> bool {
        !self.0
    }

    /// Sets the `Res` to ERR if `res` is `false`.
    #[inline]
    pub fn check(&mut self, res: bool) {
        self.0 &= res;
    }

    /// Sets the `Res` to ERR unless `mask` is `1`.
    #[inline]
    pub fn ensure_mask(&mut self, mask: u8) {
        self.0 &= mask & 1 == 1;
    }

    /// Combines this `Res` with another, OK only if both are OK.
    #[inline]
    pub fn ensure(&mut self, res: Self) {
        self.0 &= res.0;
    }

    /// Converts the `Res` into a `Result`, returning `ok` on success and `err` otherwise.
    ///
    /// # Warning
    ///
    /// This is the single point where the accumulated outcome becomes observable, it is not
    /// constant time.
    ///
    /// # Errors
    ///
    /// Returns `err` if any accumulated check failed.
    #[inline(always)]
    pub fn unit_err<OK>(self, ok: OK, err: Error) -> Result<OK, Error> {
        if self.is_ok() {
            Ok(ok)
        } else {
            Err(err)
        }
    }

    /// As [`unit_err`](Self::unit_err), only building the OK value once the checks passed.
    ///
    /// # Errors
    ///
    /// Returns `err` if any accumulated check failed.
    #[inline(always)]
    pub fn unit_err_with<F, OK>(self, ok: F, err: Error) -> Result<OK, Error>
        where F: FnOnce() -> OK
    {
        if self.is_ok() {
            Ok(ok())
        } else {
            Err(err)
        }
    }
}
