use core::fmt;

/// The failure taxonomy shared by every cipher, digest and MAC in this crate.
///
/// Reasons are static strings, they never carry key material, nonces, or plaintext. Errors are
/// deterministic given the inputs, so retrying an operation without changing its inputs
/// reproduces the same failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// A key, IV, nonce, MAC size or parameter variant was rejected by `init`.
    InvalidParameter(&'static str),
    /// The input was shorter than required, or not block aligned where alignment is required.
    DataTooShort(&'static str),
    /// The destination buffer cannot hold the produced output.
    OutputTooShort,
    /// An AEAD tag mismatch or corrupt padding. Any plaintext already written must be discarded.
    AuthenticationFailed(&'static str),
    /// Nonce reuse for encryption, or exhaustion of a counter space.
    MisuseDetected(&'static str),
    /// The operation was invoked before `init`.
    NotInitialized(&'static str),
}

impl Error {
    /// The static reason attached to the error.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidParameter(r)
            | Self::DataTooShort(r)
            | Self::AuthenticationFailed(r)
            | Self::MisuseDetected(r)
            | Self::NotInitialized(r) => r,
            Self::OutputTooShort => "output buffer too short",
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameter(_) => "invalid parameter",
            Self::DataTooShort(_) => "data too short",
            Self::OutputTooShort => "output too short",
            Self::AuthenticationFailed(_) => "authentication failed",
            Self::MisuseDetected(_) => "misuse detected",
            Self::NotInitialized(_) => "not initialized",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::OutputTooShort => f.write_str(self.reason()),
            _ => write!(f, "{}: {}", self.kind(), self.reason()),
        }
    }
}

std! { impl std::error::Error for Error {} }
