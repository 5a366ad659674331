use core::fmt;

/// Reasons a [`crate::Burster`] operation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// `rate_sps` and the fixed 500us symbol duration produced zero samples per symbol.
    InvalidRate,
    /// `repeat` was zero.
    InvalidRepeat,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::InvalidRate => "sample rate too low for a 500us symbol duration",
            Error::InvalidRepeat => "repeat count must be at least 1",
        })
    }
}

impl std::error::Error for Error {}
