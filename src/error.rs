use displaydoc::Display;

/// Crate-wide error type.
///
/// Every fallible public operation in this crate returns [`Result`], never
/// panics on caller-supplied input; panics are reserved for violations of
/// this crate's own internal call contracts (fixed-length slices passed
/// between private helpers), consistent with the debug-assertion style of
/// the ternary arithmetic this crate is built on.
#[derive(Debug, Display)]
pub enum Error {
    /// seed must be exactly 81 trytes, found {0}
    BadSeedLength(usize),
    /// security level must be 1, 2 or 3, found {0}
    BadSecurity(u8),
    /// mode not recognised: {0}
    BadMode(String),
    /// restricted mode requires a side key
    MissingSideKey,
    /// side key is only valid in restricted mode
    UnexpectedSideKey,
    /// side key must be 1 to 81 trytes, found {0}
    BadSideKeyLength(usize),
    /// invalid tryte character: {0}
    InvalidTryteChar(char),
    /// trit buffer length {0} is not a multiple of 3
    NotTrytealigned(usize),
    /// channel state field out of range: {0}
    BadChannelState(&'static str),
    /// pascal decode read past end of buffer (needed {needed}, had {available})
    PascalTruncated { needed: usize, available: usize },
    /// message hamming-weight security check failed (invalid or tampered payload)
    InvalidSecurity,
    /// reconstructed root does not match the expected channel root
    RootMismatch,
    /// proof-of-work search was cancelled before a nonce was found
    SearchCancelled,
    /// internal invariant violated: {0}
    Internal(&'static str),
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
