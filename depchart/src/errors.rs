//! Definition of errors.

use std::error::Error;
use std::fmt;

/// A specialized Result type for Depchart.
pub type Result<T, E = DepchartError> = std::result::Result<T, E>;

/// The error type for Depchart.
#[derive(Debug, thiserror::Error)]
pub enum DepchartError {
    /// The error variant for [`InvalidArgumentError`].
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// The error variant for [`InvalidFormatError`].
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// The error variant for [`InvalidStateError`].
    #[error(transparent)]
    InvalidState(InvalidStateError),

    /// The sentence is longer than the configured maximum.
    ///
    /// This is a configuration refusal and is reported before any chart resize is attempted.
    #[error("SentenceTooLongError: {length} tokens exceeds the maximum of {max_length}")]
    SentenceTooLong {
        /// Number of tokens in the refused sentence, excluding the boundary token.
        length: usize,
        /// Configured maximum.
        max_length: usize,
    },

    /// The chart could not be grown to hold the sentence.
    ///
    /// The chart has been restored to its previous capacity and remains usable
    /// for sentences that fit in it.
    #[error("AllocationError: cannot allocate a chart for {requested} tokens")]
    Allocation {
        /// Sentence length, including the boundary token, that failed.
        requested: usize,
    },

    /// The chart could not even be restored to its previous capacity.
    #[error("FatalAllocationError: cannot restore the chart to its capacity of {capacity} tokens")]
    FatalAllocation {
        /// The last capacity that had been allocated successfully.
        capacity: usize,
    },

    /// Parsing was abandoned because cancellation was requested.
    #[error("CancelledError: parsing was cancelled")]
    Cancelled,

    /// The operation is not provided by the exhaustive parser.
    #[error("UnsupportedError: {0}")]
    Unsupported(&'static str),

    /// The error variant for [`TryFromIntError`](std::num::TryFromIntError).
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// The error variant for [`ParseFloatError`](std::num::ParseFloatError).
    #[error(transparent)]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// The error variant for [`ParseIntError`](std::num::ParseIntError).
    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),

    /// The error variant for [`std::io::Error`].
    #[error(transparent)]
    StdIo(#[from] std::io::Error),

    /// The error variant for [`std::str::Utf8Error`].
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

impl DepchartError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_state<S, M>(msg: S, cause: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self::InvalidState(InvalidStateError {
            msg: msg.into(),
            cause: cause.into(),
        })
    }
}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when the input format is invalid.
#[derive(Debug)]
pub struct InvalidFormatError {
    /// Name of the format.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// Error used when the state is invalid.
///
/// The parser raises it when the chart contradicts itself, which indicates
/// a scoring bug rather than a property of the input.
#[derive(Debug)]
pub struct InvalidStateError {
    /// Error message.
    pub(crate) msg: String,

    /// Underlying cause of the error.
    pub(crate) cause: String,
}

impl fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidStateError: {}: {}", self.msg, self.cause)
    }
}

impl Error for InvalidStateError {}
