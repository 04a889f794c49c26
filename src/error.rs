use std::{borrow::Cow, io};

use nom::error::ErrorKind as NomErrorKind;
use thiserror::Error;

/// Failure of a whole run. Every variant aborts the run immediately; whatever the step already
/// pushed into the accumulator stays there.
#[derive(Debug, Error)]
pub enum Error {
    /// The input source failed to produce bytes.
    #[error("failed to read from source: {0}")]
    Source(#[from] io::Error),
    /// The step function rejected the input. `offset` is the absolute stream position of the
    /// read cursor when the step gave up.
    #[error("step failed at offset {offset}: {source}")]
    Step { offset: u64, source: StepError },
    /// The buffer is full and the step function still cannot make progress: a single unit is
    /// larger than the buffer.
    #[error("no progress on a full buffer of {capacity} bytes at offset {offset}")]
    Capacity { capacity: usize, offset: u64 },
}

/// Grammar level failure raised by a step function.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("syntax error ({kind:?})")]
    Syntax { kind: NomErrorKind },
    #[error("malformed input: {message}")]
    Malformed { message: Cow<'static, str> },
    #[error("unit of {needed} bytes cannot fit in a buffer of {capacity} bytes")]
    UnitTooLarge { needed: usize, capacity: usize },
    #[error("input ended with {remaining} bytes of an incomplete unit")]
    Truncated { remaining: usize },
    #[error("failed to write to output: {0}")]
    Sink(#[from] io::Error),
}

impl From<&'static str> for StepError {
    fn from(message: &'static str) -> Self {
        StepError::Malformed {
            message: Cow::Borrowed(message),
        }
    }
}

impl From<String> for StepError {
    fn from(message: String) -> Self {
        StepError::Malformed {
            message: Cow::Owned(message),
        }
    }
}

/// Not enough buffered bytes to decode a unit. This is control flow, not a failure: the caller
/// rewinds to its checkpoint and lets the loop refill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Underflow {
    /// How many more bytes are known to be missing, if that is known at all.
    pub needed: Option<usize>,
}

impl Underflow {
    pub fn unknown() -> Self {
        Underflow { needed: None }
    }

    pub fn missing(needed: usize) -> Self {
        Underflow {
            needed: Some(needed),
        }
    }
}

/// Outcome of a decoding attempt that did not produce a value.
#[derive(Debug)]
pub enum Interrupt {
    Underflow(Underflow),
    Failure(StepError),
}

impl From<Underflow> for Interrupt {
    fn from(underflow: Underflow) -> Self {
        Interrupt::Underflow(underflow)
    }
}

impl From<StepError> for Interrupt {
    fn from(error: StepError) -> Self {
        Interrupt::Failure(error)
    }
}

impl From<&'static str> for Interrupt {
    fn from(message: &'static str) -> Self {
        Interrupt::Failure(message.into())
    }
}

impl<E: HasKind> From<nom::Err<E>> for Interrupt {
    fn from(error: nom::Err<E>) -> Self {
        match error {
            nom::Err::Incomplete(nom::Needed::Size(size)) => Underflow::missing(size.get()).into(),
            nom::Err::Incomplete(nom::Needed::Unknown) => Underflow::unknown().into(),
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                StepError::Syntax { kind: e.kind() }.into()
            }
        }
    }
}

/// Access to the nom error kind, whatever the concrete nom error type is.
pub trait HasKind {
    fn kind(&self) -> NomErrorKind;
}

impl<I> HasKind for nom::error::Error<I> {
    fn kind(&self) -> NomErrorKind {
        self.code
    }
}
