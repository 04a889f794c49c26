use crate::{
    error::StepError,
    storage::{AsBuffer, Buffer},
};

/// Resumable unit of parsing logic, invoked repeatedly by
/// [`BufferedSource::run`](crate::BufferedSource::run).
///
/// `C` is the context: where in the grammar the parser stands. It is threaded by value, each
/// call returns the context the next call starts with. `O` is the output accumulator; the loop
/// never looks into it.
///
/// A step may consume any number of bytes from the readable region of the buffer, but it must
/// leave the read position right after the last fully decoded unit. When a unit is not
/// completely buffered yet, the step rewinds to the position it had before attempting that
/// unit and returns: no progress tells the loop to compact and refill.
/// [`Buffer::attempt`] does the checkpoint and rewind:
///
/// ```
/// use tamis::{AsBuffer, Buffer, Step, StepError};
///
/// /// Fixed size records of 4 bytes
/// struct Records;
///
/// impl<T: AsBuffer> Step<T, (), Vec<String>> for Records {
///     fn step(
///         &mut self,
///         buf: &mut Buffer<T>,
///         context: (),
///         output: &mut Vec<String>,
///     ) -> Result<(), StepError> {
///         while let Some(range) = buf.attempt(|buf| Ok(buf.take(4)?))? {
///             output.push(buf.decode_text(range.start, range.end));
///         }
///         Ok(context)
///     }
/// }
///
/// let records = tamis::run(&b"abcdefgh"[..], &mut Records, (), Vec::new()).unwrap();
/// assert_eq!(records, ["abcd", "efgh"]);
/// ```
///
/// A unit that never fits in the buffer can not be told apart from one that needs a single
/// more byte. Grammars knowing the size of their units up front should check it against
/// [`Buffer::capacity`] and fail with [`StepError::UnitTooLarge`]; otherwise the run fails
/// with [`Error::Capacity`](crate::Error::Capacity) once the buffer is full.
pub trait Step<T: AsBuffer, C, O> {
    fn step(&mut self, buf: &mut Buffer<T>, context: C, output: &mut O) -> Result<C, StepError>;

    /// Called once when the source is exhausted, with the bytes that were never consumed
    /// still in the buffer.
    fn finish(
        &mut self,
        _buf: &mut Buffer<T>,
        _context: C,
        _output: &mut O,
    ) -> Result<(), StepError> {
        Ok(())
    }
}

impl<T, C, O, F> Step<T, C, O> for F
where
    T: AsBuffer,
    F: FnMut(&mut Buffer<T>, C, &mut O) -> Result<C, StepError>,
{
    fn step(&mut self, buf: &mut Buffer<T>, context: C, output: &mut O) -> Result<C, StepError> {
        self(buf, context, output)
    }
}
