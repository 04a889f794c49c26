use std::{
    cmp::min,
    io::{self, ErrorKind},
    ops::Range,
};

use nom::IResult;

use crate::{
    error::{Interrupt, StepError, Underflow},
    protocol::utils::is_blank,
    storage::Encoding,
};

/// AsBuffer is the trait used by Buffer to operate on an arbitrary storage.
/// This allows the user to parse over any type as long as it exposes a contiguous slice of bytes.
/// Buffer owns the underlying storage.
pub trait AsBuffer {
    fn as_buffer(&self) -> &[u8];
    fn as_mut_buffer(&mut self) -> &mut [u8];
}

impl AsBuffer for Vec<u8> {
    fn as_buffer(&self) -> &[u8] {
        self
    }
    fn as_mut_buffer(&mut self) -> &mut [u8] {
        self
    }
}

impl AsBuffer for Box<[u8]> {
    fn as_buffer(&self) -> &[u8] {
        self
    }
    fn as_mut_buffer(&mut self) -> &mut [u8] {
        self
    }
}

/// Buffer is a bounded byte buffer specifically designed to stage data being parsed
/// ```txt
/// buffer        start        end        len
/// v             v            v          v
/// [             ██████████████          ]
/// <------------------------------------> buffer()    | capacity()
/// <-------------------------->           used()      | limit()
///                             <---------> space()     | available_space()
///               <------------>           data()      | remaining()
/// ```
/// `start` is the read position: the next byte a step function consumes. `end` is the write
/// limit: the end of valid data. `0 <= start <= end <= capacity` always holds.
/// The buffer is filled from `end` up to `buffer.len()` and consumed from left to right.
/// Once a step can not advance any further, the unconsumed bytes are compacted back at the
/// beginning of the buffer, freeing the rest of the capacity for the next fill.
/// ```txt
/// buffer
/// start         end                     len
/// v             v                       v
/// [██████████████                       ]
/// ```
pub struct Buffer<T: AsBuffer> {
    start: usize,
    end: usize,
    encoding: Encoding,
    pub buffer: T,
}

/// Read position saved before attempting to decode a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

impl Buffer<Box<[u8]>> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(vec![0; capacity].into_boxed_slice())
    }
}

impl<T: AsBuffer> Buffer<T> {
    pub fn new(buffer: T) -> Self {
        Self {
            start: 0,
            end: 0,
            encoding: Encoding::default(),
            buffer,
        }
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn meter(&self, half: usize) -> String {
        let size = half * 2 + 1;
        let len = self.capacity().max(1);
        (0..size + 2)
            .map(|i| {
                if i == 0 {
                    '['
                } else if i - 1 == half {
                    ':'
                } else if i - 1 < (self.start * size / len) {
                    ' '
                } else if i - 1 < (self.end * size / len) {
                    '█'
                } else if i - 1 < size {
                    ' '
                } else {
                    ']'
                }
            })
            .collect()
    }

    pub fn position(&self) -> usize {
        self.start
    }

    /// Moves the read position. It must stay within the valid data.
    pub fn set_position(&mut self, position: usize) {
        assert!(
            position <= self.end,
            "read position {position} past write limit {}",
            self.end
        );
        self.start = position;
    }

    pub fn limit(&self) -> usize {
        self.end
    }

    pub fn remaining(&self) -> usize {
        self.end - self.start
    }

    pub fn has_remaining(&self) -> bool {
        self.start < self.end
    }

    pub fn available_space(&self) -> usize {
        self.capacity() - self.end
    }

    pub fn capacity(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_full(&self) -> bool {
        self.end == self.capacity()
    }

    pub fn fill(&mut self, count: usize) -> usize {
        let count = min(count, self.available_space());
        self.end += count;
        count
    }

    pub fn consume(&mut self, count: usize) -> usize {
        let count = min(count, self.remaining());
        self.start += count;
        count
    }

    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
    }

    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_buffer()
    }

    pub fn mut_buffer(&mut self) -> &mut [u8] {
        self.buffer.as_mut_buffer()
    }

    pub fn data(&self) -> &[u8] {
        let range = self.start..self.end;
        &self.buffer()[range]
    }

    pub fn space(&mut self) -> &mut [u8] {
        let range = self.end..self.capacity();
        &mut self.mut_buffer()[range]
    }

    pub fn used(&self) -> &[u8] {
        let range = ..self.end;
        &self.buffer()[range]
    }

    /// Shifts the unconsumed bytes to the beginning of the buffer.
    /// Returns how many consumed bytes were discarded from the front.
    pub fn compact(&mut self) -> usize {
        let start = self.start;
        let end = self.end;
        if start > 0 {
            self.mut_buffer().copy_within(start..end, 0);
            self.start = 0;
            self.end = end - start;
        }
        start
    }

    /// Reads from `source` into the writable region, once. Returns 0 on end of input, or when
    /// there is no writable space left.
    pub fn fill_from<R: io::Read>(&mut self, source: &mut R) -> io::Result<usize> {
        if self.available_space() == 0 {
            return Ok(0);
        }
        loop {
            match source.read(self.space()) {
                Ok(count) => return Ok(self.fill(count)),
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            }
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.start)
    }

    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.set_position(checkpoint.0);
    }

    /// Runs `decode` from a checkpoint. On underflow the read position is reset to the
    /// checkpoint and `None` is returned, so the caller can hand back its unchanged state.
    pub fn attempt<R, F>(&mut self, decode: F) -> Result<Option<R>, StepError>
    where
        F: FnOnce(&mut Self) -> Result<R, Interrupt>,
    {
        let checkpoint = self.checkpoint();
        match decode(self) {
            Ok(value) => Ok(Some(value)),
            Err(Interrupt::Underflow(_)) => {
                self.rewind(checkpoint);
                Ok(None)
            }
            Err(Interrupt::Failure(error)) => Err(error),
        }
    }

    pub fn peek_u8(&self) -> Result<u8, Underflow> {
        self.data().first().copied().ok_or(Underflow::missing(1))
    }

    pub fn get_u8(&mut self) -> Result<u8, Underflow> {
        let byte = self.peek_u8()?;
        self.start += 1;
        Ok(byte)
    }

    /// Consumes exactly `count` bytes and returns their absolute range in the buffer.
    pub fn take(&mut self, count: usize) -> Result<Range<usize>, Underflow> {
        let remaining = self.remaining();
        if remaining < count {
            return Err(Underflow::missing(count - remaining));
        }
        let range = self.start..self.start + count;
        self.start += count;
        Ok(range)
    }

    /// Absolute index of the next `delimiter` in the readable region.
    pub fn find(&self, delimiter: u8) -> Option<usize> {
        self.data()
            .iter()
            .position(|&b| b == delimiter)
            .map(|index| self.start + index)
    }

    /// Advances past the next `delimiter`, consuming it, and returns its absolute index.
    /// When the delimiter is not buffered yet the read position is left untouched.
    pub fn skip_until(&mut self, delimiter: u8) -> Result<usize, Underflow> {
        let index = self.find(delimiter).ok_or(Underflow::unknown())?;
        self.start = index + 1;
        Ok(index)
    }

    /// Applies a nom streaming parser to the readable region and advances past what it
    /// consumed. `Incomplete` becomes an underflow, nom errors become [`StepError::Syntax`].
    pub fn parse<'a, O, F>(&'a mut self, mut parser: F) -> Result<O, Interrupt>
    where
        F: FnMut(&'a [u8]) -> IResult<&'a [u8], O>,
    {
        let Buffer {
            start, end, buffer, ..
        } = self;
        let buffer: &'a T = buffer;
        let input = &buffer.as_buffer()[*start..*end];
        let (rest, output) = parser(input)?;
        *start += input.len() - rest.len();
        Ok(output)
    }

    /// Decodes `[start, end)` with the buffer's encoding.
    pub fn decode_text(&self, start: usize, end: usize) -> String {
        self.encoding.decode(&self.used()[start..end])
    }

    /// Decodes `[start, end)` without the bytes `<= 0x20` found at either end.
    pub fn decode_trimmed(&self, start: usize, end: usize) -> String {
        let (start, end) = trim_bounds(self.used(), start, end);
        if start == end {
            return String::new();
        }
        self.decode_text(start, end)
    }
}

/// Shrinks `[start, end)` inward past ASCII space and control bytes on both sides.
pub fn trim_bounds(bytes: &[u8], mut start: usize, mut end: usize) -> (usize, usize) {
    while start < end && is_blank(bytes[start]) {
        start += 1;
    }
    while start < end && is_blank(bytes[end - 1]) {
        end -= 1;
    }
    (start, end)
}

impl<T: AsBuffer> io::Write for Buffer<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match io::Write::write(&mut self.space(), buf) {
            Ok(size) => {
                self.fill(size);
                Ok(size)
            }
            err => err,
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: AsBuffer> io::Read for Buffer<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = min(self.remaining(), buf.len());
        buf[..len].copy_from_slice(&self.data()[..len]);
        self.start += len;
        Ok(len)
    }
}

impl<T: AsBuffer + Clone> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            end: self.end,
            encoding: self.encoding,
            buffer: self.buffer.clone(),
        }
    }
}
