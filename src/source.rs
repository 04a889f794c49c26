use std::{
    fs::File,
    io::{self, ErrorKind, Read},
    path::Path,
};

use log::{debug, log_enabled, trace, warn, Level};

use crate::{
    config::Config,
    error::Error,
    step::Step,
    storage::{debug_buffer, AsBuffer, Buffer},
};

/// Pulls bytes from a [`Read`] source into a bounded [`Buffer`] and feeds them to a [`Step`]
/// until the source is exhausted.
///
/// ```txt
/// fill ──> step, step, ... until no progress ──> compact ──> fill ──> ...
/// ```
///
/// The buffer is exclusively borrowed by [`run`](Self::run) for its whole duration. Bytes left
/// over by a failed run stay in the buffer; [`into_parts`](Self::into_parts) gives the source
/// and the storage back.
pub struct BufferedSource<R: Read, T: AsBuffer> {
    source: R,
    storage: Buffer<T>,
    /// Bytes discarded from the front of the buffer so far.
    consumed: u64,
}

impl<R: Read> BufferedSource<R, Box<[u8]>> {
    pub fn new(source: R) -> Self {
        Self::with_config(source, &Config::default())
    }

    pub fn with_config(source: R, config: &Config) -> Self {
        let storage =
            Buffer::with_capacity(config.buffer_capacity).with_encoding(config.text_encoding);
        Self::with_storage(source, storage)
    }
}

impl<R: Read, T: AsBuffer> BufferedSource<R, T> {
    /// Parse over a caller provided storage, e.g. a [`SliceBuffer`](crate::SliceBuffer)
    /// reused across runs.
    pub fn with_storage(source: R, storage: Buffer<T>) -> Self {
        Self {
            source,
            storage,
            consumed: 0,
        }
    }

    /// Absolute stream offset of the buffer's read position.
    pub fn offset(&self) -> u64 {
        self.consumed + self.storage.position() as u64
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn buffer(&self) -> &Buffer<T> {
        &self.storage
    }

    pub fn into_parts(self) -> (R, Buffer<T>) {
        (self.source, self.storage)
    }

    /// Runs `step` over the whole source, starting from `initial`, and returns the accumulator.
    ///
    /// The accumulator is moved in and out; pass a `&mut` accumulator to keep what was parsed
    /// before a failure.
    pub fn run<S, C, O>(&mut self, step: &mut S, initial: C, mut output: O) -> Result<O, Error>
    where
        S: Step<T, C, O> + ?Sized,
    {
        let capacity = self.storage.capacity();
        let origin = self.offset();
        debug!("run started at offset {origin}, buffer of {capacity} bytes");

        let mut context = initial;
        let mut fills = 0_u64;
        let mut calls = 0_u64;
        loop {
            // after compaction a full buffer means nothing was consumed from a full window
            if self.storage.is_full() {
                if self.source_exhausted()? {
                    break;
                }
                debug_buffer(&self.storage);
                return Err(Error::Capacity {
                    capacity,
                    offset: self.offset(),
                });
            }
            let read = self.storage.fill_from(&mut self.source)?;
            if read == 0 {
                break;
            }
            fills += 1;
            if log_enabled!(Level::Trace) {
                trace!("read {read} bytes {}", self.storage.meter(20));
            }

            let mut progress = true;
            while self.storage.has_remaining() && progress {
                let before = self.storage.position();
                context = match step.step(&mut self.storage, context, &mut output) {
                    Ok(context) => context,
                    Err(source) => {
                        return Err(Error::Step {
                            offset: self.offset(),
                            source,
                        })
                    }
                };
                calls += 1;
                progress = self.storage.position() > before;
            }

            self.consumed += self.storage.compact() as u64;
        }

        if let Err(source) = step.finish(&mut self.storage, context, &mut output) {
            return Err(Error::Step {
                offset: self.offset(),
                source,
            });
        }
        let remaining = self.storage.remaining();
        if remaining > 0 {
            warn!(
                "discarding {remaining} unconsumed bytes at offset {}",
                self.offset()
            );
        }
        self.consumed += self.storage.limit() as u64;
        self.storage.clear();

        debug!(
            "run finished: {} bytes in {fills} fills, {calls} step calls",
            self.consumed - origin
        );
        Ok(output)
    }

    /// Reads a single byte past a full buffer to tell a unit that exactly fills it at the end
    /// of input from one that does not fit. The byte is lost, the run fails in that case.
    fn source_exhausted(&mut self) -> io::Result<bool> {
        let mut scratch = [0_u8; 1];
        loop {
            match self.source.read(&mut scratch) {
                Ok(read) => return Ok(read == 0),
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            }
        }
    }
}

/// Runs `step` over `source` with the default [`Config`].
pub fn run<R, S, C, O>(source: R, step: &mut S, initial: C, output: O) -> Result<O, Error>
where
    R: Read,
    S: Step<Box<[u8]>, C, O> + ?Sized,
{
    run_with(source, &Config::default(), step, initial, output)
}

pub fn run_with<R, S, C, O>(
    source: R,
    config: &Config,
    step: &mut S,
    initial: C,
    output: O,
) -> Result<O, Error>
where
    R: Read,
    S: Step<Box<[u8]>, C, O> + ?Sized,
{
    BufferedSource::with_config(source, config).run(step, initial, output)
}

/// Opens `path` and runs `step` over its content.
pub fn run_file<P, S, C, O>(
    path: P,
    config: &Config,
    step: &mut S,
    initial: C,
    output: O,
) -> Result<O, Error>
where
    P: AsRef<Path>,
    S: Step<Box<[u8]>, C, O> + ?Sized,
{
    let file = File::open(path)?;
    run_with(file, config, step, initial, output)
}
