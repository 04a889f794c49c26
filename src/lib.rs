//! Streaming parsers over any byte source without loading it in memory.
//!
//! A [`BufferedSource`] repeatedly fills a bounded [`Buffer`] from a [`std::io::Read`] source
//! and hands it to a user supplied [`Step`]. The step consumes what it can, the loop compacts
//! the leftover bytes to the front of the buffer and refills around them, so a unit straddling
//! two reads is seen whole by the next call.
//!
//! ```
//! use tamis::protocol::{Frame, LengthPrefixed};
//!
//! let input = &b"5:hello6:world!"[..];
//! let frames: Vec<String> = tamis::run(input, &mut LengthPrefixed, Frame::Length, Vec::new())?;
//! assert_eq!(frames, ["hello", "world!"]);
//! # Ok::<(), tamis::Error>(())
//! ```
mod config;
mod error;
pub mod protocol;
mod source;
mod step;
mod storage;

pub use config::{Config, DEFAULT_BUFFER_CAPACITY};
pub use error::{Error, HasKind, Interrupt, StepError, Underflow};
pub use source::{run, run_file, run_with, BufferedSource};
pub use step::Step;
pub use storage::*;

pub struct SliceBuffer<'a>(pub &'a mut [u8]);

impl crate::AsBuffer for SliceBuffer<'_> {
    fn as_buffer(&self) -> &[u8] {
        self.0
    }
    fn as_mut_buffer(&mut self) -> &mut [u8] {
        self.0
    }
}
