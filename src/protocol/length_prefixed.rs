//! Length prefixed text frames: `5:hello6:world!`

use crate::{
    error::StepError,
    protocol::primitives::length_prefix,
    step::Step,
    storage::{AsBuffer, Buffer},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frame {
    /// Expecting decimal digits and a colon.
    #[default]
    Length,
    /// Expecting that many payload bytes.
    Payload(usize),
}

/// Decodes every frame payload as text and pushes it to the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthPrefixed;

impl<T, O> Step<T, Frame, O> for LengthPrefixed
where
    T: AsBuffer,
    O: Extend<String>,
{
    fn step(
        &mut self,
        buf: &mut Buffer<T>,
        mut frame: Frame,
        output: &mut O,
    ) -> Result<Frame, StepError> {
        loop {
            frame = match frame {
                Frame::Length => match buf.attempt(|buf| buf.parse(length_prefix))? {
                    Some(length) if length > buf.capacity() => {
                        return Err(StepError::UnitTooLarge {
                            needed: length,
                            capacity: buf.capacity(),
                        });
                    }
                    Some(length) => Frame::Payload(length),
                    None => return Ok(frame),
                },
                Frame::Payload(length) => match buf.attempt(|buf| Ok(buf.take(length)?))? {
                    Some(range) => {
                        output.extend(Some(buf.decode_text(range.start, range.end)));
                        Frame::Length
                    }
                    None => return Ok(frame),
                },
            };
        }
    }

    fn finish(&mut self, buf: &mut Buffer<T>, frame: Frame, _: &mut O) -> Result<(), StepError> {
        if frame == Frame::Length && !buf.has_remaining() {
            return Ok(());
        }
        Err(StepError::Truncated {
            remaining: buf.remaining(),
        })
    }
}
